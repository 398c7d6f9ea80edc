#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = write!($crate::console::Console, "{}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! println {
    () => {{
        $crate::print!("\n");
    }};
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = writeln!($crate::console::Console, "{}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! eprint {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        use $crate::video_memory::{Attribute, Colour};
        let _ = $crate::console::Console::with_attribute(Attribute::from_colours(Colour::Red, Colour::Black), |console| {
            write!(console, "{}", format_args!($($arg)*))
        });
    }};
}

#[macro_export]
macro_rules! eprintln {
    () => {{
        $crate::eprint!("\n");
    }};
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        use $crate::video_memory::{Attribute, Colour};
        let _ = $crate::console::Console::with_attribute(Attribute::from_colours(Colour::Red, Colour::Black), |console| {
            writeln!(console, "{}", format_args!($($arg)*))
        });
    }};
}

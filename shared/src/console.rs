use core::{
    fmt::{self, Write},
    ptr::addr_of_mut,
};

#[cfg(all(feature = "serial", any(target_arch = "x86", target_arch = "x86_64")))]
use crate::serial::SERIAL_WRITER;
use crate::video_memory::{Attribute, VideoMemoryWriter, VIDEO_MEMORY_WRITER};

/// The system console: VGA text memory, mirrored to COM1 when the `serial`
/// feature is on.
///
/// Zero-sized, so it can be handed out by value wherever a
/// [`fmt::Write`] sink is wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Console {
    /// Blanks the screen and moves the cursor to the top left.
    pub fn clear(&mut self) {
        video_memory().clear();
    }

    /// Runs `f` with the screen colour temporarily set to `attribute`.
    pub fn with_attribute<R>(attribute: Attribute, f: impl FnOnce(&mut Console) -> R) -> R {
        let previous = video_memory().attribute;
        video_memory().attribute = attribute;
        let result = f(&mut Console);
        video_memory().attribute = previous;
        result
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        video_memory().write_str(s)?;
        #[cfg(all(feature = "serial", any(target_arch = "x86", target_arch = "x86_64")))]
        // SAFETY: Single core and no preemption, so nobody else can be
        // writing to the port right now.
        unsafe {
            (*addr_of_mut!(SERIAL_WRITER)).write_str(s)?;
        }
        Ok(())
    }
}

fn video_memory() -> &'static mut VideoMemoryWriter {
    // SAFETY: Single core and no preemption, so at most one flow of control is
    // ever inside the console.
    unsafe { &mut *addr_of_mut!(VIDEO_MEMORY_WRITER) }
}

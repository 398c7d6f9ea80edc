// https://wiki.osdev.org/Text_UI

use arbitrary_int::{u3, u4};
use bitbybit::bitfield;
use core::{fmt, mem::size_of, slice};

pub const VIDEO_MEMORY_BASE: usize = 0xb8000;
pub const VIDEO_MEMORY_COLS: usize = 80;
const VIDEO_MEMORY_LINES: usize = 25;
pub const VIDEO_MEMORY_SIZE: usize = VIDEO_MEMORY_COLS * VIDEO_MEMORY_LINES;

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum Colour {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Purple = 5,
    Brown = 6,
    Gray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightPurple = 13,
    Yellow = 14,
    White = 15,
}

#[bitfield(u8, default = 0)]
pub struct Attribute {
    #[bits(0..=3, rw)]
    foreground: u4,
    // Only the dark half of the palette is available as a background.
    #[bits(4..=6, rw)]
    background: u3,
    #[bit(7, rw)]
    blink: bool,
}

impl Attribute {
    pub const fn from_colours(fg: Colour, bg: Colour) -> Self {
        const MASK_3: u8 = (1 << 3) - 1;
        Self::new_with_raw_value((((bg as u8) & MASK_3) << 4) | (fg as u8))
    }
}

/// One cell of text-mode memory.
#[derive(Clone, Copy, Default)]
#[repr(C)]
pub struct Character {
    pub ascii: u8,
    pub attribute: Attribute,
}

const _: () = assert!(size_of::<Character>() == 2);

pub struct VideoMemoryWriter {
    // TODO: Move the hardware cursor along with this one.
    pub cursor: usize,
    pub attribute: Attribute,
}

impl VideoMemoryWriter {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            attribute: Attribute::from_colours(Colour::White, Colour::Black),
        }
    }

    pub fn clear(&mut self) {
        // SAFETY: See `write_str`.
        self.clear_into(unsafe { video_memory() });
    }

    fn blank(&self) -> Character {
        Character {
            ascii: b' ',
            attribute: self.attribute,
        }
    }

    fn clear_into(&mut self, video_memory: &mut [Character]) {
        video_memory.fill(self.blank());
        self.cursor = 0;
    }

    fn write_into(&mut self, video_memory: &mut [Character], s: &str) {
        for b in s.bytes() {
            if self.cursor >= video_memory.len() {
                video_memory.copy_within(VIDEO_MEMORY_COLS.., 0);

                // Clear the line that scrolled in.
                let last_line = video_memory.len() - VIDEO_MEMORY_COLS;
                video_memory[last_line..].fill(self.blank());

                self.cursor = last_line;
            }

            if b == b'\n' {
                self.cursor = (self.cursor + 1).next_multiple_of(VIDEO_MEMORY_COLS);
                continue;
            }

            video_memory[self.cursor] = Character {
                ascii: b,
                attribute: self.attribute,
            };
            self.cursor += 1;
        }
    }
}

impl Default for VideoMemoryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for VideoMemoryWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // SAFETY: Assumes that there is only one core => multiple threads
        // cannot be inside this function at once holding video_memory.
        self.write_into(unsafe { video_memory() }, s);
        Ok(())
    }
}

unsafe fn video_memory() -> &'static mut [Character] {
    slice::from_raw_parts_mut(VIDEO_MEMORY_BASE as *mut Character, VIDEO_MEMORY_SIZE)
}

pub static mut VIDEO_MEMORY_WRITER: VideoMemoryWriter = VideoMemoryWriter::new();

// https://www.gnu.org/software/grub/manual/multiboot/multiboot.html

use bitbybit::bitfield;
use core::{mem::size_of, slice};
use zerocopy::{FromBytes, FromZeroes};

/// EXPECTED_MAGIC is the value that multiboot compatible bootloaders will load
/// into eax before transferring control to the OS.
pub const EXPECTED_MAGIC: usize = 0x2BAD_B002;

const HEADER_MAGIC: u32 = 0x1BAD_B002;

#[bitfield(u32, default = 0)]
pub struct HeaderFlags {
    #[bit(0, rw)]
    page_align: bool,
    #[bit(1, rw)]
    memory_info: bool,
}

#[allow(unused)]
#[repr(C, align(4))]
struct Header {
    magic: u32,
    flags: u32,
    checksum: u32,
}

impl Header {
    const fn new(flags: HeaderFlags) -> Self {
        let flags = flags.raw_value();
        Self {
            magic: HEADER_MAGIC,
            flags,
            checksum: HEADER_MAGIC.wrapping_add(flags).wrapping_neg(),
        }
    }
}

#[cfg(target_os = "none")]
#[used]
#[link_section = ".multiboot"]
static HEADER: Header = Header::new(
    HeaderFlags::DEFAULT
        .with_page_align(true)
        .with_memory_info(true),
);

#[bitfield(u32)]
pub struct InfoFlags {
    #[bit(0, r)]
    memory: bool,
    #[bit(3, r)]
    modules: bool,
}

/// The fixed-size start of the boot information block. Fields past
/// `mods_addr` are never looked at.
#[derive(FromZeroes, FromBytes, Clone, Copy)]
#[repr(C)]
pub struct MultibootInfo {
    flags: u32,
    mem_lower: u32,
    mem_upper: u32,
    boot_device: u32,
    cmdline: u32,
    mods_count: u32,
    mods_addr: u32,
}

impl MultibootInfo {
    /// Copies the information block out of boot loader memory.
    ///
    /// # Safety
    /// `ptr` must be null or point to at least `size_of::<MultibootInfo>()`
    /// readable bytes.
    pub unsafe fn from_ptr(ptr: *const u8) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        Self::read_from_prefix(slice::from_raw_parts(ptr, size_of::<Self>()))
    }

    pub fn flags(&self) -> InfoFlags {
        InfoFlags::new_with_raw_value(self.flags)
    }

    /// Lower and upper memory sizes in KiB, if the boot loader provided them.
    pub fn memory_kib(&self) -> Option<(u32, u32)> {
        self.flags()
            .memory()
            .then_some((self.mem_lower, self.mem_upper))
    }

    pub fn module_count(&self) -> Option<u32> {
        self.flags().modules().then_some(self.mods_count)
    }
}

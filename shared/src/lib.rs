#![cfg_attr(target_os = "none", no_std)]

#[macro_use]
pub mod macros;
pub mod console;
#[cfg(all(feature = "serial", any(target_arch = "x86", target_arch = "x86_64")))]
pub mod serial;
pub mod video_memory;

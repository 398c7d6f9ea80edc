#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
// Only the pure parts of the kernel are built off target, for their tests.
#![cfg_attr(not(target_os = "none"), allow(dead_code))]

#[cfg(target_os = "none")]
mod boot;
mod config;
mod multiboot;
#[cfg(target_os = "none")]
mod sync;
mod threading;

#[cfg(target_os = "none")]
use fifos_shared::{console::Console, eprintln, println};

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(args: &core::panic::PanicInfo) -> ! {
    eprintln!("{}", args);
    boot::schedule_finish()
}

/// Entered from `_start` with the registers the boot loader handed over.
#[cfg(target_os = "none")]
extern "C" fn init(magic: usize, boot_info: *const u8) -> ! {
    Console.clear();
    println!("FIFOS: first come first serve thread scheduler");

    assert!(
        magic == multiboot::EXPECTED_MAGIC,
        "invalid magic, expected {:#X}, got {:#X}",
        multiboot::EXPECTED_MAGIC,
        magic
    );

    // SAFETY: The boot loader guarantees a complete information block at
    // `boot_info` when the magic matches.
    if let Some(info) = unsafe { multiboot::MultibootInfo::from_ptr(boot_info) } {
        if let Some((lower, upper)) = info.memory_kib() {
            println!("Memory: {lower} KiB lower, {upper} KiB upper");
        }
        if let Some(count) = info.module_count() {
            println!("Boot modules: {count} (ignored)");
        }
    }

    println!("Initializing Thread System...");
    threading::thread_system_initialization();
    threading::spawn_workers().expect("Could not create the worker threads.");
    println!("Finished Thread System initialization. Ready to start threading.");
    threading::thread_system_start();
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("fifos only runs on bare metal, build it for the i686-fifos target.");
}

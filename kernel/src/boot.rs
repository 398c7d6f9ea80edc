use crate::config::BOOT_STACK_SIZE;
use core::arch::{asm, global_asm};

#[repr(C, align(16))]
struct BootStack([u8; BOOT_STACK_SIZE]);

static mut BOOT_STACK: BootStack = BootStack([0; BOOT_STACK_SIZE]);

// The boot loader leaves the magic in eax and the info block address in ebx,
// with no usable stack.
global_asm!(
    "
.globl _start
_start:
        lea esp, [{stack} + {stack_size}]
        sub esp, 8
        push ebx
        push eax
        call {}
2:
        cli
        hlt
        jmp 2b",
    sym crate::init,
    stack = sym BOOT_STACK,
    stack_size = const BOOT_STACK_SIZE,
);

/// Where control ends up once no thread is left to run.
pub fn schedule_finish() -> ! {
    super::sync::intr_disable();
    loop {
        // SAFETY: With interrupts off this stops the processor for good.
        unsafe { asm!("hlt", options(nomem, nostack)) };
    }
}

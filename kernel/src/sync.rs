use crate::threading::thread_functions::Eflags;
use core::arch::asm;

#[derive(Debug, PartialEq)]
pub enum IntrLevel {
    IntrOn,
    IntrOff,
}

pub fn intr_get_level() -> IntrLevel {
    let flags: u32;
    // SAFETY: Only reads the flags register, the stack is balanced again
    // afterwards.
    unsafe {
        asm!(
            "pushfd",
            "pop {}",
            out(reg) flags
        );
    }

    if Eflags::new_with_raw_value(flags).interrupt_enable() {
        IntrLevel::IntrOn
    } else {
        IntrLevel::IntrOff
    }
}

pub fn intr_disable() {
    // SAFETY: Turning interrupts off cannot break any invariant.
    unsafe {
        asm!("cli", options(nomem, nostack));
    }
}

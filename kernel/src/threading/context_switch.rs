use super::thread_functions::{self, X86Context};
use core::arch::naked_asm;
use fifos_core::{ContextSwitch, Stack, ThreadFunction};

/// The hardware side of the scheduler on i386.
#[derive(Debug, Default)]
pub struct X86ContextSwitch;

impl ContextSwitch for X86ContextSwitch {
    type Context = X86Context;

    fn initial_context(&mut self, stack: Stack, entry: ThreadFunction) -> Option<X86Context> {
        thread_functions::initial_context(stack, entry)
    }

    unsafe fn retrieve(&mut self, incoming: *const X86Context) {
        context_retrieve(incoming);
    }

    unsafe fn protect_and_switch(&mut self, outgoing: *mut X86Context, incoming: *const X86Context) {
        context_protection(outgoing, incoming);
    }
}

macro_rules! save_registers {
    () => {
        // Flags first so the frame matches the one built for new threads.
        r#"
            pushfd
            pushad
        "#
    };
}

macro_rules! load_arguments {
    () => {
        // The arguments sit above the return address and the nine words just
        // pushed by `save_registers!`.
        // * %eax = outgoing context.
        // * %edx = incoming context.
        r#"
            mov eax, [esp + 0x28]
            mov edx, [esp + 0x2c]
        "#
    };
}

macro_rules! switch_stacks {
    () => {
        // Both contexts are `*X86Context = **stack`, dereference once.
        r#"
            mov [eax], esp
            mov esp, [edx]
        "#
    };
}

macro_rules! restore_registers {
    () => {
        // Leaves the return address of the restored thread on top.
        r#"
            popad
            popfd
        "#
    };
}

/// Loads `incoming` and continues it. The caller's state is lost.
#[unsafe(naked)]
unsafe extern "C" fn context_retrieve(_incoming: *const X86Context) {
    naked_asm!(
        r#"
            mov eax, [esp + 0x4]
            mov esp, [eax]
        "#,
        restore_registers!(),
        "ret",
    )
}

/// Saves the caller into `outgoing` and continues `incoming`. Returns once
/// some later switch restores `outgoing`.
///
/// `outgoing` and `incoming` may be the same context, in which case the
/// caller simply resumes.
#[unsafe(naked)]
unsafe extern "C" fn context_protection(
    _outgoing: *mut X86Context,
    _incoming: *const X86Context,
) {
    naked_asm!(
        save_registers!(),
        load_arguments!(),
        switch_stacks!(),
        restore_registers!(),
        "ret",
    )
}

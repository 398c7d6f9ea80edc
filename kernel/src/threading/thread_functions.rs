use bitbybit::bitfield;
use core::{mem::size_of, ptr::NonNull};
use fifos_core::{Stack, ThreadFunction};
use zerocopy::AsBytes;

// The i386 System V ABI wants the stack 16-byte aligned at every call site.
const STACK_ALIGNMENT: usize = 16;

#[bitfield(u32, default = 0)]
pub struct Eflags {
    // Reads as 1 on every processor since the 8086.
    #[bit(1, rw)]
    reserved: bool,
    #[bit(9, rw)]
    interrupt_enable: bool,
}

impl Eflags {
    /// The flags a thread starts with: everything clear, including the
    /// interrupt flag, apart from the always-set reserved bit.
    pub const INITIAL: Self = Self::DEFAULT.with_reserved(true);
}

/// The saved state of a suspended thread: where its stack pointer was left.
///
/// Everything else lives on the thread's own stack, pushed there by
/// `pushfd`/`pushad` in the same shape as [`InitialFrame`].
#[repr(C)]
pub struct X86Context {
    // Only ever read by the switch routines in assembly.
    #[cfg_attr(not(test), allow(dead_code))]
    stack_pointer: NonNull<usize>,
}

#[cfg(test)]
impl X86Context {
    fn stack_pointer(&self) -> NonNull<usize> {
        self.stack_pointer
    }
}

/// What a fresh thread's stack looks like to the first restore.
///
/// Fields are in ascending address order: `popad` consumes the first eight,
/// `popfd` the flags, and `ret` jumps to `eip`. The last word is where the
/// entry function expects its own return address, so the thread starts with
/// a stack shaped exactly as if it had been called.
#[derive(AsBytes)]
#[repr(C)]
struct InitialFrame {
    edi: usize,
    esi: usize,
    ebp: usize,
    esp: usize, // Skipped by popad.
    ebx: usize,
    edx: usize,
    ecx: usize,
    eax: usize,
    eflags: usize,
    eip: usize,
    return_address: usize,
}

impl InitialFrame {
    fn new(entry: ThreadFunction) -> Self {
        Self {
            edi: 0,
            esi: 0,
            ebp: 0,
            esp: 0,
            ebx: 0,
            edx: 0,
            ecx: 0,
            eax: 0,
            eflags: Eflags::INITIAL.raw_value() as usize,
            eip: entry as usize,
            return_address: 0,
        }
    }
}

/// Lays an [`InitialFrame`] at the top of `stack` and returns the context
/// that restores it, or `None` if the stack is too small.
pub fn initial_context(stack: Stack, entry: ThreadFunction) -> Option<X86Context> {
    let base = stack.as_ptr() as usize;
    let top = (base + size_of::<usize>() * stack.len()) & !(STACK_ALIGNMENT - 1);
    let frame_start = top.checked_sub(size_of::<InitialFrame>())?;
    if frame_start < base {
        return None;
    }

    let offset = frame_start - base;
    stack.as_bytes_mut()[offset..offset + size_of::<InitialFrame>()]
        .copy_from_slice(InitialFrame::new(entry).as_bytes());

    Some(X86Context {
        stack_pointer: NonNull::from(&mut stack[offset / size_of::<usize>()]),
    })
}

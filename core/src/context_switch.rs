/// A function that may be used as a thread's entry point.
///
/// Threads leave by calling the scheduler's `finish`, so the entry function
/// never returns.
pub type ThreadFunction = extern "C" fn() -> !;

/// A dedicated stack region owned by exactly one thread for the lifetime of
/// the system.
pub type Stack = &'static mut [usize];

/// The gateway the scheduler uses to move the processor between threads.
///
/// The scheduler decides *which* context runs next; implementors decide *how*
/// register and stack state is saved and installed.
pub trait ContextSwitch {
    /// Saved execution state of one thread.
    type Context;

    /// Lays down the context a brand-new thread starts from.
    ///
    /// Restoring the returned context must begin execution at `entry` on
    /// `stack` with a clean register file and interrupts disabled. Returns
    /// `None` if the stack cannot hold the initial frame.
    fn initial_context(&mut self, stack: Stack, entry: ThreadFunction) -> Option<Self::Context>;

    /// Installs `incoming` and transfers control to it.
    ///
    /// Used only when there is no live context worth saving: the very first
    /// dispatch, or the one right after a thread terminated.
    ///
    /// # Safety
    /// `incoming` must point to a context produced by `initial_context` or
    /// saved by `protect_and_switch`.
    unsafe fn retrieve(&mut self, incoming: *const Self::Context);

    /// Saves the live state into `outgoing`, then installs `incoming`.
    ///
    /// Returns only once `outgoing` is restored again. The two pointers may
    /// refer to the same context.
    ///
    /// # Safety
    /// Both pointers must be valid for the duration of the call, and
    /// `incoming` must satisfy the requirements of [`ContextSwitch::retrieve`].
    unsafe fn protect_and_switch(
        &mut self,
        outgoing: *mut Self::Context,
        incoming: *const Self::Context,
    );
}

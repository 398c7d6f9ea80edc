use super::context_switch::X86ContextSwitch;
use crate::{
    boot::schedule_finish,
    config::{READY_QUEUE_SIZE, THREAD_COUNT},
    sync::{intr_get_level, IntrLevel},
};
use core::ptr::addr_of_mut;
use fifos_core::{Scheduler, SchedulerError, Stack, ThreadFunction, Tid};
use fifos_shared::{console::Console, println};

pub type KernelScheduler = Scheduler<X86ContextSwitch, Console, THREAD_COUNT, READY_QUEUE_SIZE>;

static mut SCHEDULER: Option<KernelScheduler> = None;

fn scheduler() -> &'static mut KernelScheduler {
    // SAFETY: Single core and no interrupts, so only the running thread can
    // be in here. A thread that yields is suspended inside the scheduler with
    // its reference still live, and the next thread takes a fresh one. The
    // suspended reference is not touched again until that thread is
    // dispatched, by which point every other thread is suspended too.
    unsafe { (*addr_of_mut!(SCHEDULER)).as_mut() }
        .expect("Cannot use the thread system before initializing it.")
}

/// To be called before any other thread functions.
/// To be called with interrupts disabled.
pub fn thread_system_initialization() {
    assert_eq!(intr_get_level(), IntrLevel::IntrOff);

    // SAFETY: Interrupts are disabled and no thread exists yet.
    unsafe {
        *addr_of_mut!(SCHEDULER) = Some(Scheduler::new(X86ContextSwitch, Console));
    }
}

pub fn create_thread(stack: Stack, entry: ThreadFunction) -> Result<Tid, SchedulerError> {
    scheduler().create_thread(stack, entry)
}

/// Hands the processor to the first created thread. The boot flow of control
/// is abandoned.
pub fn thread_system_start() -> ! {
    assert_eq!(intr_get_level(), IntrLevel::IntrOff);

    for tcb in scheduler().threads() {
        println!("Thread<{:04}> enters at {:#010x}", tcb.tid(), tcb.entry() as usize);
    }

    match scheduler().schedule() {
        // The first dispatch discards the caller, so this only happens if the
        // gateway is broken.
        Ok(tid) => panic!("Returned to the boot stack after dispatching thread {tid}."),
        Err(error) => schedule_failed(error),
    }
}

/// Gives up the processor. Returns when the calling thread is dispatched
/// again.
pub fn yield_now() {
    if let Err(error) = scheduler().yield_now() {
        schedule_failed(error);
    }
}

/// Terminates the calling thread.
pub fn finish() -> ! {
    match scheduler().finish() {
        Ok(tid) => panic!("Terminated thread came back after dispatching thread {tid}."),
        Err(error) => schedule_failed(error),
    }
}

pub fn current_thread() -> Tid {
    scheduler()
        .current()
        .expect("No thread is running outside of the thread system.")
}

fn schedule_failed(error: SchedulerError) -> ! {
    match error {
        SchedulerError::NoReadyThread => schedule_finish(),
        error => panic!("Scheduling failed: {error}"),
    }
}

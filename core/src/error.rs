use core::error::Error;
use core::fmt::{Debug, Display, Formatter};

use crate::thread_control_block::{ThreadStatus, Tid};

/// Error type for scheduling operations.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Every slot of the thread table is taken.
    CapacityExceeded,
    /// The ready queue holds as many threads as it can.
    QueueFull,
    /// A dequeue was attempted on an empty ready queue.
    QueueEmpty,
    /// Nothing is left to dispatch. This is how the dispatch loop ends.
    NoReadyThread,
    /// The stack region cannot hold the initial execution context.
    StackTooSmall,
    /// A thread-side primitive was used while no thread is running.
    NoRunningThread,
    /// A scheduling pass was started while this thread is still running.
    AlreadyRunning(Tid),
    /// The id does not belong to any thread in the table.
    UnknownThread(Tid),
    /// A thread was asked to make a lifecycle transition it cannot make.
    InvalidTransition {
        tid: Tid,
        from: ThreadStatus,
        to: ThreadStatus,
    },
}

impl Debug for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SchedulerError::CapacityExceeded => write!(f, "CapacityExceeded"),
            SchedulerError::QueueFull => write!(f, "QueueFull"),
            SchedulerError::QueueEmpty => write!(f, "QueueEmpty"),
            SchedulerError::NoReadyThread => write!(f, "NoReadyThread"),
            SchedulerError::StackTooSmall => write!(f, "StackTooSmall"),
            SchedulerError::NoRunningThread => write!(f, "NoRunningThread"),
            SchedulerError::AlreadyRunning(tid) => write!(f, "AlreadyRunning({tid})"),
            SchedulerError::UnknownThread(tid) => write!(f, "UnknownThread({tid})"),
            SchedulerError::InvalidTransition { tid, from, to } => {
                write!(f, "InvalidTransition(tid {tid}: {from:?} -> {to:?})")
            }
        }
    }
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Error for SchedulerError {
    #[allow(deprecated)]
    fn description(&self) -> &str {
        match self {
            SchedulerError::CapacityExceeded => "Thread table is full",
            SchedulerError::QueueFull => "Ready queue is full",
            SchedulerError::QueueEmpty => "Ready queue is empty",
            SchedulerError::NoReadyThread => "No thread is ready to run",
            SchedulerError::StackTooSmall => "Stack region too small for the initial context",
            SchedulerError::NoRunningThread => "No thread is running",
            SchedulerError::AlreadyRunning(_) => "A thread is already running",
            SchedulerError::UnknownThread(_) => "No thread with this id",
            SchedulerError::InvalidTransition { .. } => "Invalid thread status transition",
        }
    }
}

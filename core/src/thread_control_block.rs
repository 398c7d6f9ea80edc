use crate::{context_switch::ThreadFunction, error::SchedulerError};

/// Thread identifier. Assigned from 1 in creation order and never reused.
pub type Tid = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    New,
    Ready,
    Running,
    Terminated,
}

impl ThreadStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    pub const fn can_become(self, next: ThreadStatus) -> bool {
        matches!(
            (self, next),
            (ThreadStatus::New, ThreadStatus::Ready)
                | (ThreadStatus::Ready, ThreadStatus::Running)
                | (ThreadStatus::Running, ThreadStatus::Ready)
                | (ThreadStatus::Running, ThreadStatus::Terminated)
        )
    }
}

// The context comes first so a pointer to the TCB is also a pointer to the
// saved stack pointer slot.
#[repr(C)]
pub struct ThreadControlBlock<C> {
    pub context: C,
    tid: Tid,
    entry: ThreadFunction,
    status: ThreadStatus,
    // Reserved, the dispatcher never looks at it.
    priority: u8,
}

impl<C> ThreadControlBlock<C> {
    pub fn new(tid: Tid, context: C, entry: ThreadFunction) -> Self {
        Self {
            context,
            tid,
            entry,
            status: ThreadStatus::New,
            priority: 0,
        }
    }

    pub fn tid(&self) -> Tid {
        self.tid
    }

    pub fn entry(&self) -> ThreadFunction {
        self.entry
    }

    pub fn status(&self) -> ThreadStatus {
        self.status
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// `New -> Ready`, on admission to the ready queue.
    pub fn admit(&mut self) -> Result<(), SchedulerError> {
        self.transition(ThreadStatus::Ready)
    }

    /// `Ready -> Running`.
    pub fn dispatch(&mut self) -> Result<(), SchedulerError> {
        self.transition(ThreadStatus::Running)
    }

    /// `Running -> Ready`, when the thread yields.
    pub fn suspend(&mut self) -> Result<(), SchedulerError> {
        self.transition(ThreadStatus::Ready)
    }

    /// `Running -> Terminated`. There is no way back.
    pub fn terminate(&mut self) -> Result<(), SchedulerError> {
        self.transition(ThreadStatus::Terminated)
    }

    fn transition(&mut self, to: ThreadStatus) -> Result<(), SchedulerError> {
        if !self.status.can_become(to) {
            return Err(SchedulerError::InvalidTransition {
                tid: self.tid,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

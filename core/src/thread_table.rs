use crate::{
    context_switch::ThreadFunction,
    error::SchedulerError,
    thread_control_block::{ThreadControlBlock, Tid},
};

/// Fixed-capacity arena of thread control blocks.
///
/// Slots are filled in order and never emptied, so a thread's id maps
/// directly to its slot (`tid - 1`) for the lifetime of the system.
pub struct ThreadTable<C, const N: usize> {
    slots: [Option<ThreadControlBlock<C>>; N],
    len: usize,
}

impl<C, const N: usize> ThreadTable<C, N> {
    pub const fn new() -> Self {
        const { assert!(N <= Tid::MAX as usize, "thread ids would overflow") };
        Self {
            slots: [const { None }; N],
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Records a new thread and returns the id it was given.
    pub fn insert(&mut self, context: C, entry: ThreadFunction) -> Result<Tid, SchedulerError> {
        if self.is_full() {
            return Err(SchedulerError::CapacityExceeded);
        }
        let tid = Tid::try_from(self.len + 1).map_err(|_| SchedulerError::CapacityExceeded)?;
        self.slots[self.len] = Some(ThreadControlBlock::new(tid, context, entry));
        self.len += 1;
        Ok(tid)
    }

    pub fn get(&self, tid: Tid) -> Option<&ThreadControlBlock<C>> {
        let index = usize::from(tid).checked_sub(1)?;
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, tid: Tid) -> Option<&mut ThreadControlBlock<C>> {
        let index = usize::from(tid).checked_sub(1)?;
        self.slots.get_mut(index)?.as_mut()
    }

    /// Threads in creation order, which is also ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ThreadControlBlock<C>> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ThreadControlBlock<C>> {
        self.slots.iter_mut().flatten()
    }
}

impl<C, const N: usize> Default for ThreadTable<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

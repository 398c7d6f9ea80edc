use crate::{error::SchedulerError, thread_control_block::Tid};

/// Bounded circular FIFO of threads eligible to run.
///
/// Only `head` and `tail` are kept, so one of the `C` slots always stays free:
/// `head == tail` means empty and `tail + 1 == head` (mod `C`) means full.
pub struct ReadyQueue<const C: usize> {
    slots: [Tid; C],
    head: usize,
    tail: usize,
}

impl<const C: usize> ReadyQueue<C> {
    pub const fn new() -> Self {
        const { assert!(C >= 2, "a ready queue needs at least one usable slot") };
        Self {
            slots: [0; C],
            head: 0,
            tail: 0,
        }
    }

    /// The number of threads the queue can hold at once.
    pub const fn capacity(&self) -> usize {
        C - 1
    }

    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub const fn is_full(&self) -> bool {
        (self.tail + 1) % C == self.head
    }

    pub const fn len(&self) -> usize {
        (self.tail + C - self.head) % C
    }

    pub fn enqueue(&mut self, tid: Tid) -> Result<(), SchedulerError> {
        if self.is_full() {
            return Err(SchedulerError::QueueFull);
        }
        self.slots[self.tail] = tid;
        self.tail = (self.tail + 1) % C;
        Ok(())
    }

    pub fn dequeue(&mut self) -> Result<Tid, SchedulerError> {
        if self.is_empty() {
            return Err(SchedulerError::QueueEmpty);
        }
        let tid = self.slots[self.head];
        self.head = (self.head + 1) % C;
        Ok(tid)
    }

    /// Queued threads from front to back.
    pub fn iter(&self) -> impl Iterator<Item = Tid> + '_ {
        (0..self.len()).map(move |i| self.slots[(self.head + i) % C])
    }
}

impl<const C: usize> Default for ReadyQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

use core::fmt::Write;

use crate::{
    context_switch::{ContextSwitch, Stack, ThreadFunction},
    error::SchedulerError,
    ready_queue::ReadyQueue,
    thread_control_block::{ThreadControlBlock, ThreadStatus, Tid},
    thread_table::ThreadTable,
};

/// First-come-first-served cooperative scheduler.
///
/// Owns up to `N` threads and a ready queue of `C` slots (`C - 1` usable).
/// Control only changes hands when the running thread calls
/// [`Scheduler::yield_now`] or [`Scheduler::finish`].
pub struct Scheduler<G: ContextSwitch, L: Write, const N: usize, const C: usize> {
    threads: ThreadTable<G::Context, N>,
    ready_queue: ReadyQueue<C>,
    // The thread dispatched most recently. It is either still running, back
    // in the ready queue after a yield, or terminated.
    last: Option<Tid>,
    gateway: G,
    console: L,
}

impl<G: ContextSwitch, L: Write, const N: usize, const C: usize> Scheduler<G, L, N, C> {
    pub const fn new(gateway: G, console: L) -> Self {
        const { assert!(C > N, "every thread must fit in the ready queue at once") };
        Self {
            threads: ThreadTable::new(),
            ready_queue: ReadyQueue::new(),
            last: None,
            gateway,
            console,
        }
    }

    /// Creates a thread that will start at `entry` on `stack`.
    ///
    /// The thread stays `New` until the next scheduling pass admits it.
    pub fn create_thread(
        &mut self,
        stack: Stack,
        entry: ThreadFunction,
    ) -> Result<Tid, SchedulerError> {
        if self.threads.is_full() {
            return Err(SchedulerError::CapacityExceeded);
        }
        let context = self
            .gateway
            .initial_context(stack, entry)
            .ok_or(SchedulerError::StackTooSmall)?;
        self.threads.insert(context, entry)
    }

    /// Moves every `New` thread into the ready queue, in id order.
    ///
    /// Runs on every pass even though only the first one can find anything.
    pub fn admit_new_threads(&mut self) -> Result<usize, SchedulerError> {
        let mut admitted = 0;
        for tcb in self.threads.iter_mut() {
            if tcb.status() == ThreadStatus::New {
                self.ready_queue.enqueue(tcb.tid())?;
                tcb.admit()?;
                admitted += 1;
            }
        }
        Ok(admitted)
    }

    /// Takes the thread at the head of the ready queue.
    fn select_next(&mut self) -> Result<Tid, SchedulerError> {
        self.ready_queue
            .dequeue()
            .map_err(|_| SchedulerError::NoReadyThread)
    }

    /// Marks `next`, just taken off the ready queue, as running and hands the
    /// processor to it.
    ///
    /// If the previously dispatched thread is still alive its state is saved
    /// first; in that case this only returns once that thread is dispatched
    /// again.
    fn dispatch(&mut self, next: Tid) -> Result<(), SchedulerError> {
        if let Some(running) = self.current() {
            return Err(SchedulerError::AlreadyRunning(running));
        }

        let outgoing = self.last.filter(|&tid| {
            matches!(self.threads.get(tid), Some(tcb) if tcb.status() != ThreadStatus::Terminated)
        });

        let incoming = self.tcb_mut(next)?;
        incoming.dispatch()?;
        let incoming: *const G::Context = &incoming.context;
        self.last = Some(next);

        match outgoing {
            None => {
                // SAFETY: The context lives in the thread table, which is never
                // moved or shrunk while the scheduler exists.
                unsafe { self.gateway.retrieve(incoming) };
            }
            Some(previous) => {
                let _ = writeln!(self.console, "Go back to scheduler...");
                let outgoing: *mut G::Context = &mut self.tcb_mut(previous)?.context;
                // SAFETY: As above. `outgoing` and `incoming` may be the same
                // context when the yielding thread is the only one left.
                unsafe { self.gateway.protect_and_switch(outgoing, incoming) };
            }
        }
        Ok(())
    }

    /// One full scheduling pass: admit, select and dispatch.
    ///
    /// Returns the thread this pass dispatched, or `NoReadyThread` once there
    /// is nothing left to run. Only one thread runs at a time, so this fails
    /// with `AlreadyRunning` unless the running thread has yielded or
    /// finished first.
    pub fn schedule(&mut self) -> Result<Tid, SchedulerError> {
        if let Some(running) = self.current() {
            return Err(SchedulerError::AlreadyRunning(running));
        }
        self.admit_new_threads()?;

        if self.ready_queue.is_empty() {
            let _ = writeln!(self.console, "Ready queue is empty.");
            let _ = writeln!(self.console, "Schedule ends.");
            return Err(SchedulerError::NoReadyThread);
        }

        let next = self.select_next()?;
        self.dispatch(next)?;
        Ok(next)
    }

    /// Puts the running thread at the back of the ready queue and schedules.
    pub fn yield_now(&mut self) -> Result<Tid, SchedulerError> {
        let current = self.current().ok_or(SchedulerError::NoRunningThread)?;
        self.tcb_mut(current)?.suspend()?;
        self.ready_queue.enqueue(current)?;
        self.schedule()
    }

    /// Terminates the running thread and schedules.
    pub fn finish(&mut self) -> Result<Tid, SchedulerError> {
        let current = self.current().ok_or(SchedulerError::NoRunningThread)?;
        self.tcb_mut(current)?.terminate()?;
        self.schedule()
    }

    /// The thread that is running right now, if any.
    pub fn current(&self) -> Option<Tid> {
        self.last.filter(|&tid| {
            matches!(self.threads.get(tid), Some(tcb) if tcb.status() == ThreadStatus::Running)
        })
    }

    pub fn thread(&self, tid: Tid) -> Option<&ThreadControlBlock<G::Context>> {
        self.threads.get(tid)
    }

    pub fn threads(&self) -> impl Iterator<Item = &ThreadControlBlock<G::Context>> {
        self.threads.iter()
    }

    pub fn ready_queue(&self) -> &ReadyQueue<C> {
        &self.ready_queue
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn console(&self) -> &L {
        &self.console
    }

    fn tcb_mut(&mut self, tid: Tid) -> Result<&mut ThreadControlBlock<G::Context>, SchedulerError> {
        self.threads
            .get_mut(tid)
            .ok_or(SchedulerError::UnknownThread(tid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A context switch that only records what it was asked to do.
    ///
    /// Nothing is ever entered, so every gateway call returns straight away
    /// and the test plays the part of whichever thread is "running".
    #[derive(Default)]
    struct RecordingSwitch {
        created: usize,
        switches: Vec<Switch>,
    }

    struct MockContext {
        id: usize,
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Switch {
        Retrieve(usize),
        ProtectAndSwitch(usize, usize),
    }

    const MIN_STACK_WORDS: usize = 16;

    impl ContextSwitch for RecordingSwitch {
        type Context = MockContext;

        fn initial_context(&mut self, stack: Stack, _entry: ThreadFunction) -> Option<MockContext> {
            if stack.len() < MIN_STACK_WORDS {
                return None;
            }
            self.created += 1;
            Some(MockContext { id: self.created })
        }

        unsafe fn retrieve(&mut self, incoming: *const MockContext) {
            self.switches.push(Switch::Retrieve((*incoming).id));
        }

        unsafe fn protect_and_switch(&mut self, outgoing: *mut MockContext, incoming: *const MockContext) {
            self.switches
                .push(Switch::ProtectAndSwitch((*outgoing).id, (*incoming).id));
        }
    }

    type TestScheduler<const N: usize> = Scheduler<RecordingSwitch, String, N, 8>;

    extern "C" fn never_runs() -> ! {
        unreachable!("test threads are never entered")
    }

    fn stack() -> Stack {
        Box::leak(Box::new([0usize; MIN_STACK_WORDS]))
    }

    fn scheduler_with<const N: usize>(threads: usize) -> TestScheduler<N> {
        let mut scheduler = TestScheduler::<N>::new(RecordingSwitch::default(), String::new());
        for _ in 0..threads {
            scheduler.create_thread(stack(), never_runs).unwrap();
        }
        scheduler
    }

    fn dispatched(scheduler: &TestScheduler<3>) -> Vec<usize> {
        scheduler
            .gateway()
            .switches
            .iter()
            .map(|switch| match *switch {
                Switch::Retrieve(to) | Switch::ProtectAndSwitch(_, to) => to,
            })
            .collect()
    }

    #[test]
    fn test_create_thread_assigns_ids() {
        let scheduler = scheduler_with::<3>(3);
        let ids: Vec<_> = scheduler.threads().map(|tcb| tcb.tid()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(scheduler
            .threads()
            .all(|tcb| tcb.status() == ThreadStatus::New && tcb.priority() == 0));
        assert!(scheduler.ready_queue().is_empty());
        assert_eq!(scheduler.current(), None);
    }

    #[test]
    fn test_create_thread_beyond_capacity() {
        let mut scheduler = scheduler_with::<3>(3);
        assert_eq!(
            scheduler.create_thread(stack(), never_runs),
            Err(SchedulerError::CapacityExceeded)
        );
        assert_eq!(scheduler.threads().count(), 3);
        for tid in 1..=3 {
            let tcb = scheduler.thread(tid).unwrap();
            assert_eq!(tcb.context.id, usize::from(tid));
            assert_eq!(tcb.status(), ThreadStatus::New);
        }
    }

    #[test]
    fn test_create_thread_small_stack() {
        let mut scheduler = scheduler_with::<3>(0);
        let tiny: Stack = Box::leak(Box::new([0usize; 4]));
        assert_eq!(
            scheduler.create_thread(tiny, never_runs),
            Err(SchedulerError::StackTooSmall)
        );
        assert_eq!(scheduler.create_thread(stack(), never_runs), Ok(1));
    }

    #[test]
    fn test_admission_is_once_per_thread() {
        let mut scheduler = scheduler_with::<3>(3);
        assert_eq!(scheduler.admit_new_threads(), Ok(3));
        assert!(scheduler.ready_queue().iter().eq([1, 2, 3]));
        assert!(scheduler
            .threads()
            .all(|tcb| tcb.status() == ThreadStatus::Ready));

        // Later passes find nothing new.
        assert_eq!(scheduler.admit_new_threads(), Ok(0));
        assert_eq!(scheduler.ready_queue().len(), 3);
    }

    #[test]
    fn test_first_dispatch_retrieves() {
        let mut scheduler = scheduler_with::<3>(3);
        assert_eq!(scheduler.schedule(), Ok(1));
        assert_eq!(scheduler.current(), Some(1));
        assert_eq!(scheduler.thread(1).unwrap().status(), ThreadStatus::Running);
        assert_eq!(scheduler.gateway().switches, vec![Switch::Retrieve(1)]);
        assert!(scheduler.ready_queue().iter().eq([2, 3]));
        assert!(scheduler.console().is_empty());
    }

    #[test]
    fn test_yield_rejoins_at_the_back() {
        let mut scheduler = scheduler_with::<3>(3);
        scheduler.schedule().unwrap();

        assert_eq!(scheduler.yield_now(), Ok(2));
        assert_eq!(scheduler.thread(1).unwrap().status(), ThreadStatus::Ready);
        assert!(scheduler.ready_queue().iter().eq([3, 1]));
        assert_eq!(
            scheduler.gateway().switches.last(),
            Some(&Switch::ProtectAndSwitch(1, 2))
        );
        assert_eq!(scheduler.console(), "Go back to scheduler...\n");

        assert_eq!(scheduler.yield_now(), Ok(3));
        assert_eq!(scheduler.yield_now(), Ok(1));
        assert_eq!(dispatched(&scheduler), vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_schedule_while_running_is_rejected() {
        let mut scheduler = scheduler_with::<3>(3);
        assert_eq!(scheduler.schedule(), Ok(1));

        assert_eq!(scheduler.schedule(), Err(SchedulerError::AlreadyRunning(1)));
        let running: Vec<_> = scheduler
            .threads()
            .filter(|tcb| tcb.status() == ThreadStatus::Running)
            .map(|tcb| tcb.tid())
            .collect();
        assert_eq!(running, vec![1]);
        assert_eq!(scheduler.gateway().switches, vec![Switch::Retrieve(1)]);
        assert!(scheduler.ready_queue().iter().eq([2, 3]));
        assert_eq!(scheduler.thread(2).unwrap().status(), ThreadStatus::Ready);
    }

    #[test]
    fn test_dispatch_while_running_leaves_queue_intact() {
        let mut scheduler = scheduler_with::<3>(3);
        scheduler.schedule().unwrap();

        assert_eq!(scheduler.dispatch(3), Err(SchedulerError::AlreadyRunning(1)));
        assert_eq!(scheduler.thread(3).unwrap().status(), ThreadStatus::Ready);

        // Every thread is still queued exactly once, in arrival order.
        assert_eq!(scheduler.yield_now(), Ok(2));
        assert!(scheduler.ready_queue().iter().eq([3, 1]));
        assert_eq!(scheduler.yield_now(), Ok(3));
        assert_eq!(scheduler.yield_now(), Ok(1));
        assert_eq!(dispatched(&scheduler), vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_dispatch_after_finish_retrieves() {
        let mut scheduler = scheduler_with::<3>(2);
        scheduler.schedule().unwrap();

        assert_eq!(scheduler.finish(), Ok(2));
        assert_eq!(scheduler.thread(1).unwrap().status(), ThreadStatus::Terminated);
        // A terminated thread has nothing worth saving.
        assert_eq!(
            scheduler.gateway().switches,
            vec![Switch::Retrieve(1), Switch::Retrieve(2)]
        );
        assert!(scheduler.ready_queue().is_empty());
    }

    #[test]
    fn test_lone_thread_switches_to_itself() {
        let mut scheduler = scheduler_with::<3>(1);
        scheduler.schedule().unwrap();
        assert_eq!(scheduler.yield_now(), Ok(1));
        assert_eq!(
            scheduler.gateway().switches,
            vec![Switch::Retrieve(1), Switch::ProtectAndSwitch(1, 1)]
        );
        assert_eq!(scheduler.current(), Some(1));
    }

    #[test]
    fn test_thread_primitives_need_a_running_thread() {
        let mut scheduler = scheduler_with::<3>(2);
        assert_eq!(scheduler.yield_now(), Err(SchedulerError::NoRunningThread));
        assert_eq!(scheduler.finish(), Err(SchedulerError::NoRunningThread));
        assert!(scheduler.gateway().switches.is_empty());
    }

    #[test]
    fn test_jobs_run_to_completion() {
        let mut scheduler = scheduler_with::<3>(3);
        let mut jobs = [2, 4, 5];
        let (mut yields, mut terminations) = (0, 0);
        let mut seen_running = [false; 3];

        let mut result = scheduler.schedule();
        while result.is_ok() {
            let current = scheduler.current().unwrap();
            let index = usize::from(current) - 1;
            seen_running[index] = true;

            result = if jobs[index] > 0 {
                jobs[index] -= 1;
                yields += 1;
                let result = scheduler.yield_now();
                assert_ne!(
                    scheduler.thread(current).unwrap().status(),
                    ThreadStatus::Terminated
                );
                result
            } else {
                terminations += 1;
                scheduler.finish()
            };
        }

        assert_eq!(result, Err(SchedulerError::NoReadyThread));
        assert_eq!(yields, 11);
        assert_eq!(terminations, 3);
        assert_eq!(seen_running, [true; 3]);
        assert!(scheduler.ready_queue().is_empty());
        assert_eq!(scheduler.current(), None);
        assert!(scheduler
            .threads()
            .all(|tcb| tcb.status() == ThreadStatus::Terminated));

        let switches = &scheduler.gateway().switches;
        let cooperative = switches
            .iter()
            .filter(|switch| matches!(switch, Switch::ProtectAndSwitch(..)))
            .count();
        assert_eq!(cooperative, 11);
        assert_eq!(switches.len() - cooperative, 3);
        assert_eq!(
            dispatched(&scheduler),
            vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 2, 3, 2, 3, 3]
        );

        let console = scheduler.console();
        assert_eq!(console.matches("Go back to scheduler...").count(), 11);
        assert!(console.ends_with("Ready queue is empty.\nSchedule ends.\n"));
    }

    #[test]
    fn test_halt_is_idempotent() {
        let mut scheduler = scheduler_with::<3>(2);
        scheduler.schedule().unwrap();
        scheduler.finish().unwrap();
        assert_eq!(scheduler.finish(), Err(SchedulerError::NoReadyThread));
        let switches = scheduler.gateway().switches.len();

        for _ in 0..3 {
            assert_eq!(scheduler.schedule(), Err(SchedulerError::NoReadyThread));
        }
        assert_eq!(scheduler.gateway().switches.len(), switches);
        assert!(scheduler.ready_queue().is_empty());
        assert!(scheduler
            .threads()
            .all(|tcb| tcb.status() == ThreadStatus::Terminated));
    }

    #[test]
    fn test_empty_system_halts_immediately() {
        let mut scheduler = scheduler_with::<3>(0);
        assert_eq!(scheduler.schedule(), Err(SchedulerError::NoReadyThread));
        assert_eq!(scheduler.console(), "Ready queue is empty.\nSchedule ends.\n");
        assert!(scheduler.gateway().switches.is_empty());
    }
}

//! Static configuration of the system: how many threads there are, where
//! they run and how much work each does.

/// Number of worker threads created at startup.
pub const THREAD_COUNT: usize = 3;

/// Slots in the ready queue. One slot always stays free, so this must exceed
/// `THREAD_COUNT`.
pub const READY_QUEUE_SIZE: usize = 256;

/// Size of each worker's private stack, in words.
pub const STACK_WORDS: usize = 1024;

/// Stack used from `_start` until the first thread is dispatched.
pub const BOOT_STACK_SIZE: usize = 16 * 1024;

/// How many times each worker runs (and yields) before it finishes, indexed
/// by thread id - 1.
pub const JOB_COUNTS: [usize; THREAD_COUNT] = [2, 4, 5];

/// Iterations of the busy-wait loop each job spins for.
pub const DELAY_OUTER: usize = 10_000;
pub const DELAY_INNER: usize = 30_000;

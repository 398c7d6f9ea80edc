//! The jobs the worker threads run.

use super::thread_system::{create_thread, current_thread, finish, yield_now};
use crate::config::{DELAY_INNER, DELAY_OUTER, JOB_COUNTS, STACK_WORDS, THREAD_COUNT};
use core::{hint::black_box, ptr::addr_of_mut};
use fifos_core::SchedulerError;
use fifos_shared::{print, println};

static mut STACKS: [[usize; STACK_WORDS]; THREAD_COUNT] = [[0; STACK_WORDS]; THREAD_COUNT];

/// Creates one worker per entry of `JOB_COUNTS`, each on its own stack.
pub fn spawn_workers() -> Result<(), SchedulerError> {
    // SAFETY: Called once, before any thread runs, so nothing else refers to
    // the stacks. Afterwards each one belongs to exactly one thread.
    let stacks: &'static mut [[usize; STACK_WORDS]; THREAD_COUNT] =
        unsafe { &mut *addr_of_mut!(STACKS) };
    for stack in stacks {
        create_thread(stack, worker)?;
    }
    Ok(())
}

extern "C" fn worker() -> ! {
    let tid = current_thread();
    let jobs = JOB_COUNTS[usize::from(tid) - 1];

    for _ in 0..jobs {
        print!("Thread<{tid:04}> is running...  ");
        delay();
        yield_now();
    }

    println!("Thread<{tid:04}> finished.");
    finish()
}

fn delay() {
    for i in 0..DELAY_OUTER {
        for j in 0..DELAY_INNER {
            black_box(i * j);
        }
    }
}

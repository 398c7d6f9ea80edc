#![cfg_attr(target_os = "none", no_std)]

//! Cooperative first-come-first-served thread scheduling.
//!
//! The crate knows nothing about the machine it runs on. Saving and restoring
//! register state is delegated to a [`ContextSwitch`] gateway supplied by the
//! platform, and diagnostics are written to any [`core::fmt::Write`] sink.

pub mod context_switch;
pub mod error;
pub mod ready_queue;
pub mod scheduler;
pub mod thread_control_block;
pub mod thread_table;

pub use context_switch::{ContextSwitch, Stack, ThreadFunction};
pub use error::SchedulerError;
pub use ready_queue::ReadyQueue;
pub use scheduler::Scheduler;
pub use thread_control_block::{ThreadControlBlock, ThreadStatus, Tid};
pub use thread_table::ThreadTable;

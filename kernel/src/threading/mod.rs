#[cfg(target_os = "none")]
mod context_switch;
pub mod thread_functions;
#[cfg(target_os = "none")]
pub mod thread_system;
#[cfg(target_os = "none")]
pub mod workloads;

#[cfg(target_os = "none")]
pub use thread_system::{thread_system_initialization, thread_system_start};
#[cfg(target_os = "none")]
pub use workloads::spawn_workers;

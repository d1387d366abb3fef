//! busgen-runtime - Worker pool and single-flight job scheduling
//!
//! This crate provides:
//! - [`WorkerPool`], a fixed-size pool on top of a Tokio runtime
//! - [`Scheduler`], which runs at most one generation job per target
//! - [`SharedContext`] with the one-shot setup guard shared by all jobs
//! - Graceful shutdown: queued jobs fail instead of leaving waiters blocked

mod context;
mod job;
mod pool;
mod scheduler;
mod shutdown;

pub use context::SharedContext;
pub use job::{JobHandle, JobOutcome};
pub use pool::{PoolConfig, WorkerPool};
pub use scheduler::{DEFAULT_SHUTDOWN_TIMEOUT, Scheduler};
pub use shutdown::{ShutdownHandle, ShutdownSignal};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{JobHandle, PoolConfig, Scheduler, SharedContext, WorkerPool};
}

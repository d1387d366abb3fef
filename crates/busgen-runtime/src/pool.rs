//! Fixed-size worker pool backed by a Tokio runtime

use crate::shutdown::{ShutdownHandle, ShutdownSignal};
use busgen_core::{GeneratorConfig, SchedulerError};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of threads running generation jobs
    pub worker_threads: usize,
    /// Name prefix for worker threads
    pub thread_name: String,
    /// Maximum number of jobs queued or running at once
    pub max_pending_jobs: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            thread_name: "busgen-worker".to_string(),
            max_pending_jobs: 256,
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pool sizing from a generator configuration
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            worker_threads: config.worker_threads,
            max_pending_jobs: config.max_pending_jobs,
            ..Self::default()
        }
    }

    /// Set the number of worker threads
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Set the thread name prefix
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the pending job limit
    pub fn with_max_pending_jobs(mut self, limit: usize) -> Self {
        self.max_pending_jobs = limit;
        self
    }
}

/// Runs blocking generation work on a bounded set of threads.
///
/// Jobs go through Tokio's blocking pool, capped at `worker_threads`; work
/// beyond that waits in the runtime's queue. Every job receives the pool's
/// [`ShutdownSignal`].
pub struct WorkerPool {
    runtime: Mutex<Option<Runtime>>,
    shutdown_handle: ShutdownHandle,
    config: PoolConfig,
}

impl WorkerPool {
    /// Create a new worker pool with the given configuration
    pub fn new(config: PoolConfig) -> Result<Self, SchedulerError> {
        if config.worker_threads == 0 {
            return Err(SchedulerError::PoolStart(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(config.worker_threads)
            .thread_name(&config.thread_name)
            .build()
            .map_err(|e| SchedulerError::PoolStart(e.to_string()))?;

        tracing::debug!(
            workers = config.worker_threads,
            thread_name = %config.thread_name,
            "Worker pool started"
        );

        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
            shutdown_handle: ShutdownHandle::new(),
            config,
        })
    }

    /// Create a pool with default configuration
    pub fn with_defaults() -> Result<Self, SchedulerError> {
        Self::new(PoolConfig::default())
    }

    /// Get the pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get a shutdown signal that can be used to detect shutdown
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown_handle.signal()
    }

    /// Queue `job` on a worker thread.
    ///
    /// A job that has not started when the pool shuts down is dropped
    /// without running.
    pub fn execute<F>(&self, job: F) -> Result<(), SchedulerError>
    where
        F: FnOnce(&ShutdownSignal) + Send + 'static,
    {
        if self.shutdown_handle.is_triggered() {
            return Err(SchedulerError::ShutDown);
        }

        let guard = self.runtime.lock();
        let runtime = guard.as_ref().ok_or(SchedulerError::ShutDown)?;
        let signal = self.shutdown_handle.signal();
        // The join handle is dropped; outcomes travel through the job itself.
        drop(runtime.spawn_blocking(move || job(&signal)));
        Ok(())
    }

    /// Stop accepting work and wait up to `timeout` for running jobs.
    ///
    /// Queued jobs that have not started are dropped. Calling this more than
    /// once is harmless.
    pub fn shutdown(&self, timeout: Duration) {
        if self.shutdown_handle.trigger() {
            tracing::info!("Shutting down worker pool with timeout {:?}", timeout);
        }

        let runtime = self.runtime.lock().take();
        if let Some(runtime) = runtime {
            runtime.shutdown_timeout(timeout);
            tracing::info!("Worker pool shutdown complete");
        }
    }

    /// Check if shutdown has been triggered
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_handle.is_triggered()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_handle.trigger();
        if let Some(runtime) = self.runtime.get_mut().take() {
            runtime.shutdown_background();
        }
    }
}

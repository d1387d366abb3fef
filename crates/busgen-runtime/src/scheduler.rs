//! Single-flight generation job scheduler

use crate::context::SharedContext;
use crate::job::{Job, JobHandle, JobOutcome};
use crate::pool::{PoolConfig, WorkerPool};
use crate::shutdown::ShutdownSignal;
use busgen_core::{GenResult, GeneratedArtifact, GenerationTarget, GeneratorConfig, SchedulerError};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// How long [`Scheduler::shutdown`] waits for running jobs
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

type Pipeline = Box<dyn FnOnce() -> GenResult<GeneratedArtifact> + Send + 'static>;
type Setup = Box<dyn FnOnce() + Send + 'static>;
type JobTable = DashMap<GenerationTarget, Arc<Job>>;

/// Runs generation pipelines on a worker pool, at most one per target at a
/// time.
///
/// Submitting a target that already has a pending or running job returns a
/// handle to that job instead of starting another. Finished jobs leave the
/// table, so a later submission generates again.
pub struct Scheduler {
    pool: WorkerPool,
    context: Arc<SharedContext>,
    jobs: Arc<JobTable>,
    started: Arc<DashSet<GenerationTarget>>,
    permits: Arc<Semaphore>,
    max_pending_jobs: usize,
}

impl Scheduler {
    /// Create a scheduler with its own shared context
    pub fn new(config: PoolConfig) -> Result<Self, SchedulerError> {
        Self::with_context(config, Arc::new(SharedContext::new()))
    }

    /// Create a scheduler whose jobs share `context`
    pub fn with_context(
        config: PoolConfig,
        context: Arc<SharedContext>,
    ) -> Result<Self, SchedulerError> {
        let max_pending_jobs = config.max_pending_jobs;
        let pool = WorkerPool::new(config)?;
        Ok(Self {
            pool,
            context,
            jobs: Arc::new(DashMap::new()),
            started: Arc::new(DashSet::new()),
            permits: Arc::new(Semaphore::new(max_pending_jobs)),
            max_pending_jobs,
        })
    }

    /// Create a scheduler sized by a generator configuration
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, SchedulerError> {
        Self::new(PoolConfig::from_config(config))
    }

    /// Context shared by every job of this scheduler
    pub fn context(&self) -> &Arc<SharedContext> {
        &self.context
    }

    /// Number of jobs currently pending or running
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Generate `target` with `pipeline`, or join the job already in flight
    pub fn submit<P>(&self, target: GenerationTarget, pipeline: P) -> JobHandle
    where
        P: FnOnce() -> GenResult<GeneratedArtifact> + Send + 'static,
    {
        self.enqueue(target, None, Box::new(pipeline))
    }

    /// Like [`submit`](Self::submit), running `setup` before the pipeline the
    /// first time this target starts. Setup runs at most once per shared
    /// context, whichever target gets there first.
    pub fn submit_with_setup<S, P>(
        &self,
        target: GenerationTarget,
        setup: S,
        pipeline: P,
    ) -> JobHandle
    where
        S: FnOnce() + Send + 'static,
        P: FnOnce() -> GenResult<GeneratedArtifact> + Send + 'static,
    {
        self.enqueue(target, Some(Box::new(setup)), Box::new(pipeline))
    }

    /// Stop the worker pool, waiting up to [`DEFAULT_SHUTDOWN_TIMEOUT`]
    pub fn shutdown(&self) {
        self.shutdown_timeout(DEFAULT_SHUTDOWN_TIMEOUT);
    }

    /// Stop the worker pool, waiting up to `timeout` for running jobs.
    ///
    /// Jobs that have not started fail with [`SchedulerError::ShutDown`].
    pub fn shutdown_timeout(&self, timeout: Duration) {
        self.pool.shutdown(timeout);
    }

    /// Check if the scheduler has been shut down
    pub fn is_shut_down(&self) -> bool {
        self.pool.is_shutting_down()
    }

    fn enqueue(
        &self,
        target: GenerationTarget,
        setup: Option<Setup>,
        pipeline: Pipeline,
    ) -> JobHandle {
        let job = match self.jobs.entry(target.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().state().is_in_flight() {
                    tracing::debug!(%target, "Joining in-flight job");
                    return JobHandle::new(entry.get().clone());
                }
                // Finished but not yet removed by its worker
                let job = Arc::new(Job::new(target.clone()));
                entry.insert(job.clone());
                job
            }
            Entry::Vacant(entry) => {
                let job = Arc::new(Job::new(target.clone()));
                entry.insert(job.clone());
                job
            }
        };
        let handle = JobHandle::new(job.clone());

        let mut guard = CompletionGuard {
            job,
            jobs: self.jobs.clone(),
            signal: self.pool.shutdown_signal(),
            _permit: None,
        };

        if self.pool.is_shutting_down() {
            guard.complete(Err(SchedulerError::ShutDown.into()));
            return handle;
        }

        let permit = match self.permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                let err = SchedulerError::PoolExhausted {
                    pending: self.max_pending_jobs,
                    limit: self.max_pending_jobs,
                };
                tracing::warn!(%target, "Rejecting job: {}", err);
                guard.complete(Err(err.into()));
                return handle;
            }
        };

        guard._permit = Some(permit);
        let run = JobRun {
            guard,
            context: self.context.clone(),
            started: self.started.clone(),
            setup,
            pipeline,
        };

        tracing::debug!(%target, "Job queued");
        // On failure the closure is dropped and the guard fails the job.
        if let Err(err) = self.pool.execute(move |signal| run.run(signal)) {
            tracing::debug!(%target, "Job not queued: {}", err);
        }
        handle
    }
}

/// Everything a worker needs to run one job
struct JobRun {
    guard: CompletionGuard,
    context: Arc<SharedContext>,
    started: Arc<DashSet<GenerationTarget>>,
    setup: Option<Setup>,
    pipeline: Pipeline,
}

impl JobRun {
    fn run(self, signal: &ShutdownSignal) {
        let JobRun {
            guard,
            context,
            started,
            setup,
            pipeline,
        } = self;
        let job = guard.job.clone();
        let target = job.target().clone();

        if signal.is_triggered() {
            guard.complete(Err(SchedulerError::ShutDown.into()));
            return;
        }
        if !job.start() {
            return;
        }
        tracing::debug!(%target, "Job running");

        let result = catch_unwind(AssertUnwindSafe(|| {
            if let Some(setup) = setup
                && started.insert(target.clone())
            {
                context.run_once(setup);
            }
            pipeline()
        }));

        let outcome: JobOutcome = match result {
            Ok(Ok(artifact)) => {
                tracing::debug!(%target, class = %artifact.class_name(), "Job done");
                Ok(Arc::new(artifact))
            }
            Ok(Err(err)) => {
                tracing::debug!(%target, "Job failed: {}", err);
                Err(err)
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::warn!(%target, "Job panicked: {}", reason);
                Err(SchedulerError::Interrupted {
                    target: target.to_string(),
                    reason,
                }
                .into())
            }
        };
        guard.complete(outcome);
    }
}

/// Finishes its job exactly once and releases the job's table entry.
///
/// If dropped before [`complete`](Self::complete) (the worker pool discarded
/// the task), the job fails with `ShutDown` or `Interrupted`.
struct CompletionGuard {
    job: Arc<Job>,
    jobs: Arc<JobTable>,
    signal: ShutdownSignal,
    _permit: Option<OwnedSemaphorePermit>,
}

impl CompletionGuard {
    fn complete(self, outcome: JobOutcome) {
        self.job.finish(outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let err = if self.signal.is_triggered() {
            SchedulerError::ShutDown
        } else {
            SchedulerError::Interrupted {
                target: self.job.target().to_string(),
                reason: "job was dropped before completing".to_string(),
            }
        };
        self.job.finish(Err(err.into()));
        self.jobs
            .remove_if(self.job.target(), |_, current| Arc::ptr_eq(current, &self.job));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "pipeline panicked".to_string()
    }
}

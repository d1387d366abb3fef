//! Generation jobs and the handles callers wait on

use busgen_core::{GenError, GeneratedArtifact, GenerationTarget, JobState};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// What every waiter of a job receives
pub type JobOutcome = Result<Arc<GeneratedArtifact>, GenError>;

#[derive(Debug)]
struct JobSlot {
    state: JobState,
    outcome: Option<JobOutcome>,
}

/// One generation job. Shared between the scheduler, the worker running it
/// and every [`JobHandle`].
#[derive(Debug)]
pub(crate) struct Job {
    target: GenerationTarget,
    slot: Mutex<JobSlot>,
    done: Condvar,
}

impl Job {
    pub(crate) fn new(target: GenerationTarget) -> Self {
        Self {
            target,
            slot: Mutex::new(JobSlot {
                state: JobState::Pending,
                outcome: None,
            }),
            done: Condvar::new(),
        }
    }

    pub(crate) fn target(&self) -> &GenerationTarget {
        &self.target
    }

    pub(crate) fn state(&self) -> JobState {
        self.slot.lock().state
    }

    /// Move from `Pending` to `Running`. Returns `false` if the job already
    /// left `Pending`.
    pub(crate) fn start(&self) -> bool {
        let mut slot = self.slot.lock();
        if !slot.state.can_transition_to(JobState::Running) {
            return false;
        }
        slot.state = JobState::Running;
        true
    }

    /// Record the outcome and wake every waiter.
    ///
    /// Only the first call has an effect; returns whether this call finished
    /// the job.
    pub(crate) fn finish(&self, outcome: JobOutcome) -> bool {
        let next = if outcome.is_ok() {
            JobState::Done
        } else {
            JobState::Failed
        };

        let mut slot = self.slot.lock();
        if !slot.state.can_transition_to(next) {
            return false;
        }
        slot.state = next;
        slot.outcome = Some(outcome);
        drop(slot);

        self.done.notify_all();
        true
    }

    fn wait(&self) -> JobOutcome {
        let mut slot = self.slot.lock();
        loop {
            if let Some(outcome) = &slot.outcome {
                return outcome.clone();
            }
            self.done.wait(&mut slot);
        }
    }

    fn try_outcome(&self) -> Option<JobOutcome> {
        self.slot.lock().outcome.clone()
    }
}

/// Caller-side view of a submitted job.
///
/// Handles are cheap to clone. All handles obtained for the same in-flight
/// target refer to the same job and observe the same outcome.
#[derive(Clone)]
pub struct JobHandle {
    job: Arc<Job>,
}

impl JobHandle {
    pub(crate) fn new(job: Arc<Job>) -> Self {
        Self { job }
    }

    /// The target being generated
    pub fn target(&self) -> &GenerationTarget {
        self.job.target()
    }

    /// Current job state
    pub fn state(&self) -> JobState {
        self.job.state()
    }

    /// Whether the job reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.job.state().is_terminal()
    }

    /// Whether both handles refer to the same job
    pub fn same_job(&self, other: &JobHandle) -> bool {
        Arc::ptr_eq(&self.job, &other.job)
    }

    /// Block until the job finishes and return its outcome
    pub fn wait(&self) -> JobOutcome {
        self.job.wait()
    }

    /// The outcome, if the job already finished
    pub fn try_outcome(&self) -> Option<JobOutcome> {
        self.job.try_outcome()
    }
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("target", self.target())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
#[path = "job/job_tests.rs"]
mod job_tests;

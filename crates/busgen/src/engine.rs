//! Shared generation state and the per-target generation flow

use busgen_cache::{ArtifactCache, ArtifactSink, FsArtifactSink};
use busgen_codegen::{DecoratorRegistry, SynthesisContext};
use busgen_core::{
    GenResult, GeneratedArtifact, GenerationTarget, GeneratorConfig, ModelBuilder,
    ScanOutcome, TypeScanner, TypeUniverse,
};
use busgen_runtime::{JobHandle, Scheduler};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Inputs every synthesis pipeline reads. Shared with worker threads.
pub(crate) struct Pipelines {
    pub(crate) config: GeneratorConfig,
    pub(crate) scanner: TypeScanner,
    pub(crate) builder: ModelBuilder,
    pub(crate) ctx: SynthesisContext,
    pub(crate) registry: DecoratorRegistry,
}

/// Commit result of one class, shared by every caller publishing it
type CommitGate = Arc<OnceLock<GenResult<()>>>;

/// A target whose artifact may still be in production.
///
/// Returned by [`Engine::start_target`]; [`Engine::finish_target`] waits for
/// the artifact and publishes it.
pub(crate) struct PendingTarget {
    target: GenerationTarget,
    state: Pending,
}

enum Pending {
    AlreadyGenerated,
    Cached(Arc<GeneratedArtifact>),
    Running(JobHandle),
}

/// One generation session: a type universe, a scheduler, a cache and a sink.
///
/// Create one per build and hand it to the generators. Scans are memoized for
/// the lifetime of the engine.
pub struct Engine {
    shared: Arc<Pipelines>,
    scheduler: Scheduler,
    cache: ArtifactCache,
    sink: Arc<dyn ArtifactSink>,
    commits: Mutex<HashMap<String, CommitGate>>,
}

impl Engine {
    /// Create an engine writing through `sink`.
    ///
    /// Fails if the configuration does not validate or the worker pool
    /// cannot start.
    pub fn new(
        config: GeneratorConfig,
        universe: Arc<dyn TypeUniverse>,
        sink: Arc<dyn ArtifactSink>,
    ) -> GenResult<Self> {
        config.validate()?;

        let ctx = SynthesisContext::from_config(&config);
        let registry = DecoratorRegistry::with_defaults(&ctx);
        let builder = config
            .annotations
            .qualifiers
            .iter()
            .fold(ModelBuilder::new(), |builder, q| builder.with_qualifier(q.clone()));
        let scheduler = Scheduler::from_config(&config)?;
        let cache = ArtifactCache::from_config(&config);

        tracing::info!(
            packages = ?config.packages,
            workers = config.worker_threads,
            cache_dir = %config.cache_dir.display(),
            "Generation engine ready"
        );

        Ok(Self {
            shared: Arc::new(Pipelines {
                scanner: TypeScanner::new(universe),
                config,
                builder,
                ctx,
                registry,
            }),
            scheduler,
            cache,
            sink,
            commits: Mutex::new(HashMap::new()),
        })
    }

    /// Create an engine writing to the configured output directory.
    pub fn with_output_dir(config: GeneratorConfig, universe: Arc<dyn TypeUniverse>) -> GenResult<Self> {
        let sink = Arc::new(FsArtifactSink::from_config(&config));
        Self::new(config, universe, sink)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.shared.config
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn sink(&self) -> &Arc<dyn ArtifactSink> {
        &self.sink
    }

    pub(crate) fn pipelines(&self) -> &Arc<Pipelines> {
        &self.shared
    }

    /// Scan the configured packages for `annotation`.
    pub fn scan(&self, annotation: &str) -> Arc<ScanOutcome> {
        self.shared
            .scanner
            .scan(annotation, &self.shared.config.packages)
    }

    /// Generate `target` and return the generated class name.
    ///
    /// A class already created through the sink is not generated again.
    /// Otherwise the cached artifact is reused when allowed, or `pipeline`
    /// runs on the scheduler (joining a job already in flight for the same
    /// target). The result is committed to the sink and mirrored into the
    /// cache.
    ///
    /// Callers sharing one job all return the outcome of its single commit:
    /// `Ok` only once the source is in the sink.
    pub(crate) fn generate_target<P>(&self, target: GenerationTarget, pipeline: P) -> GenResult<String>
    where
        P: FnOnce(&Pipelines) -> GenResult<GeneratedArtifact> + Send + 'static,
    {
        let pending = self.start_target(target, pipeline);
        self.finish_target(pending)
    }

    /// Submit `target` without waiting for it.
    pub(crate) fn start_target<P>(&self, target: GenerationTarget, pipeline: P) -> PendingTarget
    where
        P: FnOnce(&Pipelines) -> GenResult<GeneratedArtifact> + Send + 'static,
    {
        let class_name = target.class_name();
        if !self.sink.should_generate(&class_name) {
            tracing::debug!(%target, class = %class_name, "Already generated");
            return PendingTarget {
                target,
                state: Pending::AlreadyGenerated,
            };
        }

        if self.shared.config.reuse_cached_artifacts
            && let Some(artifact) = self.cache.read(&target)
        {
            tracing::info!(%target, "Reusing cached artifact");
            return PendingTarget {
                target,
                state: Pending::Cached(Arc::new(artifact)),
            };
        }

        let setup = {
            let shared = self.shared.clone();
            move || {
                shared.scanner.prime(&shared.config.packages);
            }
        };
        let shared = self.shared.clone();
        let job = self
            .scheduler
            .submit_with_setup(target.clone(), setup, move || pipeline(&shared));
        PendingTarget {
            target,
            state: Pending::Running(job),
        }
    }

    /// Wait for a started target, publish it and return the class name.
    pub(crate) fn finish_target(&self, pending: PendingTarget) -> GenResult<String> {
        let PendingTarget { target, state } = pending;
        let qualified = target.class_name().qualified();
        let artifact = match state {
            Pending::AlreadyGenerated => return self.committed(&qualified).map(|()| qualified),
            Pending::Cached(artifact) => Ok(artifact),
            Pending::Running(job) => job.wait(),
        };

        let result = artifact.and_then(|artifact| {
            self.publish(&target, &artifact)?;
            Ok(qualified)
        });
        if let Err(err) = &result {
            tracing::error!(
                %target,
                strategy = %target.strategy(),
                "Generation failed: {}",
                err
            );
        }
        result
    }

    /// Commit `artifact` once per class; concurrent callers wait for that
    /// commit and share its outcome.
    fn publish(&self, target: &GenerationTarget, artifact: &GeneratedArtifact) -> GenResult<()> {
        let key = artifact.class_name().qualified();
        let gate = self.commits.lock().entry(key.clone()).or_default().clone();
        let outcome = gate.get_or_init(|| self.commit(target, artifact)).clone();

        if outcome.is_err() {
            // The sink released the reservation; a later call may retry.
            let mut commits = self.commits.lock();
            if commits.get(&key).is_some_and(|current| Arc::ptr_eq(current, &gate)) {
                commits.remove(&key);
            }
        }
        outcome
    }

    /// Outcome of a commit of `qualified` started by this engine, waiting
    /// for it if it is still running
    fn committed(&self, qualified: &str) -> GenResult<()> {
        let gate = self.commits.lock().get(qualified).cloned();
        match gate {
            Some(gate) => gate.wait().clone(),
            None => Ok(()),
        }
    }

    fn commit(&self, target: &GenerationTarget, artifact: &GeneratedArtifact) -> GenResult<()> {
        let Some(handle) = self.sink.try_create(artifact.class_name()) else {
            // Reserved through the sink by someone outside this engine
            return Ok(());
        };
        self.sink.commit(handle, artifact.source())?;

        if let Err(err) = self.cache.write(target, artifact) {
            tracing::warn!(%target, "Could not update artifact cache: {}", err);
        }
        Ok(())
    }

    /// Stop the worker pool. Pending generations fail with a scheduler error.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }
}

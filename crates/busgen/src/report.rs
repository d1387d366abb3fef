//! Whole-build generation pass

use crate::engine::{Engine, PendingTarget};
use crate::generator::{Generator, ObserverGenerator, RpcProxyLoaderGenerator};
use busgen_core::{GenError, GenerationTarget};
use std::collections::VecDeque;
use std::sync::Arc;

/// Outcome of one target in a generation pass
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    Generated { class_name: String },
    Failed { error: GenError },
}

/// Per-target results of [`generate_all`], in generation order
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<(GenerationTarget, TargetOutcome)>,
    /// Skipped scan prefixes and packages, as messages
    pub scan_warnings: Vec<String>,
}

impl GenerationReport {
    pub fn generated(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|(_, o)| match o {
            TargetOutcome::Generated { class_name } => Some(class_name.as_str()),
            TargetOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&GenerationTarget, &GenError)> {
        self.outcomes.iter().filter_map(|(t, o)| match o {
            TargetOutcome::Failed { error } => Some((t, error)),
            TargetOutcome::Generated { .. } => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// First failure, used as the pass result
    pub fn first_error(&self) -> Option<&GenError> {
        self.failures().next().map(|(_, e)| e)
    }
}

/// Generate the proxy loader and the subscription class of every observer
/// bean in the configured packages.
///
/// A failing target is recorded and the pass continues with the next one.
pub fn generate_all(engine: &Arc<Engine>) -> GenerationReport {
    let mut report = GenerationReport::default();
    let config = engine.config();

    let loader = RpcProxyLoaderGenerator::new(engine.clone());
    let contract = config.loader_contract.clone();
    record(&mut report, GenerationTarget::rpc_proxy_loader(&contract), loader.generate(&contract));

    let observers = ObserverGenerator::new(engine.clone());
    let beans = engine.scan(&config.annotations.observes);
    report
        .scan_warnings
        .extend(beans.warnings().iter().map(ToString::to_string));
    // Keep up to max_pending_jobs observers in flight; results are recorded
    // in scan order.
    let window = config.max_pending_jobs.max(1);
    let mut in_flight = VecDeque::with_capacity(window);
    for bean in beans.types() {
        if in_flight.len() == window {
            finish_oldest(&mut report, engine, &mut in_flight);
        }
        in_flight.push_back((GenerationTarget::observer(&bean.name), observers.start(&bean.name)));
    }
    while !in_flight.is_empty() {
        finish_oldest(&mut report, engine, &mut in_flight);
    }

    let generated = report.generated().count();
    let failed = report.outcomes.len() - generated;
    if failed > 0 {
        tracing::error!(generated, failed, "Generation pass finished with failures");
    } else {
        tracing::info!(generated, "Generation pass finished");
    }
    report
}

fn finish_oldest(
    report: &mut GenerationReport,
    engine: &Engine,
    in_flight: &mut VecDeque<(GenerationTarget, PendingTarget)>,
) {
    if let Some((target, pending)) = in_flight.pop_front() {
        record(report, target, engine.finish_target(pending));
    }
}

fn record(report: &mut GenerationReport, target: GenerationTarget, result: Result<String, GenError>) {
    let outcome = match result {
        Ok(class_name) => TargetOutcome::Generated { class_name },
        Err(error) => TargetOutcome::Failed { error },
    };
    report.outcomes.push((target, outcome));
}

//! Generators invoked by the build for one requested type each

use crate::engine::{Engine, PendingTarget, Pipelines};
use busgen_codegen::{generate_loader, generate_observer};
use busgen_core::{
    ClassName, GenError, GenResult, GeneratedArtifact, GenerationTarget, ModelError, Strategy,
};
use std::sync::Arc;

/// Turns a requested type name into a generated class.
pub trait Generator: Send + Sync {
    /// Strategy this generator implements
    fn strategy(&self) -> Strategy;

    /// Generate the class for `type_name` and return its fully-qualified name
    fn generate(&self, type_name: &str) -> GenResult<String>;
}

/// Generates the loader class registering a proxy for every remote interface.
///
/// The requested type is the loader contract; the loader covers every type in
/// the configured packages carrying the remote annotation.
pub struct RpcProxyLoaderGenerator {
    engine: Arc<Engine>,
}

impl RpcProxyLoaderGenerator {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

impl Generator for RpcProxyLoaderGenerator {
    fn strategy(&self) -> Strategy {
        Strategy::RpcProxy
    }

    fn generate(&self, type_name: &str) -> GenResult<String> {
        let target = GenerationTarget::rpc_proxy_loader(type_name);
        let class_name = target.class_name();
        self.engine
            .generate_target(target, move |p| synthesize_loader(p, &class_name))
    }
}

fn synthesize_loader(p: &Pipelines, class_name: &ClassName) -> GenResult<GeneratedArtifact> {
    let remotes = p
        .scanner
        .find_annotated_types(&p.config.annotations.remote, &p.config.packages);
    let interfaces = p
        .builder
        .build_candidates(remotes.iter().map(|t| t.as_ref()), Strategy::RpcProxy);

    tracing::info!(
        class = %class_name,
        candidates = remotes.len(),
        proxies = interfaces.len(),
        "Generating proxy loader"
    );
    generate_loader(class_name, &interfaces, &p.ctx)
        .map_err(|e| GenError::synthesis(Strategy::RpcProxy, e))
}

/// Generates the subscription class of one observer bean.
pub struct ObserverGenerator {
    engine: Arc<Engine>,
}

impl ObserverGenerator {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Submit the subscription class of `type_name` without waiting for it
    pub(crate) fn start(&self, type_name: &str) -> PendingTarget {
        let target = GenerationTarget::observer(type_name);
        let class_name = target.class_name();
        let bean = type_name.to_string();
        self.engine
            .start_target(target, move |p| synthesize_observer(p, &bean, &class_name))
    }
}

impl Generator for ObserverGenerator {
    fn strategy(&self) -> Strategy {
        Strategy::ObserverSubscription
    }

    fn generate(&self, type_name: &str) -> GenResult<String> {
        self.engine.finish_target(self.start(type_name))
    }
}

fn synthesize_observer(
    p: &Pipelines,
    bean: &str,
    class_name: &ClassName,
) -> GenResult<GeneratedArtifact> {
    let package = ClassName::parse(bean).package().to_string();
    let raw = p
        .scanner
        .universe()
        .types_in(&package)
        .ok()
        .and_then(|types| types.into_iter().find(|t| t.name == bean))
        .ok_or_else(|| ModelError::UnknownType {
            type_name: bean.to_string(),
        })?;
    let descriptor = p.builder.build(&raw, Strategy::ObserverSubscription)?;

    tracing::info!(class = %class_name, %bean, "Generating observer subscriptions");
    generate_observer(class_name, &descriptor, &p.registry, &p.ctx)
        .map_err(|e| GenError::synthesis(Strategy::ObserverSubscription, e))
}

//! Generation targets and the artifacts they produce

use serde::{Deserialize, Serialize};

/// How a target type is turned into generated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One loader class registering a bus proxy for every remote interface
    RpcProxy,
    /// One subscription class per observer bean
    ObserverSubscription,
}

impl Strategy {
    /// Whether candidate types must be interfaces for this strategy
    pub fn requires_interface(&self) -> bool {
        matches!(self, Strategy::RpcProxy)
    }

    /// Get a human-readable description of this strategy
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::RpcProxy => "RPC proxy loader",
            Strategy::ObserverSubscription => "event observer subscriptions",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::RpcProxy => write!(f, "rpc-proxy"),
            Strategy::ObserverSubscription => write!(f, "observer-subscription"),
        }
    }
}

/// A fully-qualified Java class name split into package and simple name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassName {
    package: String,
    simple: String,
}

impl ClassName {
    /// Create a class name from its parts
    pub fn new(package: impl Into<String>, simple: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple: simple.into(),
        }
    }

    /// Split a fully-qualified name at its last dot
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((package, simple)) => Self::new(package, simple),
            None => Self::new("", qualified),
        }
    }

    /// The package, empty for the default package
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The simple (unqualified) class name
    pub fn simple_name(&self) -> &str {
        &self.simple
    }

    /// The fully-qualified class name
    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.simple.clone()
        } else {
            format!("{}.{}", self.package, self.simple)
        }
    }
}

impl std::fmt::Display for ClassName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// Identifies one unit of code generation: a type plus a strategy.
///
/// Targets are the single-flight key of the scheduler and the key of the
/// artifact cache, so the generated class name is derived from the target
/// alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenerationTarget {
    type_name: String,
    strategy: Strategy,
}

impl GenerationTarget {
    pub fn new(type_name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            type_name: type_name.into(),
            strategy,
        }
    }

    /// Target for the loader class implementing `contract`
    pub fn rpc_proxy_loader(contract: impl Into<String>) -> Self {
        Self::new(contract, Strategy::RpcProxy)
    }

    /// Target for the subscription class of an observer bean
    pub fn observer(bean: impl Into<String>) -> Self {
        Self::new(bean, Strategy::ObserverSubscription)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The class generated for this target.
    ///
    /// `p.RpcProxyLoader` becomes `p.RpcProxyLoaderImpl`; observer bean
    /// `p.Outer$Bean` becomes `p.Outer_Bean_ObserverSubscriptions`.
    pub fn class_name(&self) -> ClassName {
        let source = ClassName::parse(&self.type_name);
        let simple = source.simple_name().replace('$', "_");
        let generated = match self.strategy {
            Strategy::RpcProxy => format!("{simple}Impl"),
            Strategy::ObserverSubscription => format!("{simple}_ObserverSubscriptions"),
        };
        ClassName::new(source.package(), generated)
    }
}

impl std::fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.type_name, self.strategy)
    }
}

/// Generated source plus the class it defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    class_name: ClassName,
    source: String,
}

impl GeneratedArtifact {
    pub fn new(class_name: ClassName, source: impl Into<String>) -> Self {
        Self {
            class_name,
            source: source.into(),
        }
    }

    pub fn class_name(&self) -> &ClassName {
        &self.class_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

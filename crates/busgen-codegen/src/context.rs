//! Names the synthesizers need from the configuration.

use busgen_core::{AnnotationNames, BusApi, GeneratorConfig};

/// Read-only inputs shared by every synthesis strategy.
#[derive(Debug, Clone)]
pub struct SynthesisContext {
    pub bus: BusApi,
    pub annotations: AnnotationNames,
    /// Interface implemented by the generated proxy loader
    pub loader_contract: String,
    /// Name of the bus variable in generated method bodies
    pub bus_var: String,
    /// Name of the observer bean variable in generated subscription code
    pub instance_var: String,
}

impl SynthesisContext {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            bus: config.bus.clone(),
            annotations: config.annotations.clone(),
            loader_contract: config.loader_contract.clone(),
            ..Self::default()
        }
    }
}

impl Default for SynthesisContext {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self {
            bus: config.bus,
            annotations: config.annotations,
            loader_contract: config.loader_contract,
            bus_var: "bus".to_string(),
            instance_var: "instance".to_string(),
        }
    }
}

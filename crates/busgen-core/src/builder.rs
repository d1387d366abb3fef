//! Structural model builder: raw types → immutable descriptors

use crate::error::ModelError;
use crate::ident::{is_identifier, is_qualified_name};
use crate::model::{
    JavaType, MethodDescriptor, ParameterDescriptor, Qualifier, QualifierSet, TypeDescriptor,
};
use crate::target::Strategy;
use crate::universe::{RawMethod, RawType};
use std::collections::HashSet;

/// Converts raw types from the universe into [`TypeDescriptor`]s.
///
/// Building is deterministic: the same raw type always yields an equal
/// descriptor.
#[derive(Debug, Default, Clone)]
pub struct ModelBuilder {
    extra_qualifiers: HashSet<String>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `annotation` as a qualifier even when the universe does not flag it
    pub fn with_qualifier(mut self, annotation: impl Into<String>) -> Self {
        self.extra_qualifiers.insert(annotation.into());
        self
    }

    /// Model a single type for `strategy`.
    pub fn build(&self, raw: &RawType, strategy: Strategy) -> Result<TypeDescriptor, ModelError> {
        if strategy.requires_interface() && !raw.is_interface() {
            return Err(ModelError::NotAnInterface {
                type_name: raw.name.clone(),
                strategy,
            });
        }
        if !is_qualified_name(&raw.name.replace('$', ".")) {
            return Err(ModelError::InvalidIdentifier {
                type_name: raw.name.clone(),
                identifier: raw.name.clone(),
                kind: "type",
            });
        }

        let methods = raw
            .methods
            .iter()
            .map(|m| self.build_method(raw, m))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TypeDescriptor {
            name: raw.name.clone(),
            is_interface: raw.is_interface(),
            annotations: raw.annotations.clone(),
            methods,
        })
    }

    /// Model every candidate, skipping the ones that fail.
    ///
    /// Each skipped type is reported at WARN with the strategy that rejected
    /// it; the remaining candidates keep their order.
    pub fn build_candidates<'a, I>(&self, candidates: I, strategy: Strategy) -> Vec<TypeDescriptor>
    where
        I: IntoIterator<Item = &'a RawType>,
    {
        candidates
            .into_iter()
            .filter_map(|raw| match self.build(raw, strategy) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    tracing::warn!(
                        type_name = %raw.name,
                        %strategy,
                        "Skipping candidate type: {}",
                        e
                    );
                    None
                }
            })
            .collect()
    }

    fn build_method(&self, owner: &RawType, raw: &RawMethod) -> Result<MethodDescriptor, ModelError> {
        if !is_identifier(&raw.name) {
            return Err(ModelError::InvalidIdentifier {
                type_name: owner.name.clone(),
                identifier: raw.name.clone(),
                kind: "method",
            });
        }

        let mut seen = HashSet::new();
        let mut parameters = Vec::with_capacity(raw.parameters.len());
        for (index, parameter) in raw.parameters.iter().enumerate() {
            let name = parameter
                .name
                .clone()
                .unwrap_or_else(|| format!("a{index}"));
            if !is_identifier(&name) {
                return Err(ModelError::InvalidIdentifier {
                    type_name: owner.name.clone(),
                    identifier: name,
                    kind: "parameter",
                });
            }
            if !seen.insert(name.clone()) {
                return Err(ModelError::DuplicateParameter {
                    type_name: owner.name.clone(),
                    method: raw.name.clone(),
                    parameter: name,
                });
            }

            let mut qualifiers = QualifierSet::new();
            for annotation in &parameter.annotations {
                if annotation.qualifier || self.extra_qualifiers.contains(&annotation.name) {
                    qualifiers.insert(Qualifier::from(annotation));
                }
            }

            let ty = JavaType::new(parameter.ty.as_str());
            let problem = if ty.is_void() {
                Some("void is not a parameter type".to_string())
            } else {
                ty.syntax_problem()
            };
            if let Some(reason) = problem {
                return Err(invalid_type(owner, raw, &ty, reason));
            }

            parameters.push(ParameterDescriptor {
                name,
                ty,
                annotations: parameter.annotations.clone(),
                qualifiers,
            });
        }

        let return_type = JavaType::new(raw.return_type.as_str());
        if let Some(reason) = return_type.syntax_problem() {
            return Err(invalid_type(owner, raw, &return_type, reason));
        }

        Ok(MethodDescriptor {
            name: raw.name.clone(),
            return_type,
            annotations: raw.annotations.clone(),
            parameters,
        })
    }
}

fn invalid_type(owner: &RawType, method: &RawMethod, ty: &JavaType, reason: String) -> ModelError {
    ModelError::InvalidType {
        type_name: owner.name.clone(),
        method: method.name.clone(),
        ty: ty.name().to_string(),
        reason,
    }
}

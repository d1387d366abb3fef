//! Annotation-keyed decorator dispatch.
//!
//! A decorator turns one annotated injection point into a statement of the
//! generated subscription method. Supporting a new annotation means
//! registering a function for its name.

use crate::ast::Stmt;
use crate::context::SynthesisContext;
use crate::observes::observes_decorator;
use busgen_core::{MethodDescriptor, ParameterDescriptor, SynthesisError, TypeDescriptor};
use std::collections::BTreeMap;

/// An annotated method parameter of a bean.
#[derive(Debug, Clone, Copy)]
pub struct InjectionPoint<'a> {
    pub bean: &'a TypeDescriptor,
    pub method: &'a MethodDescriptor,
    pub parameter: &'a ParameterDescriptor,
    /// The annotation that selected this point
    pub annotation: &'a str,
}

/// Generates the statement for one injection point.
pub type Decorator = fn(&InjectionPoint<'_>, &SynthesisContext) -> Result<Stmt, SynthesisError>;

/// Maps annotation names to decorators.
#[derive(Debug, Clone, Default)]
pub struct DecoratorRegistry {
    entries: BTreeMap<String, Decorator>,
}

impl DecoratorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the observes decorator under the configured name
    pub fn with_defaults(ctx: &SynthesisContext) -> Self {
        let mut registry = Self::new();
        registry.register(ctx.annotations.observes.clone(), observes_decorator);
        registry
    }

    /// Register `decorator` for `annotation`, returning the one it replaces.
    pub fn register(&mut self, annotation: impl Into<String>, decorator: Decorator) -> Option<Decorator> {
        self.entries.insert(annotation.into(), decorator)
    }

    pub fn contains(&self, annotation: &str) -> bool {
        self.entries.contains_key(annotation)
    }

    /// Registered annotation names in sorted order
    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every parameter of `bean` carrying a registered annotation, in
    /// declaration order.
    pub fn injection_points<'a>(&self, bean: &'a TypeDescriptor) -> Vec<InjectionPoint<'a>> {
        let mut points = Vec::new();
        for method in bean.methods() {
            for parameter in method.parameters() {
                for annotation in parameter.annotations() {
                    if self.contains(&annotation.name) {
                        points.push(InjectionPoint {
                            bean,
                            method,
                            parameter,
                            annotation: &annotation.name,
                        });
                    }
                }
            }
        }
        points
    }

    /// Run the decorator registered for the point's annotation.
    pub fn decorate(&self, point: &InjectionPoint<'_>, ctx: &SynthesisContext) -> Result<Stmt, SynthesisError> {
        let decorator = self.entries.get(point.annotation).ok_or_else(|| {
            SynthesisError::UnknownDecorator {
                annotation: point.annotation.to_string(),
                type_name: point.bean.name().to_string(),
            }
        })?;
        decorator(point, ctx)
    }
}

//! Immutable structural model of scanned types.
//!
//! Descriptors are produced by [`ModelBuilder`](crate::ModelBuilder) and never
//! change afterwards; rebuilding a descriptor requires a fresh scan.

use crate::universe::Annotation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double",
];

/// A Java type reference as written in source (`int`, `java.util.List<java.lang.String>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JavaType(String);

impl JavaType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    /// The type as written
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.0.as_str())
    }

    /// The type with generic arguments removed, usable in a class literal.
    ///
    /// `java.util.Map<K, V>[]` erases to `java.util.Map[]`.
    pub fn erasure(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut depth = 0usize;
        for c in self.0.chars() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                _ if depth == 0 && !c.is_whitespace() => out.push(c),
                _ => {}
            }
        }
        out
    }

    /// The erased type without array brackets
    pub fn element_name(&self) -> String {
        self.erasure().trim_end_matches("[]").to_string()
    }

    /// The type as it must be written in source: nested-type `$` becomes `.`
    pub fn source_name(&self) -> String {
        self.0.replace('$', ".")
    }

    /// [`erasure`](Self::erasure) in source form, for class literals
    pub fn source_erasure(&self) -> String {
        self.erasure().replace('$', ".")
    }

    /// Why this is not a well-formed type reference, if it is not
    pub fn syntax_problem(&self) -> Option<String> {
        crate::ident::type_reference_problem(&self.0)
    }
}

impl std::fmt::Display for JavaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A qualifier attached to an injection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub name: String,
    #[serde(default)]
    pub members: BTreeMap<String, String>,
}

impl From<&Annotation> for Qualifier {
    fn from(annotation: &Annotation) -> Self {
        Self {
            name: annotation.name.clone(),
            members: annotation.members.clone(),
        }
    }
}

/// Set of qualifiers attached to an injection point.
///
/// Equality compares qualifier *names* only; insertion order and member values
/// are irrelevant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualifierSet {
    qualifiers: BTreeMap<String, Qualifier>,
}

impl QualifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from bare qualifier names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(Qualifier {
                name: name.into(),
                members: BTreeMap::new(),
            });
        }
        set
    }

    /// Insert a qualifier; a qualifier with the same name is replaced
    pub fn insert(&mut self, qualifier: Qualifier) {
        self.qualifiers.insert(qualifier.name.clone(), qualifier);
    }

    /// Qualifier names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.qualifiers.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Qualifier> {
        self.qualifiers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.qualifiers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.qualifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty()
    }
}

impl PartialEq for QualifierSet {
    fn eq(&self, other: &Self) -> bool {
        self.qualifiers.keys().eq(other.qualifiers.keys())
    }
}

impl Eq for QualifierSet {}

impl Hash for QualifierSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for name in self.qualifiers.keys() {
            name.hash(state);
        }
    }
}

/// Dispatch-time qualifier matching.
///
/// An absent set is treated as empty, so `qualifiers_match(Some(&empty), None)`
/// holds. The relation is symmetric.
pub fn qualifiers_match(a: Option<&QualifierSet>, b: Option<&QualifierSet>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (Some(set), None) | (None, Some(set)) => set.is_empty(),
        (None, None) => true,
    }
}

/// A modeled method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub(crate) name: String,
    pub(crate) ty: JavaType,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) qualifiers: QualifierSet,
}

impl ParameterDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &JavaType {
        &self.ty
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn qualifiers(&self) -> &QualifierSet {
        &self.qualifiers
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }
}

/// A modeled method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub(crate) name: String,
    pub(crate) return_type: JavaType,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &JavaType {
        &self.return_type
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }

    /// Endpoint name that encodes the erased parameter types.
    ///
    /// `bar(String, int)` becomes `bar:java.lang.String:int:`, which keeps
    /// overloads apart on the wire.
    pub fn typed_endpoint(&self) -> String {
        let mut endpoint = format!("{}:", self.name);
        for parameter in &self.parameters {
            endpoint.push_str(&parameter.ty.erasure());
            endpoint.push(':');
        }
        endpoint
    }
}

/// A modeled type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub(crate) name: String,
    pub(crate) is_interface: bool,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Fully-qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name usable in source: nested-type `$` becomes `.`
    pub fn source_name(&self) -> String {
        self.name.replace('$', ".")
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }
}

#[cfg(test)]
#[path = "model/model_tests.rs"]
mod model_tests;

//! The type universe the generator scans.
//!
//! A [`TypeUniverse`] is the read-only view of the host compiler's types: it
//! lists packages and hands out [`RawType`]s. Two implementations are
//! provided:
//!
//! - [`InMemoryUniverse`] built from a list of types
//! - [`DirectoryUniverse`] reading one JSON descriptor per type from a
//!   package-per-directory tree:
//!
//! ```text
//! universe/
//! └── com/example/
//!     ├── Greeter.json      {"name": "com.example.Greeter", "kind": "interface", ...}
//!     └── events/
//!         └── Ping.json
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a raw type.
pub type TypeHandle = Arc<RawType>;

/// Kind of a Java type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Interface,
    Class,
    Enum,
    Annotation,
}

/// An annotation as reported by the host compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Fully-qualified annotation type name.
    pub name: String,

    /// Member values, rendered as source text.
    #[serde(default)]
    pub members: BTreeMap<String, String>,

    /// Whether the annotation type is itself marked as a qualifier.
    #[serde(default)]
    pub qualifier: bool,
}

impl Annotation {
    /// A marker annotation with no members
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
            qualifier: false,
        }
    }

    /// A qualifier annotation with no members
    pub fn qualifier(name: impl Into<String>) -> Self {
        Self {
            qualifier: true,
            ..Self::marker(name)
        }
    }

    /// Add a member value
    pub fn with_member(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.insert(key.into(), value.into());
        self
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Declared name; absent when the host dropped debug names.
    #[serde(default)]
    pub name: Option<String>,

    /// Declared type, fully qualified.
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl RawParameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ty: ty.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A method declared on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMethod {
    pub name: String,

    #[serde(default = "void_type")]
    pub return_type: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

fn void_type() -> String {
    "void".to_string()
}

impl RawMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: void_type(),
            annotations: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn returning(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_parameter(mut self, parameter: RawParameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// A type as reported by the host compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawType {
    /// Fully-qualified name; nested types use `$`.
    pub name: String,

    pub kind: TypeKind,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub methods: Vec<RawMethod>,
}

impl RawType {
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, method: RawMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// The package part of the name
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether `annotation` appears on the type, a method, or a parameter
    pub fn carries(&self, annotation: &str) -> bool {
        let named = |a: &Annotation| a.name == annotation;
        self.annotations.iter().any(named)
            || self.methods.iter().any(|m| {
                m.annotations.iter().any(named)
                    || m.parameters.iter().any(|p| p.annotations.iter().any(named))
            })
    }
}

/// Errors raised by a type universe
#[derive(Error, Debug)]
pub enum UniverseError {
    /// No package matches the name
    #[error("package not found: {0}")]
    PackageNotFound(String),

    /// A package directory or descriptor file could not be read
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor file is not a valid type description
    #[error("malformed type descriptor {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A descriptor declares a type outside its package directory
    #[error("type {type_name} is declared in package directory {package}")]
    Misplaced { type_name: String, package: String },
}

/// Read-only, queryable view of every type visible to the generator.
///
/// Implementations are shared across worker threads without locking, so they
/// must not change while a build is running.
pub trait TypeUniverse: Send + Sync {
    /// List `prefix` and every package below it.
    fn list_packages(&self, prefix: &str) -> Result<Vec<String>, UniverseError>;

    /// List the types declared directly in `package`.
    fn types_in(&self, package: &str) -> Result<Vec<TypeHandle>, UniverseError>;
}

/// Check whether `package` is `prefix` or nested below it
fn is_within(package: &str, prefix: &str) -> bool {
    package == prefix
        || (package.starts_with(prefix) && package.as_bytes().get(prefix.len()) == Some(&b'.'))
}

/// Type universe held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUniverse {
    packages: BTreeMap<String, Vec<TypeHandle>>,
}

impl InMemoryUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a universe from a list of types
    pub fn from_types(types: impl IntoIterator<Item = RawType>) -> Self {
        let mut universe = Self::new();
        for ty in types {
            universe.insert(ty);
        }
        universe
    }

    /// Add a type to its package
    pub fn insert(&mut self, ty: RawType) {
        self.packages
            .entry(ty.package().to_string())
            .or_default()
            .push(Arc::new(ty));
    }
}

impl TypeUniverse for InMemoryUniverse {
    fn list_packages(&self, prefix: &str) -> Result<Vec<String>, UniverseError> {
        let found: Vec<String> = self
            .packages
            .keys()
            .filter(|p| is_within(p, prefix))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(UniverseError::PackageNotFound(prefix.to_string()));
        }
        Ok(found)
    }

    fn types_in(&self, package: &str) -> Result<Vec<TypeHandle>, UniverseError> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| UniverseError::PackageNotFound(package.to_string()))
    }
}

/// Type universe backed by a directory of JSON type descriptors.
#[derive(Debug, Clone)]
pub struct DirectoryUniverse {
    root: PathBuf,
}

impl DirectoryUniverse {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, package: &str) -> PathBuf {
        package
            .split('.')
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    /// Collect `package` and its sub-packages.
    ///
    /// A sub-directory that cannot be listed is still reported as a package
    /// so the failure surfaces when its types are requested.
    fn walk(&self, package: &str, dir: &Path, out: &mut Vec<String>) -> Result<(), UniverseError> {
        out.push(package.to_string());
        let entries = std::fs::read_dir(dir).map_err(|source| UniverseError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut children = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    children.push((format!("{package}.{name}"), path.clone()));
                }
            }
        }
        children.sort();

        for (child, path) in children {
            if self.walk(&child, &path, out).is_err() {
                tracing::debug!(package = %child, "Sub-package directory not listable");
            }
        }
        Ok(())
    }
}

impl TypeUniverse for DirectoryUniverse {
    fn list_packages(&self, prefix: &str) -> Result<Vec<String>, UniverseError> {
        let dir = self.package_dir(prefix);
        if !dir.is_dir() {
            return Err(UniverseError::PackageNotFound(prefix.to_string()));
        }
        let mut packages = Vec::new();
        self.walk(prefix, &dir, &mut packages)?;
        Ok(packages)
    }

    fn types_in(&self, package: &str) -> Result<Vec<TypeHandle>, UniverseError> {
        let dir = self.package_dir(package);
        if !dir.is_dir() {
            return Err(UniverseError::PackageNotFound(package.to_string()));
        }
        let entries = std::fs::read_dir(&dir).map_err(|source| UniverseError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| UniverseError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut types = Vec::with_capacity(files.len());
        for path in files {
            let content = std::fs::read_to_string(&path).map_err(|source| UniverseError::Io {
                path: path.clone(),
                source,
            })?;
            let ty: RawType = serde_json::from_str(&content)
                .map_err(|source| UniverseError::Malformed { path, source })?;
            if ty.package() != package {
                return Err(UniverseError::Misplaced {
                    type_name: ty.name,
                    package: package.to_string(),
                });
            }
            types.push(Arc::new(ty));
        }
        Ok(types)
    }
}

//! Type scanner: finds annotated types in a set of packages

use crate::error::ScanError;
use crate::ident::package_prefix_problem;
use crate::universe::{TypeHandle, TypeUniverse};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Result of one scan: the matching types plus every part of the universe
/// that could not be covered.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    types: Vec<TypeHandle>,
    warnings: Vec<ScanError>,
}

impl ScanOutcome {
    /// Matching types, each at most once, in discovery order
    pub fn types(&self) -> &[TypeHandle] {
        &self.types
    }

    /// Prefixes and packages that were skipped
    pub fn warnings(&self) -> &[ScanError] {
        &self.warnings
    }

    /// Whether part of the requested universe was skipped
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Names of the matching types
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Package contents, loaded once per package and then shared
type PackageEntry = Result<Arc<[TypeHandle]>, ScanError>;

/// Scans a [`TypeUniverse`] for types carrying a marker annotation.
///
/// Scans are memoized per `(annotation, prefixes)`: repeated calls within a
/// build return the same outcome. Package listings are loaded lazily and
/// cached, or up front with [`prime`](TypeScanner::prime).
pub struct TypeScanner {
    universe: Arc<dyn TypeUniverse>,
    packages: Mutex<HashMap<String, PackageEntry>>,
    scans: Mutex<HashMap<(String, Vec<String>), Arc<ScanOutcome>>>,
}

impl TypeScanner {
    pub fn new(universe: Arc<dyn TypeUniverse>) -> Self {
        Self {
            universe,
            packages: Mutex::new(HashMap::new()),
            scans: Mutex::new(HashMap::new()),
        }
    }

    /// The universe being scanned
    pub fn universe(&self) -> &Arc<dyn TypeUniverse> {
        &self.universe
    }

    /// Load every package under `prefixes` into the package cache.
    ///
    /// Returns the number of packages that were read successfully.
    pub fn prime(&self, prefixes: &[String]) -> usize {
        let mut loaded = 0;
        for prefix in prefixes {
            if package_prefix_problem(prefix).is_some() {
                continue;
            }
            if let Ok(packages) = self.universe.list_packages(prefix) {
                for package in packages {
                    if self.package_types(&package).is_ok() {
                        loaded += 1;
                    }
                }
            }
        }
        tracing::debug!(packages = loaded, "Type scanner primed");
        loaded
    }

    /// Find every type under `prefixes` that carries `annotation`.
    ///
    /// Malformed prefixes and unreadable packages are logged at WARN and
    /// recorded in the outcome; they never fail the whole scan.
    pub fn scan(&self, annotation: &str, prefixes: &[String]) -> Arc<ScanOutcome> {
        let key = (annotation.to_string(), prefixes.to_vec());
        if let Some(outcome) = self.scans.lock().get(&key) {
            return outcome.clone();
        }

        let outcome = Arc::new(self.scan_uncached(annotation, prefixes));
        // A concurrent scan with the same key may have finished first; keep
        // whichever was stored so every caller sees one outcome.
        self.scans.lock().entry(key).or_insert(outcome).clone()
    }

    /// Matching types only; skipped prefixes and packages are already logged.
    pub fn find_annotated_types(&self, annotation: &str, prefixes: &[String]) -> Vec<TypeHandle> {
        self.scan(annotation, prefixes).types().to_vec()
    }

    fn scan_uncached(&self, annotation: &str, prefixes: &[String]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut seen_types = HashSet::new();
        let mut seen_packages = HashSet::new();

        for prefix in prefixes {
            if let Some(reason) = package_prefix_problem(prefix) {
                let err = ScanError::MalformedPrefix {
                    prefix: prefix.clone(),
                    reason,
                };
                tracing::warn!(%prefix, "Skipping package prefix: {}", err);
                outcome.warnings.push(err);
                continue;
            }

            let packages = match self.universe.list_packages(prefix) {
                Ok(packages) => packages,
                Err(e) => {
                    let err = ScanError::UnreadablePackage {
                        package: prefix.clone(),
                        reason: e.to_string(),
                    };
                    tracing::warn!(%prefix, "Skipping package prefix: {}", err);
                    outcome.warnings.push(err);
                    continue;
                }
            };

            for package in packages {
                if !seen_packages.insert(package.clone()) {
                    continue;
                }
                match self.package_types(&package) {
                    Ok(types) => {
                        for ty in types.iter() {
                            if ty.carries(annotation) && seen_types.insert(ty.name.clone()) {
                                outcome.types.push(ty.clone());
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%package, "Skipping unreadable package: {}", err);
                        outcome.warnings.push(err);
                    }
                }
            }
        }

        if outcome.is_partial() {
            tracing::warn!(
                %annotation,
                found = outcome.types.len(),
                skipped = outcome.warnings.len(),
                "Partial scan result"
            );
        } else {
            tracing::debug!(%annotation, found = outcome.types.len(), "Scan complete");
        }
        outcome
    }

    fn package_types(&self, package: &str) -> PackageEntry {
        if let Some(entry) = self.packages.lock().get(package) {
            return entry.clone();
        }

        let entry: PackageEntry = self
            .universe
            .types_in(package)
            .map(Arc::from)
            .map_err(|e| ScanError::UnreadablePackage {
                package: package.to_string(),
                reason: e.to_string(),
            });
        self.packages
            .lock()
            .entry(package.to_string())
            .or_insert(entry)
            .clone()
    }
}

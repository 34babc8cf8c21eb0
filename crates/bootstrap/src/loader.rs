//! Load-if-absent module registry.

use crate::error::{BootError, BootErrorExt};
use fxhash::FxHashMap;
use sfa_domain::module::{ModuleId, ModuleSpec};
use sfa_domain::registry::LoadedModule;
use sfa_kernel::paths::ResolvedPaths;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Modules present in the process, in the order they were loaded.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: FxHashMap<ModuleId, LoadedModule>,
    order: Vec<ModuleId>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LoadedModule> {
        self.modules.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Loaded modules in load order.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedModule> {
        self.order.iter().filter_map(|id| self.modules.get(id))
    }

    fn insert(&mut self, module: LoadedModule) {
        self.order.push(module.id.clone());
        self.modules.insert(module.id.clone(), module);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    AlreadyLoaded,
}

/// Result of loading a list of modules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: Vec<ModuleId>,
    pub skipped: Vec<ModuleId>,
}

/// Locates, reads and registers module files.
#[derive(Debug, Default)]
pub struct ModuleLoader {
    registry: ModuleRegistry,
}

impl ModuleLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Loads `spec` unless it is registered already.
    ///
    /// # Errors
    /// * [`BootError::Unresolved`] when a dependency has not been loaded yet.
    /// * [`BootError::ModuleMissing`] when the file does not exist.
    /// * [`BootError::Io`] when the file exists but cannot be read.
    pub fn load(&mut self, spec: &ModuleSpec, paths: &ResolvedPaths) -> Result<LoadStatus, BootError> {
        if self.registry.contains(spec.id.as_str()) {
            return Ok(LoadStatus::AlreadyLoaded);
        }

        if let Some(dep) = spec.depends_on.iter().find(|dep| !self.registry.contains(dep.as_str())) {
            return Err(BootError::Unresolved {
                message: format!("'{}' needs '{dep}', which is not loaded yet", spec.id).into(),
                context: None,
            });
        }

        self.load_path(spec.id.clone(), &paths.module_path(spec))
    }

    /// Loads `specs` in exactly the given order, stopping at the first failure.
    ///
    /// # Errors
    /// See [`Self::load`].
    pub fn load_sequence<'a, I>(&mut self, specs: I, paths: &ResolvedPaths) -> Result<LoadSummary, BootError>
    where
        I: IntoIterator<Item = &'a ModuleSpec>,
    {
        let mut summary = LoadSummary::default();
        for spec in specs {
            match self.load(spec, paths)? {
                LoadStatus::Loaded => summary.loaded.push(spec.id.clone()),
                LoadStatus::AlreadyLoaded => summary.skipped.push(spec.id.clone()),
            }
        }
        Ok(summary)
    }

    /// Loads a file that is not part of a manifest, such as a delivered update script.
    ///
    /// # Errors
    /// [`BootError::ModuleMissing`] or [`BootError::Io`].
    pub fn load_path(&mut self, id: ModuleId, path: &Path) -> Result<LoadStatus, BootError> {
        if self.registry.contains(id.as_str()) {
            return Ok(LoadStatus::AlreadyLoaded);
        }

        let module = read_module(id, path)?;
        debug!(module = %module.id, path = %module.path.display(), size = module.size, "Module loaded");
        self.registry.insert(module);
        Ok(LoadStatus::Loaded)
    }
}

fn read_module(id: ModuleId, path: &Path) -> Result<LoadedModule, BootError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(BootError::ModuleMissing {
                message: format!("'{id}' expected at {}", path.display()).into(),
                context: None,
            });
        },
        Err(e) => return Err(e).context(format!("reading module '{id}' at {}", path.display())),
    };

    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(LoadedModule {
        id,
        path: path.to_path_buf(),
        checksum: hex::encode(hasher.finalize()),
        size: bytes.len() as u64,
    })
}

//! The set of modules the admin panel needs before it can serve a request.

use crate::error::{BootError, BootErrorExt};
use crate::resolver::resolve_load_order;
use fxhash::FxHashSet;
use serde::Deserialize;
use sfa_domain::module::{ModuleId, ModuleRoot, ModuleSpec};
use std::fs;
use std::path::Path;

/// Ordered, duplicate-free list of module specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
    modules: Vec<ModuleSpec>,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default, rename = "module")]
    modules: Vec<ModuleSpec>,
}

impl ModuleManifest {
    /// Builds a manifest from specs in declaration order.
    ///
    /// # Errors
    /// [`BootError::Manifest`] if two specs share an id.
    pub fn new(modules: Vec<ModuleSpec>) -> Result<Self, BootError> {
        let mut seen = FxHashSet::default();
        for spec in &modules {
            if !seen.insert(spec.id.as_str()) {
                return Err(BootError::Manifest {
                    message: format!("duplicate module id '{}'", spec.id).into(),
                    context: None,
                });
            }
        }
        Ok(Self { modules })
    }

    /// The stock admin load list, in its historical order.
    #[must_use]
    pub fn builtin() -> Self {
        Self { modules: builtin_modules() }
    }

    /// Parses `[[module]]` tables.
    ///
    /// ```toml
    /// [[module]]
    /// id = "SC_Query"
    /// root = "class"
    /// path = "SC_Query.php"
    /// depends_on = ["SC_DbConn"]
    /// ```
    ///
    /// # Errors
    /// [`BootError::ManifestParse`] for invalid TOML, [`BootError::Manifest`] for duplicates.
    pub fn from_toml_str(raw: &str) -> Result<Self, BootError> {
        let file: ManifestFile = toml::from_str(raw).context("module manifest")?;
        Self::new(file.modules)
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    /// [`BootError::Io`] if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, BootError> {
        let raw = fs::read_to_string(path)
            .context(format!("reading manifest {}", path.display()))?;
        Self::from_toml_str(&raw).context(format!("manifest {}", path.display()))
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ModuleSpec> {
        self.modules.iter().find(|spec| spec.id.as_str() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Dependency-respecting load order. See [`resolve_load_order`].
    ///
    /// # Errors
    /// [`BootError::UnknownDependency`] or [`BootError::CircularDependency`].
    pub fn resolve(&self) -> Result<Vec<&ModuleSpec>, BootError> {
        resolve_load_order(&self.modules)
    }
}

fn data(id: &'static str, path: &'static str) -> ModuleSpec {
    ModuleSpec::new(id, ModuleRoot::Data, path)
}

fn class(id: &'static str) -> ModuleSpec {
    ModuleSpec::new(id, ModuleRoot::Class, format!("{id}.php"))
}

fn class_ex(dir: &'static str, id: &'static str) -> ModuleSpec {
    ModuleSpec::new(id, ModuleRoot::ClassEx, format!("{dir}/{id}.php"))
}

fn builtin_modules() -> Vec<ModuleSpec> {
    const CONF: &str = "conf";

    vec![
        data(CONF, "conf/conf.php"),
        data("module_inc", "include/module.inc").after([CONF]),
        class_ex("util_extends", "GC_Utils_Ex").after([CONF]),
        class_ex("util_extends", "SC_Utils_Ex").after([CONF, "GC_Utils_Ex"]),
        class_ex("db_extends", "SC_DB_MasterData_Ex").after([CONF]),
        class_ex("db_extends", "SC_DB_DBFactory_Ex").after([CONF]),
        class("SC_View").after([CONF]),
        class("SC_DbConn").after(["SC_DB_DBFactory_Ex"]),
        class("SC_Session").after([CONF]),
        class("SC_Query").after(["SC_DbConn"]),
        class("SC_SelectSql"),
        class("SC_CheckError").after(["SC_Utils_Ex"]),
        class("SC_PageNavi"),
        class("SC_Date"),
        class("SC_Image"),
        class("SC_UploadFile").after(["SC_Image"]),
        class("SC_SiteInfo").after(["SC_Query"]),
        class("SC_SendMail").after([CONF]),
        class("SC_FormParam").after(["SC_CheckError"]),
        class("SC_CustomerList").after(["SC_SelectSql"]),
        class("SC_Customer").after(["SC_Query"]),
        class("SC_Pdf"),
        class_ex("helper_extends", "SC_Helper_PageLayout_Ex").after(["SC_Query"]),
        class_ex("helper_extends", "SC_Helper_DB_Ex").after(["SC_Query"]),
        data("Mail", "module/Mail/Mail.php"),
        data("Mail_mime", "module/Mail/mime.php").after(["Mail"]),
    ]
}

/// Ids of the built-in manifest, in declaration order.
#[must_use]
pub fn builtin_ids() -> Vec<ModuleId> {
    builtin_modules().into_iter().map(|spec| spec.id).collect()
}

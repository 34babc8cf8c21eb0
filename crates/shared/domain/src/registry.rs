//! Records of modules that made it into the process.

use crate::module::ModuleId;
use std::path::PathBuf;

/// A module whose file was located, read and fingerprinted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub id: ModuleId,
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the file contents.
    pub checksum: String,
    pub size: u64,
}

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `SFA__PATHS__ENTRY_DIR`.
pub const ENV_PREFIX: &str = "SFA";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_CONFIG: &str = "admin";

/// Custom error type for config loading.
#[sfa_derive::sfa_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration from a file with environment overrides layered on top.
///
/// 1. **Base file**: `path`, or `admin` (any extension the `config` crate understands)
///    in the working directory when no path is given. The file is required.
/// 2. **Environment**: variables prefixed with `SFA__`; nested keys are joined with `__`
///    (`SFA__INSTALL__INSTALLED=true` maps to `install.installed`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, a value has the wrong type,
/// or the merged tree does not deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use sfa_kernel::config::load_config;
/// use sfa_kernel::domain::config::BootConfig;
///
/// let cfg: BootConfig = load_config(Some("config/admin.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());
    info!("Loading config from {}", path.display());
    load_layered(&path, env_source())
}

/// Values are parsed up front: the flattened `BootConfig` cannot read `"true"` as a bool.
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR).try_parsing(true)
}

fn load_layered<T>(path: &Path, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(env)
        .build()
        .context(format!("Failed to build config from {}", path.display()))?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

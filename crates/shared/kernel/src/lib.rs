//! Kernel utilities shared by the bootstrap crates.
//! Keep this crate lightweight: configuration loading and the derived path table live here.
//!
//! ## Config loading
//! ```rust,ignore
//! use sfa_kernel::config::load_config;
//! use sfa_kernel::domain::config::BootConfig;
//!
//! let cfg: BootConfig = load_config(Some("admin.toml")).unwrap();
//! ```
//!
//! ## Paths
//! ```rust,ignore
//! use sfa_kernel::paths::ResolvedPaths;
//!
//! let paths = ResolvedPaths::resolve(&cfg)?;
//! println!("classes live in {}", paths.class_path.display());
//! ```

pub mod config;
pub mod paths;

pub use sfa_domain as domain;

//! # Domain Models
//!
//! Plain data shared by the bootstrap crates: configuration, module descriptors and
//! records of loaded modules. Only `serde` is allowed here; no filesystem access.

pub mod config;
pub mod module;
pub mod registry;

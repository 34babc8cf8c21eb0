use sfa_kernel::paths::PathError;
use std::borrow::Cow;

/// Everything that can stop the bootstrap. None of these are recovered locally.
#[sfa_derive::sfa_error]
pub enum BootError {
    /// The entry directory could not be resolved.
    #[error("Base path error{}: {source}", format_context(.context))]
    BasePath { source: PathError, context: Option<Cow<'static, str>> },

    /// Duplicate ids or an unreadable manifest file.
    #[error("Manifest error{}: {message}", format_context(.context))]
    Manifest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Manifest parse error{}: {source}", format_context(.context))]
    ManifestParse { source: toml::de::Error, context: Option<Cow<'static, str>> },

    /// A module depends on an id the manifest does not declare.
    #[error("Unknown dependency{}: {message}", format_context(.context))]
    UnknownDependency { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Circular dependency{}: {message}", format_context(.context))]
    CircularDependency { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A module was about to load before one of its dependencies.
    #[error("Unresolved dependency{}: {message}", format_context(.context))]
    Unresolved { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A required module file does not exist.
    #[error("Module missing{}: {message}", format_context(.context))]
    ModuleMissing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// An initialization hook failed.
    #[error("Hook error{}: {message}", format_context(.context))]
    Hook { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal bootstrap error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl BootError {
    /// `true` for failures to assemble the module set (files, manifest, dependency graph).
    #[must_use]
    pub const fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Manifest { .. }
                | Self::ManifestParse { .. }
                | Self::UnknownDependency { .. }
                | Self::CircularDependency { .. }
                | Self::Unresolved { .. }
                | Self::ModuleMissing { .. }
                | Self::Io { .. }
        )
    }
}

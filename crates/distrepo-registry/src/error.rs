//! Error types for the registry crate.

use std::fmt;

use distrepo_config::error::ConfigError;
use miette::Diagnostic;
use thiserror::Error;

/// Relation of a descriptor that was expected to be set but was not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingRelation {
    /// An architecture without an owning distribution.
    ArchDistro,
    /// An image type without an owning architecture.
    ImageTypeArch,
    /// An image type whose architecture has no owning distribution.
    ImageTypeDistro,
}

impl fmt::Display for MissingRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRelation::ArchDistro => {
                write!(
                    f,
                    "there is no distribution associated with the provided architecture"
                )
            }
            MissingRelation::ImageTypeArch => {
                write!(
                    f,
                    "there is no architecture associated with the provided image type"
                )
            }
            MissingRelation::ImageTypeDistro => {
                write!(
                    f,
                    "there is no distribution associated with the architecture of the provided image type"
                )
            }
        }
    }
}

/// Errors returned by [`RepoRegistry`](crate::RepoRegistry).
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Failed to load repository configuration: {0}")]
    #[diagnostic(
        code(distrepo_registry::config_load),
        help("Check the repository files under the configured paths")
    )]
    ConfigLoad(#[from] ConfigError),

    #[error("There are no repositories for distribution '{distro}' and architecture '{arch}'")]
    #[diagnostic(
        code(distrepo_registry::not_found),
        help("Add a repository file for the distribution that defines the architecture")
    )]
    NotFound { distro: String, arch: String },

    #[error("Invalid descriptor reference: {0}")]
    #[diagnostic(code(distrepo_registry::invalid_reference))]
    InvalidReference(MissingRelation),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

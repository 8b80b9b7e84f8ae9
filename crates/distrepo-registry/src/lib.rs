//! Repository registry for image builds.
//!
//! This crate answers a single question: which package repositories should be used
//! to resolve packages for a given distribution, architecture and image type.
//!
//! # Overview
//!
//! A [`RepoRegistry`] is built once, either from configuration paths or from an
//! already assembled [`DistrosRepoConfigs`] table, and is never modified afterwards.
//! Queries come in two flavors:
//! - **Name based**: callers pass distribution, architecture and image type names
//! - **Descriptor based**: callers pass objects implementing [`ArchDescriptor`] or
//!   [`ImageTypeDescriptor`], and the names are read from them
//!
//! Repositories without image type tags apply to every image type. Tagged
//! repositories only apply to the image types they name.
//!
//! # Example
//!
//! ```no_run
//! use distrepo_registry::RepoRegistry;
//!
//! fn repos_for_qcow2() -> distrepo_registry::Result<()> {
//!     let registry = RepoRegistry::new(&["/etc/distrepo", "/usr/share/distrepo"])?;
//!     for repo in registry.repos_by_image_type_name("fedora-40", "x86_64", "qcow2")? {
//!         println!("{}", repo.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod descriptor;
pub mod error;
pub mod registry;

pub use descriptor::{ArchDescriptor, DistroDescriptor, ImageTypeDescriptor};
pub use distrepo_config::repository::{ArchRepoConfigs, DistrosRepoConfigs, RepoConfig};
pub use error::{MissingRelation, RegistryError, Result};
pub use registry::RepoRegistry;

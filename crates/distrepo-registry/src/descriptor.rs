//! Capabilities the registry needs from a distribution model.
//!
//! Distributions, architectures and image types are modeled by the caller. The
//! registry only reads their names and walks the ownership relations between
//! them, so any model graph can be queried by implementing these traits.
//!
//! ```
//! use distrepo_registry::{ArchDescriptor, DistroDescriptor};
//!
//! struct Distro(String);
//!
//! struct Arch {
//!     name: String,
//!     distro: Option<Distro>,
//! }
//!
//! impl DistroDescriptor for Distro {
//!     fn name(&self) -> &str {
//!         &self.0
//!     }
//! }
//!
//! impl ArchDescriptor for Arch {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//!
//!     fn distro(&self) -> Option<&dyn DistroDescriptor> {
//!         self.distro.as_ref().map(|d| d as &dyn DistroDescriptor)
//!     }
//! }
//! ```

/// A distribution, such as `fedora-40`.
pub trait DistroDescriptor {
    fn name(&self) -> &str;
}

/// A CPU architecture of a distribution, such as `x86_64`.
pub trait ArchDescriptor {
    fn name(&self) -> &str;

    /// The distribution owning this architecture, if the relation is set.
    fn distro(&self) -> Option<&dyn DistroDescriptor>;
}

/// An image type buildable for an architecture, such as `qcow2`.
pub trait ImageTypeDescriptor {
    fn name(&self) -> &str;

    /// The architecture owning this image type, if the relation is set.
    fn arch(&self) -> Option<&dyn ArchDescriptor>;
}

use std::path::Path;

use distrepo_config::{
    loader::load_all_repositories,
    repository::{DistrosRepoConfigs, RepoConfig},
};
use tracing::debug;

use crate::{
    descriptor::{ArchDescriptor, ImageTypeDescriptor},
    error::{MissingRelation, RegistryError, Result},
};

/// A database of distribution and architecture specific repositories.
///
/// Image types are only considered for repositories that carry image type tags.
/// The registry never changes after construction, so shared references to it can
/// be used from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct RepoRegistry {
    repos: DistrosRepoConfigs,
}

impl RepoRegistry {
    /// Creates a registry from the repository files found under `repo_config_paths`.
    ///
    /// See [`load_all_repositories`] for how the paths are searched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConfigLoad`] if the repositories cannot be loaded.
    pub fn new<P: AsRef<Path>>(repo_config_paths: &[P]) -> Result<Self> {
        let repos = load_all_repositories(repo_config_paths)?;
        debug!("loaded repositories for {} distributions", repos.len());
        Ok(Self::from_table(repos))
    }

    /// Creates a registry from an already assembled table.
    ///
    /// The table is stored as given. Architectures with an empty repository list
    /// stay known, so lookups for them succeed with no repositories.
    pub fn from_table(repos: DistrosRepoConfigs) -> Self {
        Self { repos }
    }

    /// Returns the repositories stored for the distribution and architecture,
    /// exactly as configured, or `None` if either is unknown.
    pub fn distro_has_repos(&self, distro: &str, arch: &str) -> Option<&[RepoConfig]> {
        self.repos.get(distro)?.get(arch).map(Vec::as_slice)
    }

    /// Returns the repositories to use for building image types of the given
    /// distribution and architecture.
    ///
    /// Repositories without image type tags are always included. Tagged ones are
    /// included only when `include_tagged` is set. Configured order is preserved.
    ///
    /// The architecture is not checked against the distribution's definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the distribution or architecture is unknown.
    pub fn repos_by_arch_name(
        &self,
        distro: &str,
        arch: &str,
        include_tagged: bool,
    ) -> Result<Vec<&RepoConfig>> {
        let arch_repos = self.distro_has_repos(distro, arch).ok_or_else(|| {
            RegistryError::NotFound {
                distro: distro.to_string(),
                arch: arch.to_string(),
            }
        })?;

        Ok(arch_repos
            .iter()
            // skip repos with image type tags if asked to
            .filter(|repo| include_tagged || repo.image_type_tags.is_empty())
            .collect())
    }

    /// Same as [`repos_by_arch_name`](Self::repos_by_arch_name), reading the names
    /// from an architecture descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidReference`] if the architecture has no
    /// distribution, or [`RegistryError::NotFound`] as `repos_by_arch_name` does.
    pub fn repos_by_arch<A>(&self, arch: &A, include_tagged: bool) -> Result<Vec<&RepoConfig>>
    where
        A: ArchDescriptor + ?Sized,
    {
        let distro = arch
            .distro()
            .ok_or(RegistryError::InvalidReference(MissingRelation::ArchDistro))?;

        self.repos_by_arch_name(distro.name(), arch.name(), include_tagged)
    }

    /// Returns the repositories to use for building the named image type.
    ///
    /// Every untagged repository of the distribution and architecture is included,
    /// plus the repositories tagged with `image_type`. Tags are compared exactly.
    /// The image type name is not validated, so an unknown name still yields the
    /// untagged repositories.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the distribution or architecture is unknown.
    pub fn repos_by_image_type_name(
        &self,
        distro: &str,
        arch: &str,
        image_type: &str,
    ) -> Result<Vec<&RepoConfig>> {
        let arch_repos = self.repos_by_arch_name(distro, arch, true)?;

        Ok(arch_repos
            .into_iter()
            .filter(|repo| applies_to_image_type(repo, image_type))
            .collect())
    }

    /// Same as [`repos_by_image_type_name`](Self::repos_by_image_type_name), reading
    /// the names from an image type descriptor and its owning architecture and
    /// distribution.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidReference`] if the image type has no
    /// architecture or that architecture has no distribution, or
    /// [`RegistryError::NotFound`] if the pair is unknown.
    pub fn repos_by_image_type<I>(&self, image_type: &I) -> Result<Vec<&RepoConfig>>
    where
        I: ImageTypeDescriptor + ?Sized,
    {
        let arch = image_type
            .arch()
            .ok_or(RegistryError::InvalidReference(MissingRelation::ImageTypeArch))?;
        let distro = arch
            .distro()
            .ok_or(RegistryError::InvalidReference(MissingRelation::ImageTypeDistro))?;

        self.repos_by_image_type_name(distro.name(), arch.name(), image_type.name())
    }

    /// Returns the names of all known distributions, sorted.
    pub fn list_distros(&self) -> Vec<&str> {
        self.repos.keys().map(String::as_str).collect()
    }

    /// Returns the sorted architecture names configured for `distro`, or `None`
    /// if the distribution is unknown.
    pub fn list_arches(&self, distro: &str) -> Option<Vec<&str>> {
        self.repos
            .get(distro)
            .map(|arches| arches.keys().map(String::as_str).collect())
    }
}

fn applies_to_image_type(repo: &RepoConfig, image_type: &str) -> bool {
    repo.image_type_tags.is_empty() || repo.image_type_tags.iter().any(|tag| tag == image_type)
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Repositories configured for each architecture of a single distribution.
pub type ArchRepoConfigs = BTreeMap<String, Vec<RepoConfig>>;

/// Repositories configured for each distribution, keyed by distribution name.
pub type DistrosRepoConfigs = BTreeMap<String, ArchRepoConfigs>;

/// A package repository that can be used to resolve packages for an image build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoConfig {
    /// Human readable name of the repository.
    pub name: String,

    /// Base URLs of the repository, in order of preference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<String>,

    /// URL of a metalink document listing mirrors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalink: Option<String>,

    /// URL of a plain mirror list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_list: Option<String>,

    /// GPG keys used to verify packages, either inline armored keys or URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gpg_keys: Vec<String>,

    /// Verify package signatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_gpg: Option<bool>,

    /// Verify repository metadata signatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_repo_gpg: Option<bool>,

    /// Skip TLS certificate verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_ssl: Option<bool>,

    /// How long cached metadata stays valid, e.g. `"6h"` or `"never"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_expire: Option<String>,

    /// The repository requires subscription manager entitlements.
    #[serde(default)]
    pub rhsm: bool,

    /// Allow packages from this repository to bypass module filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_hotfixes: Option<bool>,

    /// Image types this repository applies to. Empty means it applies to every
    /// image type of its distribution and architecture.
    #[serde(default)]
    pub image_type_tags: Vec<String>,

    /// Package sets this repository is restricted to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_sets: Vec<String>,
}

/// A repository as written in a distribution's repository file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RepositoryEntry {
    #[serde(default)]
    pub name: String,
    pub baseurl: Option<String>,
    pub metalink: Option<String>,
    pub mirrorlist: Option<String>,
    pub gpgkey: Option<String>,
    #[serde(default)]
    pub gpgkeys: Vec<String>,
    pub check_gpg: Option<bool>,
    pub check_repo_gpg: Option<bool>,
    pub ignore_ssl: Option<bool>,
    pub metadata_expire: Option<String>,
    #[serde(default)]
    pub rhsm: bool,
    pub module_hotfixes: Option<bool>,
    #[serde(default)]
    pub image_type_tags: Vec<String>,
    #[serde(default)]
    pub package_sets: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RepositoryEntry {
    /// Whether the entry names at least one location packages can be fetched from.
    pub fn has_source(&self) -> bool {
        [&self.baseurl, &self.metalink, &self.mirrorlist]
            .iter()
            .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

impl From<RepositoryEntry> for RepoConfig {
    fn from(entry: RepositoryEntry) -> Self {
        let base_urls = entry
            .baseurl
            .as_deref()
            .map(|urls| {
                urls.split(',')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let gpg_keys = non_empty(entry.gpgkey)
            .into_iter()
            .chain(entry.gpgkeys)
            .collect();

        RepoConfig {
            name: entry.name,
            base_urls,
            metalink: non_empty(entry.metalink),
            mirror_list: non_empty(entry.mirrorlist),
            gpg_keys,
            check_gpg: entry.check_gpg,
            check_repo_gpg: entry.check_repo_gpg,
            ignore_ssl: entry.ignore_ssl,
            metadata_expire: non_empty(entry.metadata_expire),
            rhsm: entry.rhsm,
            module_hotfixes: entry.module_hotfixes,
            image_type_tags: entry.image_type_tags,
            package_sets: entry.package_sets,
        }
    }
}

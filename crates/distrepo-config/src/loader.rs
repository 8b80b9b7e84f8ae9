//! Loading of repository definitions from configuration directories.
//!
//! Every configuration path may contain a `repositories` directory holding one
//! file per distribution:
//!
//! ```text
//! /etc/distrepo/repositories/
//! ├── centos-9.json
//! └── fedora-40.toml
//! ```
//!
//! The file stem names the distribution, the top-level keys name architectures and
//! each architecture maps to an ordered array of repositories.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{ConfigError, ErrorContext, Result},
    repository::{ArchRepoConfigs, DistrosRepoConfigs, RepoConfig, RepositoryEntry},
};

/// Name of the directory inside each configuration path that holds repository files.
pub const REPOSITORIES_DIR: &str = "repositories";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepoFileFormat {
    Json,
    Toml,
}

impl RepoFileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Loads the repositories of a single distribution file.
///
/// Architectures with no repositories are left out of the result.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file has an unsupported extension, cannot be read
/// or parsed, or contains a repository without any package source.
pub fn load_repositories_from_file<P: AsRef<Path>>(path: P) -> Result<ArchRepoConfigs> {
    let path = path.as_ref();
    let format = RepoFileFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("reading repository file {}", path.display()))?;

    let entries: BTreeMap<String, Vec<RepositoryEntry>> = match format {
        RepoFileFormat::Json => {
            serde_json::from_str(&content).map_err(|source| {
                ConfigError::JsonError {
                    path: path.to_path_buf(),
                    source,
                }
            })?
        }
        RepoFileFormat::Toml => {
            toml::from_str(&content).map_err(|source| {
                ConfigError::TomlDeError {
                    path: path.to_path_buf(),
                    source,
                }
            })?
        }
    };

    let mut arches = ArchRepoConfigs::new();
    for (arch, arch_entries) in entries {
        if arch_entries.is_empty() {
            debug!("{}: no repositories for {arch}, skipping", path.display());
            continue;
        }

        let mut repos = Vec::with_capacity(arch_entries.len());
        for (index, entry) in arch_entries.into_iter().enumerate() {
            if !entry.has_source() {
                return Err(ConfigError::MissingSource {
                    path: path.to_path_buf(),
                    arch,
                    index,
                });
            }
            repos.push(RepoConfig::from(entry));
        }
        arches.insert(arch, repos);
    }

    Ok(arches)
}

/// Loads repositories for every distribution found under the given configuration paths.
///
/// Paths are searched in order. When the same distribution is defined under more
/// than one path, the first definition wins, even if it defines no repositories.
/// Paths without a `repositories` directory are skipped.
///
/// # Errors
///
/// Returns [`ConfigError::NoRepositoriesLoaded`] if no distribution was found at all,
/// or any error raised while reading a repository file.
pub fn load_all_repositories<P: AsRef<Path>>(conf_paths: &[P]) -> Result<DistrosRepoConfigs> {
    let mut distros = DistrosRepoConfigs::new();

    for conf_path in conf_paths {
        let repos_dir = conf_path.as_ref().join(REPOSITORIES_DIR);

        for file in repository_files(&repos_dir)? {
            let distro = distro_name(&file)?;
            if distros.contains_key(&distro) {
                debug!(
                    "{}: {distro} already loaded from a preceding path, skipping",
                    file.display()
                );
                continue;
            }

            let arches = load_repositories_from_file(&file)?;
            if arches.is_empty() {
                debug!("{}: no repositories defined for {distro}", file.display());
            } else {
                debug!(
                    "loaded {} architecture(s) for {distro} from {}",
                    arches.len(),
                    file.display()
                );
            }
            distros.insert(distro, arches);
        }
    }

    if distros.is_empty() {
        return Err(ConfigError::NoRepositoriesLoaded(
            conf_paths
                .iter()
                .map(|path| path.as_ref().to_path_buf())
                .collect(),
        ));
    }

    Ok(distros)
}

/// Lists repository files in `dir`, sorted by name. A missing directory yields no files.
fn repository_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist, skipping", dir.display());
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(ConfigError::IoError {
                action: format!("reading directory {}", dir.display()),
                source: err,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("reading directory {}", dir.display()))?
            .path();
        if path.is_file() && RepoFileFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn distro_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(String::from)
        .ok_or_else(|| ConfigError::InvalidDistroName(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FEDORA_JSON: &str = r#"{
        "x86_64": [
            {
                "name": "fedora",
                "metalink": "https://mirrors.fedoraproject.org/metalink?repo=fedora-40&arch=x86_64",
                "gpgkey": "-----BEGIN PGP PUBLIC KEY BLOCK-----",
                "check_gpg": true
            },
            {
                "name": "updates-qcow2",
                "baseurl": "https://dl.example/updates/40/x86_64/",
                "image_type_tags": ["qcow2"]
            }
        ],
        "aarch64": [
            {
                "name": "fedora",
                "baseurl": "https://dl.example/releases/40/aarch64/"
            }
        ],
        "s390x": []
    }"#;

    const CENTOS_TOML: &str = r#"
        [[x86_64]]
        name = "baseos"
        baseurl = "https://mirror.example/9-stream/BaseOS/x86_64/os/"
        rhsm = false

        [[x86_64]]
        name = "appstream"
        mirrorlist = "https://mirrors.example/mirrorlist?repo=appstream"
        image_type_tags = ["ami", "vhd"]
    "#;

    fn write_repo_file(root: &Path, file_name: &str, content: &str) -> PathBuf {
        let dir = root.join(REPOSITORIES_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_repo_file(tmp.path(), "fedora-40.json", FEDORA_JSON);

        let arches = load_repositories_from_file(&path).unwrap();

        assert_eq!(arches.keys().collect::<Vec<_>>(), vec!["aarch64", "x86_64"]);
        let x86 = &arches["x86_64"];
        assert_eq!(x86.len(), 2);
        assert_eq!(x86[0].name, "fedora");
        assert_eq!(x86[0].gpg_keys.len(), 1);
        assert_eq!(x86[1].name, "updates-qcow2");
        assert_eq!(x86[1].image_type_tags, vec!["qcow2"]);
        assert_eq!(x86[1].base_urls, vec!["https://dl.example/updates/40/x86_64/"]);
    }

    #[test]
    fn test_load_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_repo_file(tmp.path(), "centos-9.toml", CENTOS_TOML);

        let arches = load_repositories_from_file(&path).unwrap();
        let x86 = &arches["x86_64"];

        assert_eq!(x86[0].name, "baseos");
        assert_eq!(
            x86[1].mirror_list.as_deref(),
            Some("https://mirrors.example/mirrorlist?repo=appstream")
        );
        assert_eq!(x86[1].image_type_tags, vec!["ami", "vhd"]);
    }

    #[test]
    fn test_load_file_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = write_repo_file(tmp.path(), "fedora.yaml", "x86_64: []");

        let result = load_repositories_from_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_file_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = write_repo_file(tmp.path(), "fedora.json", "{ \"x86_64\": [ ");

        let result = load_repositories_from_file(&path);
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn test_load_file_missing() {
        let tmp = TempDir::new().unwrap();
        let result = load_repositories_from_file(tmp.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_load_file_repository_without_source() {
        let tmp = TempDir::new().unwrap();
        let path = write_repo_file(
            tmp.path(),
            "fedora.json",
            r#"{"x86_64": [{"name": "ok", "baseurl": "https://a.example"}, {"name": "broken"}]}"#,
        );

        let result = load_repositories_from_file(&path);
        assert!(matches!(
            result,
            Err(ConfigError::MissingSource { ref arch, index: 1, .. }) if arch == "x86_64"
        ));
    }

    #[test]
    fn test_load_all_repositories() {
        let tmp = TempDir::new().unwrap();
        write_repo_file(tmp.path(), "fedora-40.json", FEDORA_JSON);
        write_repo_file(tmp.path(), "centos-9.toml", CENTOS_TOML);
        write_repo_file(tmp.path(), "README.md", "not a repository file");

        let distros = load_all_repositories(&[tmp.path()]).unwrap();

        assert_eq!(
            distros.keys().collect::<Vec<_>>(),
            vec!["centos-9", "fedora-40"]
        );
        assert!(!distros["fedora-40"].contains_key("s390x"));
    }

    #[test]
    fn test_load_all_repositories_first_path_wins() {
        let primary = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        write_repo_file(
            primary.path(),
            "fedora-40.json",
            r#"{"x86_64": [{"name": "override", "baseurl": "https://local.example/"}]}"#,
        );
        write_repo_file(fallback.path(), "fedora-40.json", FEDORA_JSON);
        write_repo_file(fallback.path(), "centos-9.toml", CENTOS_TOML);

        let distros = load_all_repositories(&[primary.path(), fallback.path()]).unwrap();

        let fedora = &distros["fedora-40"];
        assert_eq!(fedora.len(), 1);
        assert_eq!(fedora["x86_64"][0].name, "override");
        assert!(distros.contains_key("centos-9"));
    }

    #[test]
    fn test_load_all_repositories_empty_definition_shadows() {
        let primary = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        write_repo_file(primary.path(), "fedora-40.json", r#"{"x86_64": []}"#);
        write_repo_file(fallback.path(), "fedora-40.json", FEDORA_JSON);

        let distros = load_all_repositories(&[primary.path(), fallback.path()]).unwrap();

        assert_eq!(distros.keys().collect::<Vec<_>>(), vec!["fedora-40"]);
        assert!(distros["fedora-40"].is_empty());
    }

    #[test]
    fn test_load_all_repositories_skips_missing_dirs() {
        let empty = TempDir::new().unwrap();
        let populated = TempDir::new().unwrap();
        write_repo_file(populated.path(), "fedora-40.json", FEDORA_JSON);

        let distros = load_all_repositories(&[
            empty.path().join("does-not-exist"),
            populated.path().to_path_buf(),
        ])
        .unwrap();

        assert_eq!(distros.len(), 1);
    }

    #[test]
    fn test_load_all_repositories_nothing_found() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(REPOSITORIES_DIR)).unwrap();

        let result = load_all_repositories(&[tmp.path()]);
        match result {
            Err(ConfigError::NoRepositoriesLoaded(paths)) => {
                assert_eq!(paths, vec![tmp.path().to_path_buf()]);
            }
            _ => panic!("expected NoRepositoriesLoaded"),
        }
    }

    #[test]
    fn test_load_all_repositories_propagates_parse_errors() {
        let tmp = TempDir::new().unwrap();
        write_repo_file(tmp.path(), "fedora-40.json", FEDORA_JSON);
        write_repo_file(tmp.path(), "broken.toml", "[[x86_64]\nname = ");

        let result = load_all_repositories(&[tmp.path()]);
        assert!(matches!(result, Err(ConfigError::TomlDeError { .. })));
    }

    #[test]
    fn test_repo_file_format() {
        assert_eq!(
            RepoFileFormat::from_path(Path::new("a/fedora.json")),
            Some(RepoFileFormat::Json)
        );
        assert_eq!(
            RepoFileFormat::from_path(Path::new("centos.toml")),
            Some(RepoFileFormat::Toml)
        );
        assert_eq!(RepoFileFormat::from_path(Path::new("fedora")), None);
    }
}

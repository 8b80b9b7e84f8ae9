use std::path::PathBuf;

use distrepo_utils::path::{resolve_path, xdg_config_home};
use tracing::debug;

use crate::error::Result;

/// Environment variable holding a `:`-separated list of configuration paths.
pub const CONFIG_PATHS_ENV: &str = "DISTREPO_CONFIG_PATHS";

/// System-wide configuration paths, searched after the user's configuration directory.
pub const SYSTEM_CONFIG_PATHS: [&str; 2] = ["/etc/distrepo", "/usr/share/distrepo"];

/// Returns the default configuration paths in priority order.
///
/// The user's `$XDG_CONFIG_HOME/distrepo` comes first when it can be determined.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(SYSTEM_CONFIG_PATHS.len() + 1);

    match xdg_config_home() {
        Ok(config_home) => paths.push(config_home.join("distrepo")),
        Err(err) => debug!("skipping user configuration path: {err}"),
    }
    paths.extend(SYSTEM_CONFIG_PATHS.iter().map(PathBuf::from));

    paths
}

/// Resolves the configuration paths to search for repository files.
///
/// Explicitly given paths take precedence over [`CONFIG_PATHS_ENV`], which takes
/// precedence over [`default_config_paths`]. Empty entries are ignored and every
/// remaining entry is expanded with [`resolve_path`].
pub fn resolve_config_paths<T: AsRef<str>>(explicit: &[T]) -> Result<Vec<PathBuf>> {
    let explicit: Vec<&str> = non_empty_entries(explicit.iter().map(|entry| entry.as_ref()));
    if !explicit.is_empty() {
        return resolve_all(&explicit);
    }

    if let Ok(value) = std::env::var(CONFIG_PATHS_ENV) {
        let from_env = non_empty_entries(value.split(':'));
        if !from_env.is_empty() {
            debug!("using configuration paths from {CONFIG_PATHS_ENV}");
            return resolve_all(&from_env);
        }
    }

    Ok(default_config_paths())
}

fn non_empty_entries<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    entries
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn resolve_all(entries: &[&str]) -> Result<Vec<PathBuf>> {
    entries
        .iter()
        .map(|entry| Ok(resolve_path(entry)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ConfigError, test_utils::with_env};
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_explicit_paths_take_precedence() {
        with_env(vec![(CONFIG_PATHS_ENV, Some("/from/env"))], || {
            let paths = resolve_config_paths(&["/opt/distrepo", " ", "/srv/distrepo"]).unwrap();
            assert_eq!(
                paths,
                vec![PathBuf::from("/opt/distrepo"), PathBuf::from("/srv/distrepo")]
            );
        });
    }

    #[test]
    #[serial]
    fn test_env_paths() {
        with_env(
            vec![
                (CONFIG_PATHS_ENV, Some("/from/env::${DISTREPO_TEST_BASE}/repos")),
                ("DISTREPO_TEST_BASE", Some("/data")),
            ],
            || {
                let paths = resolve_config_paths::<&str>(&[]).unwrap();
                assert_eq!(
                    paths,
                    vec![PathBuf::from("/from/env"), PathBuf::from("/data/repos")]
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_env_paths_with_missing_variable() {
        with_env(
            vec![
                (CONFIG_PATHS_ENV, Some("$DISTREPO_TEST_NOPE/repos")),
                ("DISTREPO_TEST_NOPE", None),
            ],
            || {
                let result = resolve_config_paths::<&str>(&[]);
                assert!(matches!(result, Err(ConfigError::Path(_))));
            },
        );
    }

    #[test]
    #[serial]
    fn test_default_paths() {
        with_env(
            vec![
                (CONFIG_PATHS_ENV, None),
                ("XDG_CONFIG_HOME", Some("/home/builder/.config")),
            ],
            || {
                let paths = resolve_config_paths::<&str>(&[]).unwrap();
                assert_eq!(
                    paths,
                    vec![
                        PathBuf::from("/home/builder/.config/distrepo"),
                        PathBuf::from("/etc/distrepo"),
                        PathBuf::from("/usr/share/distrepo"),
                    ]
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_blank_env_falls_back_to_defaults() {
        with_env(vec![(CONFIG_PATHS_ENV, Some(" : "))], || {
            let paths = resolve_config_paths::<&str>(&[]).unwrap();
            assert_eq!(paths, default_config_paths());
        });
    }
}

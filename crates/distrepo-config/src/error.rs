use std::path::PathBuf;

use distrepo_utils::error::PathError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(distrepo_config::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON repository file {}: {source}", .path.display())]
    #[diagnostic(
        code(distrepo_config::json),
        help("Check the repository file syntax and structure")
    )]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML repository file {}: {source}", .path.display())]
    #[diagnostic(
        code(distrepo_config::toml),
        help("Check the repository file syntax and structure")
    )]
    TomlDeError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unsupported repository file format: {}", .0.display())]
    #[diagnostic(
        code(distrepo_config::unsupported_format),
        help("Repository files must use the `.json` or `.toml` extension")
    )]
    UnsupportedFormat(PathBuf),

    #[error("Invalid distribution file name: {}", .0.display())]
    #[diagnostic(
        code(distrepo_config::invalid_distro_name),
        help("Name the file after the distribution, e.g. `fedora-40.json`")
    )]
    InvalidDistroName(PathBuf),

    #[error(
        "Repository #{index} for architecture '{arch}' in {} has no baseurl, metalink or mirrorlist",
        .path.display()
    )]
    #[diagnostic(
        code(distrepo_config::missing_source),
        help("Set at least one of `baseurl`, `metalink` or `mirrorlist`")
    )]
    MissingSource {
        path: PathBuf,
        arch: String,
        index: usize,
    },

    #[error("No repositories found in the given paths: {}", format_paths(.0))]
    #[diagnostic(
        code(distrepo_config::no_repositories),
        help("Place `<distro>.json` files under a `repositories` directory in one of the paths")
    )]
    NoRepositoriesLoaded(Vec<PathBuf>),

    #[error(transparent)]
    #[diagnostic(code(distrepo_config::path))]
    Path(#[from] PathError),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Extension trait for attaching the failed action to I/O errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            ConfigError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err =
            ConfigError::UnsupportedFormat(PathBuf::from("/etc/distrepo/repositories/f40.ini"));
        assert_eq!(
            err.to_string(),
            "Unsupported repository file format: /etc/distrepo/repositories/f40.ini"
        );

        let err = ConfigError::MissingSource {
            path: PathBuf::from("fedora.json"),
            arch: "x86_64".to_string(),
            index: 2,
        };
        assert_eq!(
            err.to_string(),
            "Repository #2 for architecture 'x86_64' in fedora.json has no baseurl, metalink or mirrorlist"
        );

        let err = ConfigError::NoRepositoriesLoaded(vec![
            PathBuf::from("/etc/distrepo"),
            PathBuf::from("/usr/share/distrepo"),
        ]);
        assert_eq!(
            err.to_string(),
            "No repositories found in the given paths: /etc/distrepo, /usr/share/distrepo"
        );
    }

    #[test]
    fn test_io_error_context() {
        let result: std::io::Result<()> = Err(std::io::Error::other("denied"));
        let err = result
            .with_context(|| "reading repository file fedora.json".to_string())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error while reading repository file fedora.json: denied"
        );
    }
}

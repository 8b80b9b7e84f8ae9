use std::{env, iter::Peekable, path::PathBuf, str::Chars};

use crate::error::{PathError, PathResult};

pub trait PathResolver {
    /// Resolves a path string that may contain environment variables.
    ///
    /// Expands `$VAR` and `${VAR}`, replaces a leading `~` with the home directory and
    /// turns relative paths into absolute ones based on the current working directory.
    ///
    /// # Errors
    ///
    /// * [`PathError::Empty`] if the path is empty
    /// * [`PathError::CurrentDir`] if the current directory cannot be determined
    /// * [`PathError::MissingEnvVar`] if a referenced variable is undefined
    /// * [`PathError::UnclosedVariable`] if a `${` expression is never closed
    ///
    /// # Example
    ///
    /// ```
    /// use distrepo_utils::error::PathResult;
    /// use distrepo_utils::path::{PathResolver, SystemPathResolver};
    ///
    /// fn main() -> PathResult<()> {
    ///     let resolved = SystemPathResolver.resolve_path("/usr/share/distrepo")?;
    ///     assert!(resolved.is_absolute());
    ///     Ok(())
    /// }
    /// ```
    fn resolve_path(&self, path: &str) -> PathResult<PathBuf>;

    /// Returns the user's home directory from `HOME`.
    fn home_dir(&self) -> PathResult<PathBuf>;

    /// Returns `XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
    fn xdg_config_home(&self) -> PathResult<PathBuf>;
}

/// The default [`PathResolver`] backed by the process environment.
pub struct SystemPathResolver;

impl PathResolver for SystemPathResolver {
    fn resolve_path(&self, path: &str) -> PathResult<PathBuf> {
        let path = path.trim();

        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let path_buf = PathBuf::from(self.expand_variables(path)?);

        if path_buf.is_absolute() {
            Ok(path_buf)
        } else {
            env::current_dir()
                .map(|cwd| cwd.join(path_buf))
                .map_err(|err| PathError::CurrentDir { source: err })
        }
    }

    fn home_dir(&self) -> PathResult<PathBuf> {
        env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::MissingEnvVar {
                var: "HOME".into(),
                input: "~".into(),
            })
    }

    fn xdg_config_home(&self) -> PathResult<PathBuf> {
        match env::var("XDG_CONFIG_HOME") {
            Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(self.home_dir()?.join(".config")),
        }
    }
}

impl SystemPathResolver {
    fn expand_variables(&self, path: &str) -> PathResult<String> {
        let mut result = String::with_capacity(path.len());
        let mut chars = path.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '$' if chars.peek() == Some(&'{') => {
                    chars.next();
                    let var_name = consume_until(&mut chars, '}')?;
                    self.expand_env_var(&var_name, &mut result, path)?;
                }
                '$' => {
                    let var_name = consume_var_name(&mut chars);
                    if var_name.is_empty() {
                        result.push('$');
                    } else {
                        self.expand_env_var(&var_name, &mut result, path)?;
                    }
                }
                '~' if result.is_empty() => {
                    result.push_str(&self.home_dir()?.to_string_lossy());
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    fn expand_env_var(
        &self,
        var_name: &str,
        result: &mut String,
        original: &str,
    ) -> PathResult<()> {
        if var_name == "XDG_CONFIG_HOME" {
            result.push_str(&self.xdg_config_home()?.to_string_lossy());
            return Ok(());
        }

        let value = env::var(var_name).map_err(|_| PathError::MissingEnvVar {
            var: var_name.into(),
            input: original.into(),
        })?;
        result.push_str(&value);
        Ok(())
    }
}

fn consume_until(chars: &mut Peekable<Chars>, delimiter: char) -> PathResult<String> {
    let mut var_name = String::new();

    for c in chars.by_ref() {
        if c == delimiter {
            return Ok(var_name);
        }
        var_name.push(c);
    }

    Err(PathError::UnclosedVariable {
        input: format!("${{{var_name}"),
    })
}

fn consume_var_name(chars: &mut Peekable<Chars>) -> String {
    let mut var_name = String::new();

    while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
        var_name.push(c);
    }

    var_name
}

/// Resolves a path string using [`SystemPathResolver`].
///
/// See [`PathResolver::resolve_path`] for details.
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    SystemPathResolver.resolve_path(path)
}

/// Returns the user's config directory using [`SystemPathResolver`].
pub fn xdg_config_home() -> PathResult<PathBuf> {
    SystemPathResolver.xdg_config_home()
}

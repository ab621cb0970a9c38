use std::env;
use std::path::{Path, PathBuf};

const HOME_MARKER: char = '~';

/// Expand a configured source path into an absolute path.
///
/// A leading `~` is replaced with the current user's home directory. Any other
/// path gets `$VAR` / `${VAR}` references substituted from the environment,
/// with unset variables expanding to nothing. If the home directory cannot be
/// determined the raw path is returned unchanged.
pub fn resolve(raw: &str) -> PathBuf {
    resolve_with(raw, dirs::home_dir().as_deref(), |name| env::var(name).ok())
}

pub fn resolve_with<F>(raw: &str, home: Option<&Path>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(rest) = raw.strip_prefix(HOME_MARKER) {
        return match home {
            Some(home) => {
                let rest = rest.trim_start_matches(std::path::is_separator);
                if rest.is_empty() {
                    home.to_path_buf()
                } else {
                    home.join(rest)
                }
            }
            None => PathBuf::from(raw),
        };
    }

    let expanded = shellexpand::env_with_context_no_errors(raw, |name| {
        Some(lookup(name).unwrap_or_default())
    });
    PathBuf::from(expanded.as_ref())
}

//! Lexical path resolution for the `cd` builtin.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Resolves a raw `cd` target against the working directory: a leading `~`
/// expands to the home directory, relative paths join onto `cwd`, and the
/// result is normalized lexically. No filesystem access; the caller stats
/// the candidate.
pub fn resolve_target(raw: &str, cwd: &Path, home: &Path) -> PathBuf {
    let expanded = if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    };
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    normalize(&joined)
}

/// Collapses `.` and `..` components without touching the filesystem.
/// Intended for absolute paths; `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CWD: &str = "/srv/work";
    const HOME: &str = "/home/ada";

    fn resolve(raw: &str) -> PathBuf {
        resolve_target(raw, Path::new(CWD), Path::new(HOME))
    }

    #[test]
    fn relative_paths_join_the_working_directory() {
        assert_eq!(resolve("logs"), PathBuf::from("/srv/work/logs"));
        assert_eq!(resolve("./logs"), PathBuf::from("/srv/work/logs"));
    }

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(resolve("/etc"), PathBuf::from("/etc"));
    }

    #[test]
    fn tilde_expands_to_home() {
        assert_eq!(resolve("~"), PathBuf::from(HOME));
        assert_eq!(resolve("~/src"), PathBuf::from("/home/ada/src"));
        // A tilde mid-token stays literal.
        assert_eq!(resolve("a~b"), PathBuf::from("/srv/work/a~b"));
    }

    #[test]
    fn dot_dot_collapses_lexically() {
        assert_eq!(resolve(".."), PathBuf::from("/srv"));
        assert_eq!(resolve("../.."), PathBuf::from("/"));
        assert_eq!(resolve("a/../b"), PathBuf::from("/srv/work/b"));
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("/../..")), PathBuf::from("/"));
    }
}

//! Tab completion of the trailing path token.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::paths;

/// Completes the last whitespace-delimited token of `input` as a path under
/// the working directory. Returns the full replacement line on a unique
/// match; ambiguous or empty searches return `None`.
pub fn complete_line(input: &str, cwd: &Path, home: &Path) -> Option<String> {
    if input.is_empty() || input.ends_with(char::is_whitespace) {
        return None;
    }
    let (head, token) = match input.rfind(char::is_whitespace) {
        Some(i) => input.split_at(i + 1),
        None => ("", input),
    };
    let completed = complete_token(token, cwd, home)?;
    Some(format!("{head}{completed}"))
}

fn complete_token(token: &str, cwd: &Path, home: &Path) -> Option<String> {
    let (dir_part, partial) = match token.rsplit_once('/') {
        Some((dir, partial)) => (Some(dir), partial),
        None => (None, token),
    };
    if partial.is_empty() {
        return None;
    }

    let search_dir = match dir_part {
        None => cwd.to_path_buf(),
        Some("") => PathBuf::from("/"),
        Some(dir) => paths::resolve_target(dir, cwd, home),
    };

    let needle = partial.to_lowercase();
    let mut matches: Vec<String> = Vec::new();
    for entry in fs::read_dir(&search_dir).ok()?.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().starts_with(&needle) {
            matches.push(name);
        }
    }

    match matches.as_slice() {
        [only] => Some(match dir_part {
            None => only.clone(),
            Some(dir) => format!("{dir}/{only}"),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("alpha.txt")).unwrap();
        File::create(dir.path().join("alps")).unwrap();
        File::create(dir.path().join("beta.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("nested.log")).unwrap();
        dir
    }

    fn complete(input: &str, cwd: &Path) -> Option<String> {
        complete_line(input, cwd, Path::new("/nonexistent-home"))
    }

    #[test]
    fn unique_prefix_completes_the_last_token() {
        let dir = fixture();
        assert_eq!(
            complete("cat be", dir.path()),
            Some("cat beta.txt".to_string())
        );
    }

    #[test]
    fn ambiguous_prefix_is_a_no_op() {
        let dir = fixture();
        assert_eq!(complete("cat al", dir.path()), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let dir = fixture();
        assert_eq!(
            complete("cat BE", dir.path()),
            Some("cat beta.txt".to_string())
        );
    }

    #[test]
    fn completes_inside_a_subdirectory() {
        let dir = fixture();
        assert_eq!(
            complete("tail sub/ne", dir.path()),
            Some("tail sub/nested.log".to_string())
        );
    }

    #[test]
    fn blank_or_trailing_space_input_is_a_no_op() {
        let dir = fixture();
        assert_eq!(complete("", dir.path()), None);
        assert_eq!(complete("cat ", dir.path()), None);
    }

    #[test]
    fn missing_directory_is_a_no_op() {
        let dir = fixture();
        assert_eq!(complete("cat nowhere/fi", dir.path()), None);
    }
}

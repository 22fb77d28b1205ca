use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use vigil_core::GateError;

/// File extensions eligible for review, matched case-sensitively.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "java", "cpp", "c", "go", "rs", "php", "rb", "cs", "swift",
    "kt", "scala",
];

/// Marker appended when a file exceeds the content budget.
pub const TRUNCATION_MARKER: &str = "\n... [File truncated for analysis]";

/// Read the newline-delimited changed-file list.
///
/// Lines are trimmed; blank lines are dropped. A missing list file is the
/// valid "no files changed" case and yields an empty list.
///
/// # Errors
///
/// Returns [`GateError::Io`] for read failures other than the file being
/// absent.
pub fn read_changed_list(path: &Path) -> Result<Vec<String>, GateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No {} found", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Whether a path carries one of the recognized source extensions.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vigil_review::collect::is_source_file;
///
/// assert!(is_source_file(Path::new("src/app.py")));
/// assert!(!is_source_file(Path::new("readme.md")));
/// assert!(!is_source_file(Path::new("Shouty.PY")));
/// ```
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Filter the changed-file list down to reviewable paths.
///
/// Unsupported extensions and paths missing on disk are skipped with a
/// logged line; neither is fatal.
pub fn filter_eligible(paths: &[String]) -> Vec<PathBuf> {
    let mut eligible = Vec::new();
    for raw in paths {
        let path = PathBuf::from(raw);
        if !is_source_file(&path) {
            println!("\u{2298} Skipping {raw} (not a code file)");
            continue;
        }
        if !path.exists() {
            println!("\u{26a0} File not found: {raw}");
            continue;
        }
        eligible.push(path);
    }
    eligible
}

/// Read a file as text, truncating to `max_chars` characters.
///
/// Only the head of the file is kept; the truncation marker is appended when
/// the budget is exceeded. The cut respects UTF-8 boundaries.
///
/// # Errors
///
/// Returns [`GateError::Io`] if the file cannot be read as text. Callers
/// treat that as an entity-level error and exclude the file from the run.
pub fn read_capped(path: &Path, max_chars: usize) -> Result<String, GateError> {
    let content = std::fs::read_to_string(path)?;
    Ok(truncate_chars(content, max_chars))
}

fn truncate_chars(content: String, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut head = content[..cut].to_string();
            head.push_str(TRUNCATION_MARKER);
            head
        }
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_list_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let list = read_changed_list(&dir.path().join("changed_files.txt")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn list_lines_are_trimmed_and_blanks_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let list_path = dir.path().join("changed_files.txt");
        std::fs::write(&list_path, "  src/app.py  \n\n   \nlib/util.js\n").unwrap();
        let list = read_changed_list(&list_path).unwrap();
        assert_eq!(list, vec!["src/app.py", "lib/util.js"]);
    }

    #[test]
    fn whitespace_only_list_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let list_path = dir.path().join("changed_files.txt");
        std::fs::write(&list_path, "   \n\t\n \n").unwrap();
        assert!(read_changed_list(&list_path).unwrap().is_empty());
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        assert!(is_source_file(Path::new("a.go")));
        assert!(is_source_file(Path::new("a.rs")));
        assert!(!is_source_file(Path::new("a.GO")));
        assert!(!is_source_file(Path::new("a.md")));
        assert!(!is_source_file(Path::new("no_extension")));
    }

    #[test]
    fn filter_drops_unsupported_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("app.py");
        std::fs::write(&kept, "print('hi')").unwrap();

        let paths = vec![
            kept.to_string_lossy().into_owned(),
            dir.path().join("readme.md").to_string_lossy().into_owned(),
            dir.path().join("ghost.py").to_string_lossy().into_owned(),
        ];
        let eligible = filter_eligible(&paths);
        assert_eq!(eligible, vec![kept]);
    }

    #[test]
    fn short_content_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.py");
        std::fs::write(&path, "print('hi')").unwrap();
        let content = read_capped(&path, 10_000).unwrap();
        assert_eq!(content, "print('hi')");
    }

    #[test]
    fn long_content_keeps_head_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.py");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{}", "x".repeat(12_000)).unwrap();

        let content = read_capped(&path, 10_000).unwrap();
        assert!(content.starts_with(&"x".repeat(10_000)));
        assert!(content.ends_with(TRUNCATION_MARKER));
        assert_eq!(content.chars().count(), 10_000 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let content: String = "\u{00e9}".repeat(6);
        let cut = truncate_chars(content, 4);
        assert!(cut.starts_with(&"\u{00e9}".repeat(4)));
        assert!(cut.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_capped(&dir.path().join("absent.py"), 100).unwrap_err();
        assert!(matches!(err, GateError::Io(_)));
    }
}

//! File operations for the entry store
//!
//! Handles reading/writing entry markdown files and mapping titles to file names.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File extension used for every entry
pub const ENTRY_EXTENSION: &str = "md";

/// Longest file name (in bytes) common filesystems accept
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Check that a title can be used verbatim as a single file name
/// (e.g. "Python" -> "Python.md", but not "../etc/passwd")
pub fn is_valid_title(title: &str) -> bool {
    !title.is_empty()
        && title.len() + ENTRY_EXTENSION.len() + 1 <= MAX_FILE_NAME_BYTES
        && !title.starts_with('.')
        && !title.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

/// Normalized index key for a title ("Python" and "PYTHON" share a key)
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// Path of the entry file for a title
pub fn entry_path(entries_dir: &Path, title: &str) -> PathBuf {
    entries_dir.join(format!("{}.{}", title, ENTRY_EXTENSION))
}

/// Title of an entry file (file stem), if the path is a visible `.md` file
pub fn title_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.starts_with('.') {
        return None;
    }
    let stem = name.strip_suffix(&format!(".{}", ENTRY_EXTENSION))?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Write an entry file (creates the parent directory as needed)
pub fn write_entry(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Read an entry file, returning None if not found
pub fn read_entry(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// List all entry files in the entries directory (not recursive)
pub fn list_entry_files(entries_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !entries_dir.exists() {
        return Ok(files);
    }

    for entry in fs::read_dir(entries_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if title_from_path(&path).is_some() {
            files.push(path);
        } else {
            log::debug!("[ENTRIES] Skipping non-entry file {:?}", path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_valid_title() {
        assert!(is_valid_title("Python"));
        assert!(is_valid_title("Hello World!"));
        assert!(is_valid_title("C++"));
        assert!(!is_valid_title(""));
        assert!(!is_valid_title("../secrets"));
        assert!(!is_valid_title("a/b"));
        assert!(!is_valid_title("a\\b"));
        assert!(!is_valid_title(".hidden"));
        assert!(!is_valid_title("tab\there"));

        // "<title>.md" must fit in one file name
        assert!(is_valid_title(&"a".repeat(252)));
        assert!(!is_valid_title(&"a".repeat(253)));
        assert!(!is_valid_title(&"é".repeat(127)));
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path(Path::new("/x/Python.md")), Some("Python".to_string()));
        assert_eq!(title_from_path(Path::new("/x/Hello World.md")), Some("Hello World".to_string()));
        assert_eq!(title_from_path(Path::new("/x/notes.txt")), None);
        assert_eq!(title_from_path(Path::new("/x/.hidden.md")), None);
        assert_eq!(title_from_path(Path::new("/x/.md")), None);
    }

    #[test]
    fn test_write_and_read_entry() {
        let dir = tempdir().unwrap();
        let path = entry_path(dir.path(), "Rust");

        write_entry(&path, "# Rust\n\nA systems language.").unwrap();
        let content = read_entry(&path).unwrap().unwrap();
        assert!(content.contains("# Rust"));
        assert!(content.contains("systems language"));
    }

    #[test]
    fn test_read_entry_not_found() {
        let dir = tempdir().unwrap();
        let path = entry_path(dir.path(), "Nope");
        assert!(read_entry(&path).unwrap().is_none());
    }

    #[test]
    fn test_list_entry_files() {
        let dir = tempdir().unwrap();
        let entries_dir = dir.path();

        fs::write(entries_dir.join("CSS.md"), "content").unwrap();
        fs::write(entries_dir.join("Git.md"), "content").unwrap();
        fs::write(entries_dir.join("readme.txt"), "not an entry").unwrap();
        fs::write(entries_dir.join(".draft.md"), "hidden").unwrap();
        fs::create_dir(entries_dir.join("nested.md")).unwrap();

        let files = list_entry_files(entries_dir).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_list_entry_files_missing_dir() {
        let dir = tempdir().unwrap();
        let files = list_entry_files(&dir.path().join("missing")).unwrap();
        assert!(files.is_empty());
    }
}

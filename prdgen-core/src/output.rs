//! Output sinks for rendered PRDs
//!
//! Rendering is pure; writing the result somewhere goes through a [`PrdSink`]
//! so the conversion can run against the filesystem or entirely in memory.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Error, Result};

/// Destination for rendered PRD documents
pub trait PrdSink: Send + Sync {
    /// Store `content` under `name`, returning where it was written
    fn write(&self, name: &str, content: &str) -> Result<PathBuf>;
}

/// Check that a PRD name can be used as a file stem
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Writes `<dir>/<name>.md`, creating the directory if needed
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory documents are written to
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path a document named `name` would be written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.md", name))
    }
}

impl PrdSink for DirectorySink {
    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        validate_name(name)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(name);

        // Rename into place; a failed write leaves any existing PRD untouched
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path)
            .map_err(|e| Error::Output(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote PRD");
        Ok(path)
    }
}

/// Keeps documents in memory, keyed by the path they would have been written to
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Content written under `name`, if any
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(&Self::path_for(name)).cloned()
    }

    /// Number of documents written
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn path_for(name: &str) -> PathBuf {
        PathBuf::from(format!("{}.md", name))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        // A poisoned map is still a consistent map of finished writes
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PrdSink for MemorySink {
    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let path = Self::path_for(name);
        self.lock().insert(path.clone(), content.to_string());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_sink_creates_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("prds");
        let sink = DirectorySink::new(&dir);

        let path = sink.write("user-auth", "# user-auth PRD\n").unwrap();

        assert_eq!(path, dir.join("user-auth.md"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# user-auth PRD\n"
        );
    }

    #[test]
    fn test_directory_sink_overwrites() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path());

        sink.write("cart", "first").unwrap();
        let path = sink.write("cart", "second").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
        // No temporary files left behind
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_directory_sink_rejects_bad_names() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path().join("prds"));

        for name in ["", "  ", "..", "../escape", "a/b", "a\\b"] {
            let err = sink.write(name, "x").unwrap_err();
            assert!(matches!(err, Error::InvalidName(_)), "name {:?}", name);
        }
        // Nothing was created for rejected names
        assert!(!temp.path().join("prds").exists());
    }

    #[test]
    fn test_directory_sink_write_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let sink = DirectorySink::new(blocker.join("prds"));
        assert!(sink.write("cart", "x").is_err());
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        let path = sink.write("orders", "content").unwrap();

        assert_eq!(path, PathBuf::from("orders.md"));
        assert_eq!(sink.get("orders"), Some("content".to_string()));
        assert_eq!(sink.get("missing"), None);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("user-auth").is_ok());
        assert!(validate_name("v1.2").is_ok());
        assert!(validate_name(".").is_err());
        assert!(validate_name("a/b").is_err());
    }
}

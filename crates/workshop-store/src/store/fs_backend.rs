use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem backend. Stateless: every call resolves the path it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).map_err(StoreError::Io)?;
        }
        Ok(())
    }

    fn tmp_path_for(&self, path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("collection");
        path.with_file_name(format!(".{}-{}.tmp", name, Uuid::new_v4()))
    }
}

impl StorageBackend for FsBackend {
    fn read_text(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent)?;
        }

        // Atomic write
        let tmp_path = self.tmp_path_for(path);
        fs::write(&tmp_path, content).map_err(StoreError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io(e));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new();
        let content = backend.read_text(&dir.path().join("absent.json")).unwrap();
        assert_eq!(content, None);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new();
        let path = dir.path().join("nested").join("deeper").join("clients.json");

        backend.write_text(&path, "{}").unwrap();

        assert!(path.exists());
        assert_eq!(backend.read_text(&path).unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_write_leaves_no_tmp_files() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new();
        let path = dir.path().join("clients.json");

        backend.write_text(&path, "first").unwrap();
        backend.write_text(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn test_read_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new();
        let result = backend.read_text(dir.path());
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}

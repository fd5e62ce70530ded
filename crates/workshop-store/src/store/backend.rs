use crate::error::Result;
use std::path::Path;

/// Abstract interface for raw text storage.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while PersistenceEngine handles the "what" (encoding, obfuscation, ids).
pub trait StorageBackend {
    /// Read the full text stored at `path`.
    /// Returns Ok(None) if nothing is stored there yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_text(&self, path: &Path) -> Result<Option<String>>;

    /// Replace whatever is stored at `path` with `content`.
    /// Missing parent directories are created.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
}

/// Lets several engines share one backend.
impl<B: StorageBackend + ?Sized> StorageBackend for &B {
    fn read_text(&self, path: &Path) -> Result<Option<String>> {
        (**self).read_text(path)
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        (**self).write_text(path, content)
    }
}

use super::Vfs;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind, Result};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-Memory File System implementation (for testing)
///
/// Directories are implicit: a path is a directory when some file lives below it.
#[derive(Clone, Default, Debug)]
pub struct MemoryVfs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MemoryVfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for seeding a tree.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Result<Self> {
        self.write_from_string(path.as_ref(), content)?;
        Ok(self)
    }

    /// Every stored file, in path order.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PathBuf, String>>> {
        self.files
            .lock()
            .map_err(|_| Error::other("in-memory file system lock poisoned"))
    }

    fn normalize_path(path: &Path) -> PathBuf {
        let normalized: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if normalized.as_os_str().is_empty() {
            return PathBuf::from(".");
        }
        normalized
    }

    fn has_children(files: &BTreeMap<PathBuf, String>, path: &Path) -> bool {
        if path == Path::new(".") || path == Path::new("/") {
            return !files.is_empty();
        }
        files.keys().any(|k| k.starts_with(path) && k != path)
    }
}

impl Vfs for MemoryVfs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = MemoryVfs::normalize_path(path);
        self.lock()?.get(&path).cloned().ok_or_else(|| {
            Error::new(ErrorKind::NotFound, format!("File not found: {:?}", path))
        })
    }

    fn write_from_string(&self, path: &Path, content: &str) -> Result<()> {
        let path = MemoryVfs::normalize_path(path);
        self.lock()?.insert(path, content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let path = MemoryVfs::normalize_path(path);
        self.lock()
            .map(|files| files.contains_key(&path) || MemoryVfs::has_children(&files, &path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = MemoryVfs::normalize_path(path);
        self.lock()
            .map(|files| MemoryVfs::has_children(&files, &path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
        Ok(self
            .lock()?
            .keys()
            .filter(|path| pattern.matches_path(path))
            .cloned()
            .collect())
    }
}

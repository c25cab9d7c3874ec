//! Destinations for rendered mapping functions.

use crate::vfs::Vfs;
use anyhow::Context;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives one rendered function per successful declaration.
pub trait CodeSink {
    /// Accept the rendered text of the function called `name`.
    fn accept(&mut self, name: &str, text: &str) -> crate::Result<()>;
}

/// Writes `<directory>/<name>.<extension>` through a [`Vfs`].
pub struct VfsSink<'v, V: Vfs> {
    vfs: &'v V,
    directory: PathBuf,
    extension: String,
    written: Vec<PathBuf>,
}

impl<'v, V: Vfs> VfsSink<'v, V> {
    pub fn new(vfs: &'v V, directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        VfsSink {
            vfs,
            directory: directory.into(),
            extension: extension.into(),
            written: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", name, self.extension))
    }
}

impl<V: Vfs> CodeSink for VfsSink<'_, V> {
    fn accept(&mut self, name: &str, text: &str) -> crate::Result<()> {
        let path = self.path_for(name);
        self.vfs
            .create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;
        self.vfs
            .write_from_string(&path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Collects rendered functions in memory, keyed by function name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: IndexMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl CodeSink for MemorySink {
    fn accept(&mut self, name: &str, text: &str) -> crate::Result<()> {
        self.files.insert(name.to_string(), text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryVfs, OsVfs};

    #[test]
    fn test_vfs_sink_names_files_after_functions() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new();
        let mut sink = VfsSink::new(&vfs, "out", "kt");
        sink.accept("toUserDto", "fun x() = 1\n")?;

        assert_eq!(sink.written(), &[PathBuf::from("out/toUserDto.kt")]);
        assert_eq!(vfs.read_to_string(Path::new("out/toUserDto.kt"))?, "fun x() = 1\n");
        Ok(())
    }

    #[test]
    fn test_vfs_sink_on_disk() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("generated");
        let mut sink = VfsSink::new(&OsVfs, &out, "kt");
        sink.accept("toA", "a")?;
        sink.accept("toB", "b")?;
        assert_eq!(std::fs::read_to_string(out.join("toB.kt"))?, "b");
        assert_eq!(sink.written().len(), 2);
        Ok(())
    }

    #[test]
    fn test_memory_sink_keeps_order() -> anyhow::Result<()> {
        let mut sink = MemorySink::new();
        sink.accept("toB", "b")?;
        sink.accept("toA", "a")?;
        assert_eq!(sink.names().collect::<Vec<_>>(), vec!["toB", "toA"]);
        assert_eq!(sink.get("toA"), Some("a"));
        Ok(())
    }
}

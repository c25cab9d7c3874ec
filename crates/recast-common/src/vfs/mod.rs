use std::io::Result;
use std::path::{Path, PathBuf};

/// Virtual File System trait
///
/// Abstraction over the file operations recast needs, so that loading and output
/// can run against the OS file system or an in-memory tree in tests.
///
/// # Contract
///
/// - **`exists(path)`**: `true` for an existing file OR directory.
/// - **`is_dir(path)`**: `true` only for a directory. Implies `exists()`.
/// - **`read_to_string(path)`**: only succeeds for files.
/// - **`write_from_string(path, content)`**: creates parent directories as needed.
/// - **`glob(pattern)`**: all matching paths, in sorted order.
pub trait Vfs {
    /// Read a file to a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write a string to a file, overwriting it.
    fn write_from_string(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a path exists (file OR directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Resolve a glob pattern to a sorted list of matching paths.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

pub use memory::MemoryVfs;
pub use os::OsVfs;

mod memory;
mod os;

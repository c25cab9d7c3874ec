pub mod check;
pub mod generate;
pub mod rules;

pub use check::*;
pub use generate::*;
pub use rules::*;

use crate::error::CliError;
use recast_common::config::RecastConfig;
use recast_common::vfs::OsVfs;
use std::path::{Path, PathBuf};

/// Loaded configuration plus the directory its relative paths are resolved against.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub config: RecastConfig,
    pub config_path: Option<PathBuf>,
    pub root: PathBuf,
}

impl ProjectContext {
    /// Load `explicit`, or discover a configuration upwards from `start`.
    ///
    /// Without any configuration file the defaults apply, rooted at `start`.
    pub fn load(explicit: Option<&Path>, start: &Path) -> Result<Self, CliError> {
        let config_path = match explicit {
            Some(path) if !path.exists() => {
                return Err(CliError::ConfigNotFound {
                    start: path.to_path_buf(),
                });
            }
            Some(path) => Some(path.to_path_buf()),
            None => RecastConfig::discover(&OsVfs, start),
        };

        let (config, root) = match &config_path {
            Some(path) => {
                let config = RecastConfig::load(path)?;
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| start.to_path_buf());
                (config, root)
            }
            None => (RecastConfig::default(), start.to_path_buf()),
        };

        Ok(ProjectContext {
            config,
            config_path,
            root,
        })
    }

    /// Resolve `path` against the project root unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Input model path: the CLI override (relative to the working directory) or
    /// the configured one (relative to the project root).
    pub fn input_path(&self, cli: Option<&Path>) -> Result<PathBuf, CliError> {
        let path = match cli {
            Some(path) => path.to_path_buf(),
            None => self.resolve(&self.config.input.path),
        };
        if !path.exists() {
            return Err(CliError::InputMissing { path });
        }
        Ok(path)
    }

    pub fn output_directory(&self, cli: Option<&Path>) -> PathBuf {
        match cli {
            Some(path) => path.to_path_buf(),
            None => self.resolve(&self.config.output.directory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_against_config_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(
            dir.path().join("recast.toml"),
            "[input]\npath = \"types\"\n[output]\ndirectory = \"gen\"\n",
        )?;
        std::fs::create_dir_all(dir.path().join("types"))?;

        let ctx = ProjectContext::load(None, &nested)?;
        assert_eq!(ctx.root, dir.path());
        assert_eq!(ctx.input_path(None)?, dir.path().join("types"));
        assert_eq!(ctx.output_directory(None), dir.path().join("gen"));
        Ok(())
    }

    #[test]
    fn test_defaults_without_config() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let ctx = ProjectContext::load(None, dir.path())?;
        assert!(ctx.config_path.is_none());
        assert!(matches!(
            ctx.input_path(None),
            Err(CliError::InputMissing { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let err = ProjectContext::load(Some(Path::new("/nonexistent/recast.toml")), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound { .. }));
    }
}

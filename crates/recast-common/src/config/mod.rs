//! Configuration module
//!
//! Handles loading and discovery of recast configuration files (`recast.toml`, or
//! `recast.json` when the extension says so) and turns them into generator options
//! and a conversion registry.

pub mod model;

pub use self::model::*;

use crate::vfs::{OsVfs, Vfs};
use anyhow::Context;
use recast_core::{ConversionRegistry, GeneratorOptions, MappingError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File names looked for during discovery, in order of preference
pub const CONFIG_FILE_NAMES: [&str; 2] = ["recast.toml", "recast.json"];

/// Problems with an otherwise well-formed configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Rule '{id}' has a template without the {{it}} placeholder")]
    MissingPlaceholder { id: String },

    #[error(transparent)]
    Registry(#[from] MappingError),
}

impl RecastConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> crate::Result<Self> {
        Self::load_from(&OsVfs, path)
    }

    /// Load configuration through a [`Vfs`]
    pub fn load_from(vfs: &impl Vfs, path: &Path) -> crate::Result<Self> {
        let content = vfs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Invalid TOML config {}", path.display()))?
        };
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Walk up from `start_dir` looking for a configuration file
    pub fn discover(vfs: &impl Vfs, start_dir: &Path) -> Option<PathBuf> {
        let mut current = Some(start_dir);
        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if vfs.exists(&candidate) && !vfs.is_dir(&candidate) {
                    return Some(candidate);
                }
            }
            current = dir.parent();
        }
        None
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        self.mapping.options.clone()
    }

    /// The built-in rules plus every configured template rule at its priority.
    pub fn registry(&self) -> Result<ConversionRegistry, ConfigError> {
        let mut registry = ConversionRegistry::with_defaults();
        for spec in &self.rules {
            if !spec.has_placeholder() {
                return Err(ConfigError::MissingPlaceholder {
                    id: spec.id.to_string(),
                });
            }
            registry.register(spec.priority(), [spec.clone().into_rule()])?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryVfs;
    use recast_core::rules::{RuleId, USER_PRIORITY};
    use recast_core::{InvalidMappingStrategy, MappingStrategy};

    const TOML: &str = r#"
[mapping]
strategy = "all"
invalid_mapping = "fail"
enforce_not_null = true
enabled_rules = ["string-to-int"]
module = "app"

[[rules]]
id = "uuid-to-string"
source = "java.util.UUID"
target = "String"
template = "{it}.toString()"

[input]
path = "types/model.json"

[output]
directory = "out"
indent = 2

[logging]
level = "debug"
"#;

    #[test]
    fn test_load_toml() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("recast.toml");
        std::fs::write(&file_path, TOML)?;

        let config = RecastConfig::load(&file_path)?;
        let options = config.generator_options();
        assert_eq!(options.strategy, MappingStrategy::All);
        assert_eq!(options.invalid_mapping, InvalidMappingStrategy::Fail);
        assert!(options.enforce_not_null);
        assert_eq!(options.enabled_rules, vec![RuleId::from("string-to-int")]);
        assert_eq!(config.mapping.access_context().module, "app");
        assert_eq!(config.input.path, PathBuf::from("types/model.json"));
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.output.indent, 2);
        assert_eq!(config.output.extension, "kt");
        assert_eq!(config.logging.level, "debug");
        Ok(())
    }

    #[test]
    fn test_load_json_by_extension() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new().with_file(
            "recast.json",
            r#"{ "mapping": { "strategy": "explicit" }, "output": { "width": 60 } }"#,
        )?;
        let config = RecastConfig::load_from(&vfs, Path::new("recast.json"))?;
        assert_eq!(config.mapping.options.strategy, MappingStrategy::Explicit);
        assert_eq!(config.output.width, 60);
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.input.path, PathBuf::from("model"));
        Ok(())
    }

    #[test]
    fn test_empty_config_is_default() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new().with_file("recast.toml", "")?;
        let config = RecastConfig::load_from(&vfs, Path::new("recast.toml"))?;
        assert_eq!(config, RecastConfig::default());
        Ok(())
    }

    #[test]
    fn test_discover_walks_up() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(dir.path().join("a/recast.toml"), "")?;

        let found = RecastConfig::discover(&OsVfs, &nested);
        assert_eq!(found, Some(dir.path().join("a/recast.toml")));
        Ok(())
    }

    #[test]
    fn test_registry_includes_user_rules() -> anyhow::Result<()> {
        let config: RecastConfig = toml::from_str(TOML)?;
        let registry = config.registry()?;
        let rule = registry
            .get(&RuleId::from("uuid-to-string"))
            .expect("user rule registered");
        assert_eq!(rule.priority, USER_PRIORITY);
        assert!(registry.contains(&RuleId::from("same-type")));
        Ok(())
    }

    #[test]
    fn test_rule_without_placeholder_is_rejected() {
        let config: RecastConfig = toml::from_str(
            r#"
[[rules]]
id = "broken"
source = "A"
target = "B"
template = "B()"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.registry(),
            Err(ConfigError::MissingPlaceholder { ref id }) if id == "broken"
        ));
    }

    #[test]
    fn test_duplicate_builtin_id_is_rejected() {
        let config: RecastConfig = toml::from_str(
            r#"
[[rules]]
id = "same-type"
source = "A"
target = "B"
template = "{it}"
"#,
        )
        .unwrap();
        assert!(matches!(config.registry(), Err(ConfigError::Registry(_))));
    }
}

//! Input model loading.
//!
//! An input is a JSON document `{ "types": [...], "declarations": [...] }`. A
//! directory input merges every `*.json` file below it in path order.

use crate::vfs::Vfs;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use recast_core::{MappingDeclaration, TypeCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Record shapes plus the declarations to generate against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    #[serde(default)]
    pub types: TypeCatalog,
    #[serde(default)]
    pub declarations: Vec<MappingDeclaration>,
}

impl ModelInput {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Append `other`; type definitions with the same name are replaced.
    pub fn merge(&mut self, other: ModelInput) {
        self.types.extend(other.types);
        self.declarations.extend(other.declarations);
    }
}

/// Load a model file, or every `*.json` file under a directory.
pub fn load_input(vfs: &impl Vfs, path: &Path) -> Result<ModelInput> {
    if !vfs.exists(path) {
        anyhow::bail!("Input path does not exist: {}", path.display());
    }

    let files = if vfs.is_dir(path) {
        let pattern = format!("{}/**/*.json", path.display());
        vfs.glob(&pattern)
            .with_context(|| format!("Failed to scan {}", path.display()))?
    } else {
        vec![path.to_path_buf()]
    };

    let mut input = ModelInput::default();
    let mut origins: IndexMap<String, PathBuf> = IndexMap::new();
    for file in files {
        let content = vfs
            .read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let part = ModelInput::from_json(&content)
            .with_context(|| format!("Failed to parse model {}", file.display()))?;
        debug!(
            "Loaded {} type(s) and {} declaration(s) from {}",
            part.types.len(),
            part.declarations.len(),
            file.display()
        );

        for declaration in &part.declarations {
            let name = declaration.function_name();
            if let Some(first) = origins.get(&name) {
                warn!(
                    "Function {} is declared in both {} and {}",
                    name,
                    first.display(),
                    file.display()
                );
            } else {
                origins.insert(name, file.clone());
            }
        }
        input.merge(part);
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryVfs, OsVfs};
    use recast_core::{TypeModel, TypeName};

    const TYPES: &str = r#"{
        "types": [
            { "name": "com.example.User",
              "properties": [ { "name": "id", "type": { "name": "String", "kind": "scalar" } } ],
              "constructors": [ { "parameters": [ { "name": "id", "type": { "name": "String", "kind": "scalar" } } ] } ] }
        ]
    }"#;

    const DECLARATIONS: &str = r#"{
        "declarations": [
            { "source": { "name": "com.example.User", "kind": "record" },
              "target": { "name": "com.example.UserDto", "kind": "record" } }
        ]
    }"#;

    #[test]
    fn test_single_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("model.json");
        std::fs::write(&file, TYPES)?;

        let input = load_input(&OsVfs, &file)?;
        assert_eq!(input.types.len(), 1);
        assert!(input.declarations.is_empty());
        Ok(())
    }

    #[test]
    fn test_directory_merges_files() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new()
            .with_file("model/types.json", TYPES)?
            .with_file("model/mappings/user.json", DECLARATIONS)?
            .with_file("model/README.md", "ignored")?;

        let input = load_input(&vfs, Path::new("model"))?;
        assert!(input.types.record(&TypeName::parse("com.example.User")).is_some());
        assert_eq!(input.declarations.len(), 1);
        assert_eq!(input.declarations[0].function_name(), "toUserDto");
        Ok(())
    }

    #[test]
    fn test_missing_path() {
        let err = load_input(&MemoryVfs::new(), Path::new("nowhere.json")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_parse_error_names_the_file() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new().with_file("bad.json", "{ not json")?;
        let err = load_input(&vfs, Path::new("bad.json")).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
        Ok(())
    }
}

use recast_core::model::AccessContext;
use recast_core::rules::TemplateRuleSpec;
use recast_core::GeneratorOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration from recast.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecastConfig {
    /// Generator options shared by every declaration
    #[serde(default)]
    pub mapping: MappingSection,

    /// User template rules
    #[serde(default)]
    pub rules: Vec<TemplateRuleSpec>,

    /// Where the type model and declarations are read from
    #[serde(default)]
    pub input: InputSection,

    /// Where and how generated code is written
    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// [mapping] section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingSection {
    #[serde(flatten)]
    pub options: GeneratorOptions,

    /// Compilation module the generated code belongs to; decides `internal` visibility
    #[serde(default)]
    pub module: String,
}

impl MappingSection {
    pub fn access_context(&self) -> AccessContext {
        AccessContext::new(self.module.clone())
    }
}

/// [input] section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Model file, or directory of `*.json` model files
    pub path: PathBuf,
}

impl Default for InputSection {
    fn default() -> Self {
        InputSection {
            path: PathBuf::from("model"),
        }
    }
}

/// [output] section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory receiving one file per generated function
    pub directory: PathBuf,
    /// File extension of generated files
    pub extension: String,
    /// Spaces per indentation level
    pub indent: usize,
    /// Preferred line width
    pub width: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        OutputSection {
            directory: PathBuf::from("generated"),
            extension: "kt".to_string(),
            indent: 4,
            width: 100,
        }
    }
}

/// [logging] section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Optional log file written in addition to stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            level: "info".to_string(),
            file: None,
        }
    }
}

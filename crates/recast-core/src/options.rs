//! Global generator configuration.

use crate::rules::RuleId;
use serde::{Deserialize, Serialize};

/// How explicit mapping entries combine with same-name matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingStrategy {
    /// `Implicit` when every declared entry is an ignore, `Explicit` otherwise
    #[default]
    Auto,
    /// Only explicit entries
    Explicit,
    /// Explicit entries plus all same-name matches
    Implicit,
    /// Like `Implicit`, and every required target member must be mapped
    All,
}

/// What to do with a recoverable validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidMappingStrategy {
    /// Log a warning and drop the offending entry
    #[default]
    Warn,
    /// Fail the declaration
    Fail,
}

/// Options shared by every declaration in a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub strategy: MappingStrategy,
    pub invalid_mapping: InvalidMappingStrategy,
    /// Allow nullable sources to feed non-null targets through a not-null assertion
    pub enforce_not_null: bool,
    /// Rules enabled for every declaration in addition to the default-enabled ones
    pub enabled_rules: Vec<RuleId>,
}

impl GeneratorOptions {
    pub fn with_strategy(mut self, strategy: MappingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_invalid_mapping(mut self, invalid_mapping: InvalidMappingStrategy) -> Self {
        self.invalid_mapping = invalid_mapping;
        self
    }

    pub fn with_enforce_not_null(mut self, enforce: bool) -> Self {
        self.enforce_not_null = enforce;
        self
    }

    pub fn with_enabled_rule(mut self, id: impl Into<RuleId>) -> Self {
        self.enabled_rules.push(id.into());
        self
    }
}

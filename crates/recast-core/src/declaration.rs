//! Mapping declarations and their per-field entries.
//!
//! Declarations arrive already parsed (from annotations, JSON, or code). Each
//! [`MappingEntry`] names one target member and says where its value comes from:
//! a source field, a constant, a host expression, or nowhere (ignored).

use crate::error::{MappingError, Result};
use crate::model::TypeDescriptor;
use crate::naming::TypeName;
use crate::options::MappingStrategy;
use crate::rules::RuleId;
use serde::{Deserialize, Serialize};

/// One per-field directive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default)]
    pub ignore: bool,
    /// Rules enabled only while converting this field
    #[serde(default, rename = "enable", skip_serializing_if = "Vec::is_empty")]
    pub enabled_rules: Vec<RuleId>,
}

/// The single value-producing directive of a valid entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValue<'a> {
    Source(&'a str),
    Constant(&'a str),
    Expression(&'a str),
    Ignore,
}

impl MappingEntry {
    /// `target` takes its value from source field `source`.
    pub fn rename(target: impl Into<String>, source: impl Into<String>) -> Self {
        MappingEntry {
            target: target.into(),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn constant(target: impl Into<String>, constant: impl Into<String>) -> Self {
        MappingEntry {
            target: target.into(),
            constant: Some(constant.into()),
            ..Default::default()
        }
    }

    pub fn expression(target: impl Into<String>, expression: impl Into<String>) -> Self {
        MappingEntry {
            target: target.into(),
            expression: Some(expression.into()),
            ..Default::default()
        }
    }

    pub fn ignore(target: impl Into<String>) -> Self {
        MappingEntry {
            target: target.into(),
            ignore: true,
            ..Default::default()
        }
    }

    pub fn enable(mut self, rule: impl Into<RuleId>) -> Self {
        self.enabled_rules.push(rule.into());
        self
    }

    /// Exactly one of ignore/source/constant/expression must be set. Enabling rules
    /// alone does not make an entry valid.
    pub fn validate(&self) -> Result<EntryValue<'_>> {
        let mut set: Vec<EntryValue<'_>> = Vec::with_capacity(4);
        if self.ignore {
            set.push(EntryValue::Ignore);
        }
        if let Some(source) = &self.source {
            set.push(EntryValue::Source(source));
        }
        if let Some(constant) = &self.constant {
            set.push(EntryValue::Constant(constant));
        }
        if let Some(expression) = &self.expression {
            set.push(EntryValue::Expression(expression));
        }

        match set.as_slice() {
            [single] => Ok(*single),
            [] => Err(MappingError::InvalidMappingEntry {
                target: self.target.clone(),
                reason: "none of ignore, source, constant or expression is set".to_string(),
            }),
            _ => Err(MappingError::InvalidMappingEntry {
                target: self.target.clone(),
                reason: "more than one of ignore, source, constant or expression is set"
                    .to_string(),
            }),
        }
    }

    /// Whether the entry only ignores its target.
    pub fn is_ignore_only(&self) -> bool {
        matches!(self.validate(), Ok(EntryValue::Ignore))
    }
}

/// Per-declaration switches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclarationOptions {
    /// Overrides the global strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MappingStrategy>,
    /// Forced constructor signature: parameter type names in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor: Option<Vec<TypeName>>,
    /// Rules enabled for every field of this declaration
    #[serde(rename = "enable", skip_serializing_if = "Vec::is_empty")]
    pub enabled_rules: Vec<RuleId>,
    /// Name of the generated function's receiver parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_parameter: Option<String>,
}

/// A request to generate one source-to-target mapping function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDeclaration {
    /// Generated function name; defaults to `to<TargetSimpleName>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: TypeDescriptor,
    pub target: TypeDescriptor,
    #[serde(default)]
    pub entries: Vec<MappingEntry>,
    #[serde(default)]
    pub options: DeclarationOptions,
}

/// Known generated function converting `source` into `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingSignature {
    pub source: TypeName,
    pub target: TypeName,
    pub function: String,
}

impl MappingDeclaration {
    pub fn new(source: TypeDescriptor, target: TypeDescriptor) -> Self {
        MappingDeclaration {
            name: None,
            source,
            target,
            entries: Vec::new(),
            options: DeclarationOptions::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn entry(mut self, entry: MappingEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_strategy(mut self, strategy: MappingStrategy) -> Self {
        self.options.strategy = Some(strategy);
        self
    }

    pub fn with_constructor(mut self, signature: Vec<TypeName>) -> Self {
        self.options.constructor = Some(signature);
        self
    }

    pub fn enable(mut self, rule: impl Into<RuleId>) -> Self {
        self.options.enabled_rules.push(rule.into());
        self
    }

    pub fn function_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("to{}", self.target.name.simple_name()))
    }

    pub fn source_parameter(&self) -> &str {
        self.options.source_parameter.as_deref().unwrap_or("source")
    }

    pub fn signature(&self) -> MappingSignature {
        MappingSignature {
            source: self.source.name.clone(),
            target: self.target.name.clone(),
            function: self.function_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;
    use rstest::rstest;

    #[rstest]
    #[case(MappingEntry::rename("a", "b"), EntryValue::Source("b"))]
    #[case(MappingEntry::constant("a", "42"), EntryValue::Constant("42"))]
    #[case(MappingEntry::expression("a", "it.x + 1"), EntryValue::Expression("it.x + 1"))]
    #[case(MappingEntry::ignore("a"), EntryValue::Ignore)]
    fn test_valid_entries(#[case] entry: MappingEntry, #[case] expected: EntryValue<'static>) {
        assert_eq!(entry.validate().unwrap(), expected);
    }

    #[test]
    fn test_entry_with_nothing_set_is_invalid() {
        let entry = MappingEntry {
            target: "a".into(),
            ..Default::default()
        }
        .enable("string-to-int");
        let err = entry.validate().unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::InvalidMappingEntry);
    }

    #[test]
    fn test_entry_with_two_values_is_invalid() {
        let mut entry = MappingEntry::rename("a", "b");
        entry.constant = Some("1".into());
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_default_function_name() {
        let decl = MappingDeclaration::new(
            TypeDescriptor::record("com.example.User"),
            TypeDescriptor::record("com.example.UserDto"),
        );
        assert_eq!(decl.function_name(), "toUserDto");
        assert_eq!(decl.source_parameter(), "source");
    }

    #[test]
    fn test_deserialize_declaration() {
        let json = r#"{
            "source": { "name": "com.example.User", "kind": "record" },
            "target": { "name": "com.example.UserDto", "kind": "record" },
            "entries": [
                { "target": "fullName", "source": "name" },
                { "target": "age", "source": "age", "enable": ["string-to-int"] }
            ],
            "options": { "strategy": "explicit", "constructor": ["String", "Int"] }
        }"#;
        let decl: MappingDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(decl.entries.len(), 2);
        assert_eq!(decl.entries[1].enabled_rules, vec![RuleId::from("string-to-int")]);
        assert_eq!(decl.options.strategy, Some(MappingStrategy::Explicit));
        assert_eq!(decl.options.constructor.as_ref().map(Vec::len), Some(2));
    }
}

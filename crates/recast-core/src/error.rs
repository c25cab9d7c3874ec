//! Error types for mapping resolution and code synthesis
//!
//! Every failure is scoped to one mapping declaration. [`MappingError::kind`] gives a
//! stable, machine-checkable [`DiagnosticKind`]; [`Diagnostic`] is the serializable
//! record attached to a declaration's outcome, used for both warnings and errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

/// Machine-checkable diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    InvalidMappingEntry,
    UnknownSourceField,
    UnknownTargetField,
    DuplicateTargetMapping,
    UnmappedTarget,
    AmbiguousConstructor,
    NoMatchingConstructor,
    PropertyMappingNotExisting,
    NoMatchingConverter,
    NullSafetyViolation,
    MissingEnumValue,
    InaccessibleType,
    UnknownType,
    DuplicateRule,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::InvalidMappingEntry => "invalid-mapping-entry",
            DiagnosticKind::UnknownSourceField => "unknown-source-field",
            DiagnosticKind::UnknownTargetField => "unknown-target-field",
            DiagnosticKind::DuplicateTargetMapping => "duplicate-target-mapping",
            DiagnosticKind::UnmappedTarget => "unmapped-target",
            DiagnosticKind::AmbiguousConstructor => "ambiguous-constructor",
            DiagnosticKind::NoMatchingConstructor => "no-matching-constructor",
            DiagnosticKind::PropertyMappingNotExisting => "property-mapping-not-existing",
            DiagnosticKind::NoMatchingConverter => "no-matching-converter",
            DiagnosticKind::NullSafetyViolation => "null-safety-violation",
            DiagnosticKind::MissingEnumValue => "missing-enum-value",
            DiagnosticKind::InaccessibleType => "inaccessible-type",
            DiagnosticKind::UnknownType => "unknown-type",
            DiagnosticKind::DuplicateRule => "duplicate-rule",
        };
        f.write_str(text)
    }
}

/// Main error type for mapping resolution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("invalid mapping entry for target `{target}`: {reason}")]
    InvalidMappingEntry { target: String, reason: String },

    #[error(
        "unknown source field `{field}` on `{source_type}` (available: {})",
        .available.join(", ")
    )]
    UnknownSourceField {
        field: String,
        source_type: String,
        available: Vec<String>,
    },

    #[error(
        "unknown target field `{field}` on `{target_type}` (available: {})",
        .available.join(", ")
    )]
    UnknownTargetField {
        field: String,
        target_type: String,
        available: Vec<String>,
    },

    #[error("target field `{field}` is mapped more than once")]
    DuplicateTargetMapping { field: String },

    #[error(
        "target `{target_type}` has unmapped required members: {}",
        .fields.join(", ")
    )]
    UnmappedTarget {
        target_type: String,
        fields: Vec<String>,
    },

    #[error(
        "ambiguous constructor for `{target_type}`: candidates {} are equally suitable",
        .candidates.join(" and ")
    )]
    AmbiguousConstructor {
        target_type: String,
        candidates: Vec<String>,
    },

    #[error(
        "no matching constructor for `{target_type}` (attempted: {}; mapped fields: {})",
        .attempted.join(", "),
        .mapped.join(", ")
    )]
    NoMatchingConstructor {
        target_type: String,
        attempted: Vec<String>,
        mapped: Vec<String>,
    },

    #[error(
        "no constructor parameter or settable property `{field}` on `{target_type}`"
    )]
    PropertyMappingNotExisting { field: String, target_type: String },

    #[error("no conversion rule from `{source_type}` to `{target_type}`")]
    NoMatchingConverter {
        source_type: String,
        target_type: String,
    },

    #[error(
        "nullable `{source_type}` cannot be assigned to non-nullable `{target_type}` \
         without enforcing not-null"
    )]
    NullSafetyViolation {
        source_type: String,
        target_type: String,
    },

    #[error(
        "enum `{target_type}` has no values for {} of `{source_type}`",
        .missing.join(", ")
    )]
    MissingEnumValue {
        source_type: String,
        target_type: String,
        missing: Vec<String>,
    },

    #[error("`{name}` is not accessible from generated code")]
    InaccessibleType { name: String },

    #[error("unknown record type `{name}`")]
    UnknownType { name: String },

    #[error("conversion rule `{id}` is already registered")]
    DuplicateRule { id: String },

    #[error("cannot map `{field}`: {cause}")]
    Field {
        field: String,
        #[source]
        cause: Box<MappingError>,
    },
}

impl MappingError {
    /// Stable category of this error. Field context is transparent.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            MappingError::InvalidMappingEntry { .. } => DiagnosticKind::InvalidMappingEntry,
            MappingError::UnknownSourceField { .. } => DiagnosticKind::UnknownSourceField,
            MappingError::UnknownTargetField { .. } => DiagnosticKind::UnknownTargetField,
            MappingError::DuplicateTargetMapping { .. } => DiagnosticKind::DuplicateTargetMapping,
            MappingError::UnmappedTarget { .. } => DiagnosticKind::UnmappedTarget,
            MappingError::AmbiguousConstructor { .. } => DiagnosticKind::AmbiguousConstructor,
            MappingError::NoMatchingConstructor { .. } => DiagnosticKind::NoMatchingConstructor,
            MappingError::PropertyMappingNotExisting { .. } => {
                DiagnosticKind::PropertyMappingNotExisting
            }
            MappingError::NoMatchingConverter { .. } => DiagnosticKind::NoMatchingConverter,
            MappingError::NullSafetyViolation { .. } => DiagnosticKind::NullSafetyViolation,
            MappingError::MissingEnumValue { .. } => DiagnosticKind::MissingEnumValue,
            MappingError::InaccessibleType { .. } => DiagnosticKind::InaccessibleType,
            MappingError::UnknownType { .. } => DiagnosticKind::UnknownType,
            MappingError::DuplicateRule { .. } => DiagnosticKind::DuplicateRule,
            MappingError::Field { cause, .. } => cause.kind(),
        }
    }

    /// Attach the target field being resolved.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        MappingError::Field {
            field: field.into(),
            cause: Box::new(self),
        }
    }

    /// The innermost error, skipping field context.
    pub fn root(&self) -> &MappingError {
        match self {
            MappingError::Field { cause, .. } => cause.root(),
            other => other,
        }
    }
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A warning or error attached to one mapping declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(error: &MappingError) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn error(error: &MappingError) -> Self {
        Diagnostic {
            severity: Severity::Error,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}[{}]: {}", level, self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_context_keeps_kind() {
        let err = MappingError::NullSafetyViolation {
            source_type: "String?".into(),
            target_type: "String".into(),
        }
        .in_field("id");
        assert_eq!(err.kind(), DiagnosticKind::NullSafetyViolation);
        assert!(err.to_string().starts_with("cannot map `id`: nullable `String?`"));
        assert!(matches!(err.root(), MappingError::NullSafetyViolation { .. }));
    }

    #[test]
    fn test_diagnostic_serializes_kind_kebab_case() {
        let err = MappingError::MissingEnumValue {
            source_type: "Color".into(),
            target_type: "Shade".into(),
            missing: vec!["GREEN".into()],
        };
        let diagnostic = Diagnostic::error(&err);
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "missing-enum-value");
        assert_eq!(json["severity"], "error");
        assert!(diagnostic.message.contains("GREEN"));
    }
}

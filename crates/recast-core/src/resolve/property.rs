//! Property mapping resolution.
//!
//! Explicit entries are validated one by one; a problem either drops the entry with a
//! warning or fails the declaration. Depending on the [`MappingStrategy`], source data
//! whose name matches a receivable target member are then added as implicit
//! assignments. Explicit assignments always come first and win over implicit ones.

use super::Diagnostics;
use crate::declaration::{EntryValue, MappingEntry};
use crate::error::{MappingError, Result};
use crate::extract::{SourceDatum, TargetData};
use crate::model::TypeDescriptor;
use crate::options::{InvalidMappingStrategy, MappingStrategy};
use crate::rules::RuleId;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Where the value of a target member comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "value", rename_all = "camelCase")]
pub enum AssignmentValue {
    Source { datum: SourceDatum },
    Constant { text: String },
    Expression { code: String },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssignmentOrigin {
    Explicit,
    Implicit,
}

/// The decision for one target member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAssignment {
    pub target: String,
    #[serde(flatten)]
    pub value: AssignmentValue,
    /// Rules enabled while converting this assignment
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enabled_rules: Vec<RuleId>,
    pub origin: AssignmentOrigin,
}

impl ResolvedAssignment {
    pub fn is_ignored(&self) -> bool {
        matches!(self.value, AssignmentValue::Ignored)
    }

    pub fn source(&self) -> Option<&SourceDatum> {
        match &self.value {
            AssignmentValue::Source { datum } => Some(datum),
            _ => None,
        }
    }
}

/// Output of [`PropertyResolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct PropertyResolution {
    /// Strategy actually applied, with `Auto` decided
    pub strategy: MappingStrategy,
    pub assignments: Vec<ResolvedAssignment>,
}

impl PropertyResolution {
    pub fn get(&self, target: &str) -> Option<&ResolvedAssignment> {
        self.assignments.iter().find(|a| a.target == target)
    }

    /// Names of assignments that carry a value.
    pub fn assigned_names(&self) -> Vec<String> {
        self.assignments
            .iter()
            .filter(|a| !a.is_ignored())
            .map(|a| a.target.clone())
            .collect()
    }
}

/// Merges explicit entries with same-name matches for one declaration.
pub struct PropertyResolver<'a> {
    pub strategy: MappingStrategy,
    pub source_type: &'a TypeDescriptor,
    pub source: &'a [SourceDatum],
    pub target: &'a TargetData,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(
        strategy: MappingStrategy,
        source_type: &'a TypeDescriptor,
        source: &'a [SourceDatum],
        target: &'a TargetData,
    ) -> Self {
        PropertyResolver {
            strategy,
            source_type,
            source,
            target,
        }
    }

    /// Resolve `entries` into ordered assignments, reporting recoverable problems to
    /// `diagnostics`.
    pub fn resolve(
        &self,
        entries: &[MappingEntry],
        diagnostics: &mut Diagnostics,
    ) -> Result<PropertyResolution> {
        // AUTO looks at the declared entries, before validation drops any of them.
        let strategy = match self.strategy {
            MappingStrategy::Auto if entries.iter().all(MappingEntry::is_ignore_only) => {
                MappingStrategy::Implicit
            }
            MappingStrategy::Auto => MappingStrategy::Explicit,
            other => other,
        };
        debug!("Applying {:?} mapping strategy", strategy);

        let explicit = self.explicit_assignments(entries, diagnostics)?;

        let mut assignments = explicit;
        if matches!(strategy, MappingStrategy::Implicit | MappingStrategy::All) {
            let implicit = self.implicit_assignments(&assignments);
            assignments.extend(implicit);
        }

        if strategy == MappingStrategy::All {
            self.check_all_mapped(&assignments)?;
        }

        Ok(PropertyResolution {
            strategy,
            assignments,
        })
    }

    fn explicit_assignments(
        &self,
        entries: &[MappingEntry],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<ResolvedAssignment>> {
        let mut assignments: Vec<ResolvedAssignment> = Vec::new();

        for entry in entries {
            let value = match entry.validate() {
                Ok(value) => value,
                Err(err) => {
                    diagnostics.recover(err)?;
                    continue;
                }
            };

            if assignments.iter().any(|a| a.target == entry.target) {
                diagnostics.recover(MappingError::DuplicateTargetMapping {
                    field: entry.target.clone(),
                })?;
                continue;
            }

            if !self.target.accepts(&entry.target) {
                diagnostics.recover(MappingError::UnknownTargetField {
                    field: entry.target.clone(),
                    target_type: self.target.name.to_string(),
                    available: self.target.member_names(),
                })?;
                continue;
            }

            let value = match value {
                EntryValue::Source(name) => match self.source.iter().find(|d| d.name == name) {
                    Some(datum) => AssignmentValue::Source {
                        datum: datum.clone(),
                    },
                    None => {
                        diagnostics.recover(MappingError::UnknownSourceField {
                            field: name.to_string(),
                            source_type: self.source_type.to_string(),
                            available: self.source.iter().map(|d| d.name.clone()).collect(),
                        })?;
                        continue;
                    }
                },
                EntryValue::Constant(text) => AssignmentValue::Constant {
                    text: text.to_string(),
                },
                EntryValue::Expression(code) => AssignmentValue::Expression {
                    code: code.to_string(),
                },
                EntryValue::Ignore => AssignmentValue::Ignored,
            };

            assignments.push(ResolvedAssignment {
                target: entry.target.clone(),
                value,
                enabled_rules: entry.enabled_rules.clone(),
                origin: AssignmentOrigin::Explicit,
            });
        }

        Ok(assignments)
    }

    fn implicit_assignments(&self, explicit: &[ResolvedAssignment]) -> Vec<ResolvedAssignment> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut implicit = Vec::new();

        for datum in self.source {
            if explicit.iter().any(|a| a.target == datum.name) || !self.target.accepts(&datum.name)
            {
                continue;
            }
            if !seen.insert(datum.name.as_str()) {
                warn!(
                    "Source `{}` exposes `{}` more than once; using the first",
                    self.source_type, datum.name
                );
                continue;
            }
            implicit.push(ResolvedAssignment {
                target: datum.name.clone(),
                value: AssignmentValue::Source {
                    datum: datum.clone(),
                },
                enabled_rules: Vec::new(),
                origin: AssignmentOrigin::Implicit,
            });
        }

        implicit
    }

    /// Required members: parameters that are required in every visible constructor,
    /// and non-nullable mutable properties. Ignored members count as covered.
    fn check_all_mapped(&self, assignments: &[ResolvedAssignment]) -> Result<()> {
        let covered = |name: &str| assignments.iter().any(|a| a.target == name);
        let mut unmapped: Vec<String> = Vec::new();

        if let Some((first, rest)) = self.target.constructors.split_first() {
            for param in first.parameters.iter().filter(|p| !p.is_optional()) {
                let required_everywhere = rest.iter().all(|c| {
                    c.parameter(&param.name)
                        .is_some_and(|other| !other.is_optional())
                });
                if required_everywhere && !covered(&param.name) {
                    unmapped.push(param.name.clone());
                }
            }
        }

        for property in &self.target.mutable_properties {
            if !property.tpe.nullable
                && !covered(&property.name)
                && !unmapped.contains(&property.name)
            {
                unmapped.push(property.name.clone());
            }
        }

        if unmapped.is_empty() {
            Ok(())
        } else {
            Err(MappingError::UnmappedTarget {
                target_type: self.target.name.to_string(),
                fields: unmapped,
            })
        }
    }
}

/// Convenience for the common case: resolve with a fresh collector.
pub fn resolve_properties(
    resolver: &PropertyResolver<'_>,
    entries: &[MappingEntry],
    invalid_mapping: InvalidMappingStrategy,
) -> Result<(PropertyResolution, Diagnostics)> {
    let mut diagnostics = Diagnostics::new(invalid_mapping);
    let resolution = resolver.resolve(entries, &mut diagnostics)?;
    Ok((resolution, diagnostics))
}

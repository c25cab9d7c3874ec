//! Conversion rules.
//!
//! A rule is a tagged record `{ id, priority, enabled_by_default, matcher, emitter }`.
//! The matcher decides whether the rule can convert a `(source, target)` type pair; the
//! emitter turns a source expression into a target expression. Structurally recursive
//! rules (containers, enums, records) re-enter the registry through the
//! [`ConversionContext`] they are given.

pub mod containers;
pub mod enums;
pub mod nullability;
pub mod records;
pub mod same_type;
pub mod scalar;
pub mod template;

pub use template::TemplateRuleSpec;

use crate::code::Expr;
use crate::context::ConversionContext;
use crate::error::Result;
use crate::model::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Resolution order: lower values are tried first.
pub type Priority = i32;

/// Identity and same-type conversions
pub const MAX_PRIORITY: Priority = 0;
/// Rules contributed by configuration
pub const USER_PRIORITY: Priority = 1000;
/// Calls to other generated mapping functions
pub const MAPPING_PRIORITY: Priority = 2000;
/// Built-in scalar, enum and container rules
pub const DEFAULT_PRIORITY: Priority = 3000;

/// Stable identifier of a conversion rule, e.g. `string-to-int`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        RuleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        RuleId(value.to_string())
    }
}

impl From<String> for RuleId {
    fn from(value: String) -> Self {
        RuleId(value)
    }
}

/// Match predicate of a rule
pub type Matcher =
    Arc<dyn Fn(&ConversionContext<'_>, &TypeDescriptor, &TypeDescriptor) -> bool + Send + Sync>;

/// Code emission function of a rule
pub type Emitter = Arc<
    dyn Fn(&mut ConversionContext<'_>, Expr, &TypeDescriptor, &TypeDescriptor) -> Result<Expr>
        + Send
        + Sync,
>;

/// A conversion rule record.
#[derive(Clone)]
pub struct ConversionRule {
    pub id: RuleId,
    pub priority: Priority,
    pub enabled_by_default: bool,
    pub description: String,
    matcher: Matcher,
    emitter: Emitter,
}

impl ConversionRule {
    pub fn new<M, E>(id: impl Into<RuleId>, enabled_by_default: bool, matcher: M, emitter: E) -> Self
    where
        M: Fn(&ConversionContext<'_>, &TypeDescriptor, &TypeDescriptor) -> bool
            + Send
            + Sync
            + 'static,
        E: Fn(&mut ConversionContext<'_>, Expr, &TypeDescriptor, &TypeDescriptor) -> Result<Expr>
            + Send
            + Sync
            + 'static,
    {
        ConversionRule {
            id: id.into(),
            priority: DEFAULT_PRIORITY,
            enabled_by_default,
            description: String::new(),
            matcher: Arc::new(matcher),
            emitter: Arc::new(emitter),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn matches(
        &self,
        ctx: &ConversionContext<'_>,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> bool {
        (self.matcher)(ctx, source, target)
    }

    pub fn emit(
        &self,
        ctx: &mut ConversionContext<'_>,
        value: Expr,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Result<Expr> {
        (self.emitter)(ctx, value, source, target)
    }
}

impl fmt::Debug for ConversionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("enabled_by_default", &self.enabled_by_default)
            .finish_non_exhaustive()
    }
}

/// The built-in rule set, grouped by priority.
pub fn builtin_rules() -> Vec<(Priority, Vec<ConversionRule>)> {
    vec![
        (MAX_PRIORITY, vec![same_type::same_type()]),
        (MAPPING_PRIORITY, vec![records::record_to_record()]),
        (
            DEFAULT_PRIORITY,
            [
                vec![
                    enums::enum_to_enum(),
                    containers::collection_to_collection(),
                    containers::map_to_map(),
                ],
                scalar::scalar_rules(),
                vec![same_type::to_any()],
            ]
            .concat(),
        ),
    ]
}

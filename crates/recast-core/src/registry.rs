//! Conversion rule registry
//!
//! Rules live in priority buckets. Resolution walks buckets in ascending priority and,
//! inside a bucket, in registration order, returning the first enabled rule that
//! matches. Enablement beyond a rule's default comes from the global options and from
//! the innermost frame of the [`ScopeStack`] carried by the [`ConversionContext`].

use crate::context::ConversionContext;
use crate::error::{MappingError, Result};
use crate::model::TypeDescriptor;
use crate::rules::{self, ConversionRule, Priority, RuleId};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Priority-bucketed collection of conversion rules
#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    buckets: BTreeMap<Priority, Vec<ConversionRule>>,
}

impl ConversionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in rule set
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (priority, rules) in rules::builtin_rules() {
            for rule in rules {
                registry.insert(rule.with_priority(priority));
            }
        }
        registry
    }

    fn insert(&mut self, rule: ConversionRule) {
        self.buckets.entry(rule.priority).or_default().push(rule);
    }

    /// Register rules at `priority`, preserving their order within the bucket.
    ///
    /// Fails without registering anything if an id is already present.
    pub fn register(
        &mut self,
        priority: Priority,
        rules: impl IntoIterator<Item = ConversionRule>,
    ) -> Result<()> {
        let rules: Vec<ConversionRule> = rules.into_iter().collect();
        for (index, rule) in rules.iter().enumerate() {
            let repeated = rules[..index].iter().any(|r| r.id == rule.id);
            if repeated || self.contains(&rule.id) {
                return Err(MappingError::DuplicateRule {
                    id: rule.id.to_string(),
                });
            }
        }
        for rule in rules {
            debug!("Registering conversion rule {} at priority {}", rule.id, priority);
            self.insert(rule.with_priority(priority));
        }
        Ok(())
    }

    /// All rules in resolution order
    pub fn rules(&self) -> impl Iterator<Item = &ConversionRule> {
        self.buckets.values().flatten()
    }

    pub fn get(&self, id: &RuleId) -> Option<&ConversionRule> {
        self.rules().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RuleId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First enabled rule matching `(source, target)`, or `None`.
    pub fn resolve<'r>(
        &'r self,
        ctx: &ConversionContext<'_>,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Option<&'r ConversionRule> {
        let found = self
            .rules()
            .filter(|rule| ctx.is_enabled(rule))
            .find(|rule| rule.matches(ctx, source, target));
        match found {
            Some(rule) => trace!("Resolved {} -> {} with rule {}", source, target, rule.id),
            None => trace!("No rule converts {} -> {}", source, target),
        }
        found
    }
}

/// Nested rule-enablement frames.
///
/// Only the innermost frame is consulted, so a frame pushed for one field never
/// leaks into a sibling field once popped.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Vec<RuleId>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Vec<RuleId>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Vec<RuleId>> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Rules enabled by the innermost frame
    pub fn innermost(&self) -> &[RuleId] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn enables(&self, id: &RuleId) -> bool {
        self.innermost().contains(id)
    }
}

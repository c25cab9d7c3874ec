//! Explicit resolution context threaded through rule matching and emission.
//!
//! The context owns the scope stack for one declaration and borrows everything else
//! (registry, options, known mapping signatures). There is no global state: each
//! declaration, and each worker thread, gets its own context.

use crate::code::Expr;
use crate::declaration::MappingSignature;
use crate::error::{MappingError, Result};
use crate::model::TypeDescriptor;
use crate::naming::TypeName;
use crate::options::GeneratorOptions;
use crate::registry::{ConversionRegistry, ScopeStack};
use crate::rules::{ConversionRule, RuleId};
use tracing::debug;

pub struct ConversionContext<'a> {
    registry: &'a ConversionRegistry,
    options: &'a GeneratorOptions,
    signatures: &'a [MappingSignature],
    scopes: ScopeStack,
    bindings: usize,
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        registry: &'a ConversionRegistry,
        options: &'a GeneratorOptions,
        signatures: &'a [MappingSignature],
    ) -> Self {
        ConversionContext {
            registry,
            options,
            signatures,
            scopes: ScopeStack::new(),
            bindings: 0,
        }
    }

    pub fn registry(&self) -> &'a ConversionRegistry {
        self.registry
    }

    pub fn options(&self) -> &'a GeneratorOptions {
        self.options
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn enforce_not_null(&self) -> bool {
        self.options.enforce_not_null
    }

    /// Enabled by default, globally, or by the innermost scope.
    pub fn is_enabled(&self, rule: &ConversionRule) -> bool {
        rule.enabled_by_default
            || self.options.enabled_rules.contains(&rule.id)
            || self.scopes.enables(&rule.id)
    }

    pub fn resolve(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Option<&'a ConversionRule> {
        self.registry.resolve(self, source, target)
    }

    pub fn can_convert(&self, source: &TypeDescriptor, target: &TypeDescriptor) -> bool {
        self.resolve(source, target).is_some()
    }

    /// Resolve a rule for `(source, target)` and emit the conversion of `value`.
    pub fn convert(
        &mut self,
        value: Expr,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Result<Expr> {
        self.convert_with_rule(value, source, target)
            .map(|(expr, _)| expr)
    }

    /// Like [`convert`](Self::convert), also reporting which rule was chosen.
    pub fn convert_with_rule(
        &mut self,
        value: Expr,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Result<(Expr, RuleId)> {
        let rule = self
            .resolve(source, target)
            .ok_or_else(|| MappingError::NoMatchingConverter {
                source_type: source.to_string(),
                target_type: target.to_string(),
            })?;
        debug!("Converting {} -> {} with {}", source, target, rule.id);
        let expr = rule.emit(self, value, source, target)?;
        Ok((expr, rule.id.clone()))
    }

    /// Run `body` with `extra` rules enabled in a fresh innermost scope.
    pub fn with_scoped_rules<T>(
        &mut self,
        extra: &[RuleId],
        body: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.scopes.push(extra.to_vec());
        let result = body(self);
        self.scopes.pop();
        result
    }

    /// Run `body` with a lambda parameter name not used by any enclosing lambda.
    pub fn with_binding<T>(&mut self, body: impl FnOnce(&mut Self, String) -> T) -> T {
        let name = match self.bindings {
            0 => "it".to_string(),
            n => format!("it{n}"),
        };
        self.bindings += 1;
        let result = body(self, name);
        self.bindings -= 1;
        result
    }

    /// Generated mapping function converting `source` to `target`, if any.
    pub fn signature(&self, source: &TypeName, target: &TypeName) -> Option<&'a MappingSignature> {
        self.signatures
            .iter()
            .find(|s| s.source.same_as(source) && s.target.same_as(target))
    }
}

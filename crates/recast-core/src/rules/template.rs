//! Template rules: one-line conversions between two named types.
//!
//! The template is host code in which `{it}` stands for the source expression, e.g.
//! `{it}.toString()`. Built-in scalar rules and the `[[rules]]` entries of a
//! configuration file are both expressed this way.

use super::nullability::bridge;
use super::{ConversionRule, Priority, RuleId, USER_PRIORITY};
use crate::code::Expr;
use crate::naming::TypeName;
use serde::{Deserialize, Serialize};

/// Placeholder for the source expression inside a template
pub const PLACEHOLDER: &str = "{it}";

fn default_enabled() -> bool {
    true
}

/// Declarative description of a template rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateRuleSpec {
    pub id: RuleId,
    pub source: TypeName,
    pub target: TypeName,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default = "default_enabled")]
    pub enabled_by_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TemplateRuleSpec {
    pub fn new(
        id: impl Into<RuleId>,
        source: impl Into<TypeName>,
        target: impl Into<TypeName>,
        template: impl Into<String>,
    ) -> Self {
        TemplateRuleSpec {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            template: template.into(),
            priority: None,
            enabled_by_default: true,
            description: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }

    /// Priority to register at; configuration rules default to [`USER_PRIORITY`].
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or(USER_PRIORITY)
    }

    pub fn has_placeholder(&self) -> bool {
        self.template.contains(PLACEHOLDER)
    }

    pub fn into_rule(self) -> ConversionRule {
        let priority = self.priority();
        let description = self
            .description
            .clone()
            .unwrap_or_else(|| format!("{} -> {}: {}", self.source, self.target, self.template));
        let TemplateRuleSpec {
            id,
            source,
            target,
            template,
            enabled_by_default,
            ..
        } = self;
        ConversionRule::new(
            id,
            enabled_by_default,
            move |_, s, t| s.name.same_as(&source) && t.name.same_as(&target),
            move |ctx, value, s, t| {
                bridge(ctx, value, s, t, |_, v| Ok(Expr::template(template.clone(), v)))
            },
        )
        .with_priority(priority)
        .describe(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConversionContext;
    use crate::model::TypeDescriptor;
    use crate::options::GeneratorOptions;
    use crate::registry::ConversionRegistry;

    #[test]
    fn test_deserialize_spec() {
        let json = r#"{
            "id": "uuid-to-string",
            "source": "java.util.UUID",
            "target": "String",
            "template": "{it}.toString()"
        }"#;
        let spec: TemplateRuleSpec = serde_json::from_str(json).unwrap();
        assert!(spec.enabled_by_default);
        assert!(spec.has_placeholder());
        assert_eq!(spec.priority(), USER_PRIORITY);
    }

    #[test]
    fn test_template_rule_matches_by_name() {
        let rule = TemplateRuleSpec::new("uuid-to-string", "java.util.UUID", "String", "{it}.toString()")
            .into_rule();
        let registry = ConversionRegistry::new();
        let options = GeneratorOptions::default();
        let mut ctx = ConversionContext::new(&registry, &options, &[]);
        let uuid = TypeDescriptor::scalar("java.util.UUID");
        let string = TypeDescriptor::scalar("kotlin.String");
        assert!(rule.matches(&ctx, &uuid, &string));
        assert!(!rule.matches(&ctx, &string, &uuid));

        let out = rule.emit(&mut ctx, Expr::var("id"), &uuid, &string).unwrap();
        assert_eq!(out, Expr::template("{it}.toString()", Expr::var("id")));
    }
}

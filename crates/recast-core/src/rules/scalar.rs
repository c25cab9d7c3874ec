//! Built-in scalar conversions.
//!
//! Lossless directions are enabled by default. Parsing strings and narrowing numbers
//! can fail or lose information at runtime, so those rules have to be enabled for a
//! field or a declaration before they apply.

use super::nullability::bridge;
use super::template::TemplateRuleSpec;
use super::{ConversionRule, DEFAULT_PRIORITY};
use crate::code::Expr;

/// Numeric types by widening rank.
const NUMBERS: [&str; 6] = ["Byte", "Short", "Int", "Long", "Float", "Double"];

const TO_STRING: [&str; 8] = ["Byte", "Short", "Int", "Long", "Float", "Double", "Boolean", "Char"];

fn rule_id(source: &str, target: &str) -> String {
    format!("{}-to-{}", source.to_lowercase(), target.to_lowercase())
}

fn builtin(source: &str, target: &str, template: String, enabled: bool) -> ConversionRule {
    TemplateRuleSpec {
        priority: Some(DEFAULT_PRIORITY),
        ..TemplateRuleSpec::new(rule_id(source, target), source, target, template).enabled(enabled)
    }
    .into_rule()
}

/// All built-in scalar rules in registration order.
pub fn scalar_rules() -> Vec<ConversionRule> {
    let mut rules = Vec::new();

    for name in TO_STRING {
        rules.push(builtin(name, "String", "{it}.toString()".to_string(), true));
    }

    for name in NUMBERS {
        rules.push(builtin("String", name, format!("{{it}}.to{name}()"), false));
    }
    rules.push(builtin("String", "Boolean", "{it}.toBoolean()".to_string(), false));

    for (from_rank, from) in NUMBERS.iter().enumerate() {
        for (to_rank, to) in NUMBERS.iter().enumerate() {
            if from_rank != to_rank {
                let widening = to_rank > from_rank;
                rules.push(builtin(from, to, format!("{{it}}.to{to}()"), widening));
            }
        }
    }

    rules.push(enum_to_string());
    rules.push(string_to_enum());
    rules
}

fn enum_to_string() -> ConversionRule {
    ConversionRule::new(
        "enum-to-string",
        true,
        |_, source, target| source.is_enum() && target.name.is_builtin_named("String"),
        |ctx, value, source, target| bridge(ctx, value, source, target, |_, v| Ok(v.property("name"))),
    )
    .describe("Enum -> String: variant name")
}

fn string_to_enum() -> ConversionRule {
    ConversionRule::new(
        "string-to-enum",
        false,
        |_, source, target| source.name.is_builtin_named("String") && target.is_enum(),
        |ctx, value, source, target| {
            let function = format!("{}.valueOf", target.name);
            bridge(ctx, value, source, target, |_, v| Ok(Expr::function(function, vec![v])))
        },
    )
    .describe("String -> Enum: valueOf")
}

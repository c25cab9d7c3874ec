//! Enum-to-enum conversion by variant name.

use super::nullability::bridge;
use super::ConversionRule;
use crate::code::{Expr, WhenArm, WhenPattern};
use crate::error::MappingError;
use crate::model::TypeDescriptor;

/// Source variants with no same-named target variant, in source order.
///
/// Non-enum inputs have no variants, so nothing is reported missing for them.
pub fn missing_variants(source: &TypeDescriptor, target: &TypeDescriptor) -> Vec<String> {
    let target_variants = target.enum_variants().unwrap_or(&[]);
    source
        .enum_variants()
        .unwrap_or(&[])
        .iter()
        .filter(|v| !target_variants.contains(v))
        .cloned()
        .collect()
}

fn variant_arms(source: &TypeDescriptor, target: &TypeDescriptor) -> Vec<WhenArm> {
    source
        .enum_variants()
        .unwrap_or(&[])
        .iter()
        .map(|variant| WhenArm {
            pattern: WhenPattern::EnumValue {
                enum_type: source.name.clone(),
                variant: variant.clone(),
            },
            value: Expr::EnumValue {
                enum_type: target.name.clone(),
                variant: variant.clone(),
            },
        })
        .collect()
}

pub fn enum_to_enum() -> ConversionRule {
    ConversionRule::new(
        "enum-to-enum",
        true,
        |_, source, target| source.is_enum() && target.is_enum(),
        |ctx, value, source, target| {
            let missing = missing_variants(source, target);
            if !missing.is_empty() {
                return Err(MappingError::MissingEnumValue {
                    source_type: source.non_null().to_string(),
                    target_type: target.non_null().to_string(),
                    missing,
                });
            }

            let arms = variant_arms(source, target);
            if source.nullable && target.nullable {
                let mut all = vec![WhenArm {
                    pattern: WhenPattern::Null,
                    value: Expr::Null,
                }];
                all.extend(arms);
                return Ok(Expr::When {
                    subject: Box::new(value),
                    arms: all,
                });
            }

            bridge(ctx, value, source, target, |_, v| {
                Ok(Expr::When {
                    subject: Box::new(v),
                    arms,
                })
            })
        },
    )
    .describe("Enum -> Enum: exhaustive dispatch by variant name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConversionContext;
    use crate::error::DiagnosticKind;
    use crate::options::GeneratorOptions;
    use crate::registry::ConversionRegistry;

    fn color() -> TypeDescriptor {
        TypeDescriptor::enumeration("com.example.Color", ["RED", "GREEN"])
    }

    fn shade() -> TypeDescriptor {
        TypeDescriptor::enumeration("com.example.Shade", ["RED"])
    }

    #[test]
    fn test_missing_variants_is_stable() {
        let first = missing_variants(&color(), &shade());
        let second = missing_variants(&color(), &shade());
        assert_eq!(first, vec!["GREEN".to_string()]);
        assert_eq!(first, second);
        assert!(missing_variants(&shade(), &color()).is_empty());
    }

    #[test]
    fn test_missing_variant_fails() {
        let registry = ConversionRegistry::with_defaults();
        let options = GeneratorOptions::default();
        let mut ctx = ConversionContext::new(&registry, &options, &[]);
        let err = ctx
            .convert(Expr::var("color"), &color(), &shade())
            .unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::MissingEnumValue);
        assert!(err.to_string().contains("GREEN"));
    }

    #[test]
    fn test_nullable_enum_gets_null_arm() {
        let registry = ConversionRegistry::with_defaults();
        let options = GeneratorOptions::default();
        let mut ctx = ConversionContext::new(&registry, &options, &[]);
        let out = ctx
            .convert(Expr::var("shade"), &shade().nullable(), &color().nullable())
            .unwrap();
        match out {
            Expr::When { arms, .. } => {
                assert_eq!(arms.len(), 2);
                assert_eq!(arms[0].pattern, WhenPattern::Null);
                assert_eq!(arms[0].value, Expr::Null);
            }
            other => panic!("Expected when, got {other:?}"),
        }
    }
}

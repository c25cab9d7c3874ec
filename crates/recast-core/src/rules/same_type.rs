//! Identity conversions.

use super::nullability::bridge;
use super::ConversionRule;

/// Source and target are the same type up to outer nullability.
pub fn same_type() -> ConversionRule {
    ConversionRule::new(
        "same-type",
        true,
        |_, source, target| source.same_type_ignoring_nullability(target),
        |ctx, value, source, target| bridge(ctx, value, source, target, |_, v| Ok(v)),
    )
    .describe("Use the value as-is")
}

/// Anything converts to `Any` by upcast.
pub fn to_any() -> ConversionRule {
    ConversionRule::new(
        "to-any",
        true,
        |_, _, target| target.name.is_any(),
        |ctx, value, source, target| bridge(ctx, value, source, target, |_, v| Ok(v)),
    )
    .describe("Upcast to Any")
}

//! Record-to-record conversion through generated mapping functions.

use super::nullability::bridge;
use super::ConversionRule;
use crate::error::MappingError;

/// Matches a record pair for which a mapping function is being generated, either the
/// current declaration or any other declaration of the batch. Emits `value.toTarget()`,
/// or `value?.toTarget()` for nullable pairs.
pub fn record_to_record() -> ConversionRule {
    ConversionRule::new(
        "record-to-record",
        true,
        |ctx, source, target| {
            source.is_record()
                && target.is_record()
                && ctx.signature(&source.name, &target.name).is_some()
        },
        |ctx, value, source, target| {
            let signature = ctx.signature(&source.name, &target.name).ok_or_else(|| {
                MappingError::NoMatchingConverter {
                    source_type: source.to_string(),
                    target_type: target.to_string(),
                }
            })?;
            bridge(ctx, value, source, target, |_, v| {
                Ok(v.call(signature.function.clone(), vec![]))
            })
        },
    )
    .describe("Record -> Record: call the generated mapping function")
}

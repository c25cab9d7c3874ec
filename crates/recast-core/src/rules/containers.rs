//! Container conversions: element-wise transforms over collections and maps.
//!
//! Element conversions re-enter the registry, so a `List<User>` to `Set<UserDto>`
//! conversion finds the record rule for its elements. The emitted code copies as little
//! as possible:
//!
//! - identical elements, compatible container: the value itself
//! - identical elements, different container: a single materializing copy
//! - changed elements: `map { ... }`, plus a copy if `map`'s result does not fit

use super::nullability::bridge;
use super::ConversionRule;
use crate::code::Expr;
use crate::error::MappingError;
use crate::model::{TypeDescriptor, TypeKind};

fn not_a_container(source: &TypeDescriptor, target: &TypeDescriptor) -> MappingError {
    MappingError::NoMatchingConverter {
        source_type: source.to_string(),
        target_type: target.to_string(),
    }
}

pub fn collection_to_collection() -> ConversionRule {
    ConversionRule::new(
        "collection-to-collection",
        true,
        |ctx, source, target| match (&source.kind, &target.kind) {
            (
                TypeKind::Collection { element: se, .. },
                TypeKind::Collection { element: te, .. },
            ) => ctx.can_convert(se, te),
            _ => false,
        },
        |ctx, value, source, target| {
            let (
                TypeKind::Collection {
                    collection: source_kind,
                    element: source_element,
                },
                TypeKind::Collection {
                    collection: target_kind,
                    element: target_element,
                },
            ) = (&source.kind, &target.kind)
            else {
                return Err(not_a_container(source, target));
            };

            bridge(ctx, value, source, target, |ctx, v| {
                let (binding, body) = ctx.with_binding(|ctx, binding| {
                    let body = ctx.convert(Expr::var(&binding), source_element, target_element)?;
                    Ok::<_, MappingError>((binding, body))
                })?;

                if body.is_var(&binding) {
                    if source_kind.satisfies(*target_kind) {
                        return Ok(v);
                    }
                    return Ok(v.call(target_kind.materializer(), vec![]));
                }

                let mapped = v.call("map", vec![Expr::lambda(binding, body)]);
                if source_kind.mapped().satisfies(*target_kind) {
                    Ok(mapped)
                } else {
                    Ok(mapped.call(target_kind.materializer(), vec![]))
                }
            })
        },
    )
    .describe("Collection -> Collection: element-wise transform")
}

pub fn map_to_map() -> ConversionRule {
    ConversionRule::new(
        "map-to-map",
        true,
        |ctx, source, target| match (&source.kind, &target.kind) {
            (
                TypeKind::Map {
                    key: sk, value: sv, ..
                },
                TypeKind::Map {
                    key: tk, value: tv, ..
                },
            ) => ctx.can_convert(sk, tk) && ctx.can_convert(sv, tv),
            _ => false,
        },
        |ctx, value, source, target| {
            let (
                TypeKind::Map {
                    mutable: source_mutable,
                    key: source_key,
                    value: source_value,
                },
                TypeKind::Map {
                    mutable: target_mutable,
                    key: target_key,
                    value: target_value,
                },
            ) = (&source.kind, &target.kind)
            else {
                return Err(not_a_container(source, target));
            };

            bridge(ctx, value, source, target, |ctx, v| {
                let (entry, key, val) = ctx.with_binding(|ctx, entry| {
                    let key = ctx.convert(
                        Expr::var(&entry).property("key"),
                        source_key,
                        target_key,
                    )?;
                    let val = ctx.convert(
                        Expr::var(&entry).property("value"),
                        source_value,
                        target_value,
                    )?;
                    Ok::<_, MappingError>((entry, key, val))
                })?;

                let key_changed = key != Expr::var(&entry).property("key");
                let value_changed = val != Expr::var(&entry).property("value");
                let converted = match (key_changed, value_changed) {
                    (false, false) => v,
                    (false, true) => v.call("mapValues", vec![Expr::lambda(entry, val)]),
                    (true, false) => v.call("mapKeys", vec![Expr::lambda(entry, key)]),
                    (true, true) => v.property("entries").call(
                        "associate",
                        vec![Expr::lambda(entry, Expr::pair(key, val))],
                    ),
                };

                let copied = key_changed || value_changed;
                if *target_mutable && (copied || !*source_mutable) {
                    Ok(converted.call("toMutableMap", vec![]))
                } else {
                    Ok(converted)
                }
            })
        },
    )
    .describe("Map -> Map: key and value transform")
}

//! Constructor selection.
//!
//! A constructor qualifies when every parameter is either assigned, defaulted, or
//! nullable, and every assignment it does not take can be written afterwards through a
//! mutable property or setter. Among qualifying constructors the one leaving the fewest assignments for
//! the post-construction block wins; a tie is an error, never a guess.

use super::property::ResolvedAssignment;
use crate::error::{MappingError, Result};
use crate::extract::TargetData;
use crate::model::ConstructorCandidate;
use crate::naming::TypeName;
use tracing::debug;

fn assigned(assignments: &[ResolvedAssignment]) -> Vec<&str> {
    assignments
        .iter()
        .filter(|a| !a.is_ignored())
        .map(|a| a.target.as_str())
        .collect()
}

fn attempted(target: &TargetData) -> Vec<String> {
    target
        .constructors
        .iter()
        .map(|c| format!("({})", c.parameter_names().join(", ")))
        .collect()
}

fn no_match(target: &TargetData, assigned: &[&str]) -> MappingError {
    MappingError::NoMatchingConstructor {
        target_type: target.name.to_string(),
        attempted: attempted(target),
        mapped: assigned.iter().map(|s| s.to_string()).collect(),
    }
}

/// Pick the constructor of `target` that receives `assignments`.
///
/// With a `forced` signature, the first visible constructor whose parameter types
/// match it position by position is used, and each of its parameters must then be
/// assigned, defaulted, or nullable.
pub fn select_constructor<'t>(
    target: &'t TargetData,
    assignments: &[ResolvedAssignment],
    forced: Option<&[TypeName]>,
) -> Result<&'t ConstructorCandidate> {
    let assigned = assigned(assignments);

    if let Some(signature) = forced {
        let constructor = target
            .constructors
            .iter()
            .find(|c| c.matches_signature(signature))
            .ok_or_else(|| no_match(target, &assigned))?;

        let unresolved: Vec<String> = constructor
            .parameters
            .iter()
            .filter(|p| !p.is_optional() && !assigned.contains(&p.name.as_str()))
            .map(|p| p.name.clone())
            .collect();
        if !unresolved.is_empty() {
            return Err(MappingError::UnmappedTarget {
                target_type: target.name.to_string(),
                fields: unresolved,
            });
        }
        debug!("Using forced constructor {}", constructor);
        return Ok(constructor);
    }

    let receiving: Vec<&ConstructorCandidate> = target
        .constructors
        .iter()
        .filter(|c| {
            c.parameters
                .iter()
                .all(|p| p.is_optional() || assigned.contains(&p.name.as_str()))
        })
        .collect();

    // Assignments a constructor does not take must be writable afterwards.
    let mut unsettable: Option<&str> = None;
    let scored: Vec<(usize, &ConstructorCandidate)> = receiving
        .iter()
        .filter_map(|c| {
            let leftover: Vec<&str> = assigned
                .iter()
                .copied()
                .filter(|name| c.parameter(name).is_none())
                .collect();
            match leftover.iter().copied().find(|name| !target.is_settable(name)) {
                Some(name) => {
                    debug!("Skipping constructor {}: '{}' cannot be set afterwards", c, name);
                    unsettable.get_or_insert(name);
                    None
                }
                None => Some((leftover.len(), *c)),
            }
        })
        .collect();

    let Some(best) = scored.iter().map(|(score, _)| *score).min() else {
        return Err(match unsettable {
            Some(field) => MappingError::PropertyMappingNotExisting {
                field: field.to_string(),
                target_type: target.name.to_string(),
            },
            None => no_match(target, &assigned),
        });
    };

    let winners: Vec<&ConstructorCandidate> = scored
        .iter()
        .filter(|(score, _)| *score == best)
        .map(|(_, c)| *c)
        .collect();

    match winners.as_slice() {
        [single] => {
            debug!(
                "Selected constructor {} leaving {} post-construction assignment(s)",
                single, best
            );
            Ok(*single)
        }
        _ => Err(MappingError::AmbiguousConstructor {
            target_type: target.name.to_string(),
            candidates: winners.iter().map(|c| c.to_string()).collect(),
        }),
    }
}

//! Outer-nullability handling shared by every rule.
//!
//! Matchers compare types without their outermost `?`; the emitters then go through
//! [`bridge`], which wraps the non-null conversion according to the nullability of
//! both ends.

use crate::code::Expr;
use crate::context::ConversionContext;
use crate::error::{MappingError, Result};
use crate::model::TypeDescriptor;

/// Convert `value` from `source` to `target`, where `convert` produces the conversion of
/// a value already known to be non-null.
///
/// | source    | target    | result                                            |
/// |-----------|-----------|---------------------------------------------------|
/// | non-null  | any       | `convert(value)`                                  |
/// | nullable  | nullable  | `value?.let { it -> convert(it) }`, simplified    |
/// | nullable  | non-null  | `convert(value!!)` if not-null is enforced        |
///
/// The last case is a [`MappingError::NullSafetyViolation`] when enforcement is off.
pub fn bridge<F>(
    ctx: &mut ConversionContext<'_>,
    value: Expr,
    source: &TypeDescriptor,
    target: &TypeDescriptor,
    convert: F,
) -> Result<Expr>
where
    F: FnOnce(&mut ConversionContext<'_>, Expr) -> Result<Expr>,
{
    match (source.nullable, target.nullable) {
        (false, _) => convert(ctx, value),
        (true, true) => ctx.with_binding(|ctx, binding| {
            let body = convert(ctx, Expr::var(&binding))?;
            Ok(safe_let(value, binding, body))
        }),
        (true, false) if ctx.enforce_not_null() => convert(ctx, value.not_null()),
        (true, false) => Err(MappingError::NullSafetyViolation {
            source_type: source.to_string(),
            target_type: target.to_string(),
        }),
    }
}

/// `subject?.let { binding -> body }`, collapsed to a plain safe call or property read
/// when `body` only dereferences the binding.
pub fn safe_let(subject: Expr, binding: String, body: Expr) -> Expr {
    if body.is_var(&binding) {
        return subject;
    }
    match body {
        Expr::Call {
            receiver: Some(receiver),
            function,
            args,
            safe: false,
        } if receiver.is_var(&binding) && !args.iter().any(|a| a.mentions(&binding)) => {
            subject.safe_call(function, args)
        }
        Expr::Property {
            receiver,
            name,
            safe: false,
        } if receiver.is_var(&binding) => Expr::Property {
            receiver: Box::new(subject),
            name,
            safe: true,
        },
        body => subject.safe_let(binding, body),
    }
}

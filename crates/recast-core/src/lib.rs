//! Recast core: type-directed record mapping resolution and code synthesis.
//!
//! Given the structural shape of a source and a target record type plus an optional
//! list of per-field overrides, the engine decides which constructor to call, which
//! source datum feeds each target member, and which conversion rule turns one into the
//! other. The result is an abstract [`code::MappingFunction`] that a host renderer turns
//! into source text.
//!
//! The pieces, leaves first:
//! - [`model`]: type descriptors and the [`model::TypeModel`] catalog of record shapes
//! - [`registry`]: priority-bucketed conversion rules and the scoped enablement stack
//! - [`rules`]: the built-in rule set (identity, scalars, enums, containers, records)
//! - [`extract`]: visible source data and target construction facts
//! - [`resolve`]: property mapping and constructor selection
//! - [`generate`]: per-declaration code synthesis and batch processing

pub mod code;
pub mod context;
pub mod declaration;
pub mod error;
pub mod extract;
pub mod generate;
pub mod model;
pub mod naming;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod rules;

pub use code::{Expr, MappingFunction};
pub use context::ConversionContext;
pub use declaration::{MappingDeclaration, MappingEntry};
pub use error::{Diagnostic, DiagnosticKind, MappingError, Result, Severity};
pub use generate::{DeclarationOutcome, GeneratedMapping, MappingGenerator, RecordMappingPlan};
pub use model::{TypeCatalog, TypeDescriptor, TypeKind, TypeModel};
pub use naming::TypeName;
pub use options::{GeneratorOptions, InvalidMappingStrategy, MappingStrategy};
pub use registry::ConversionRegistry;
pub use rules::{ConversionRule, RuleId};

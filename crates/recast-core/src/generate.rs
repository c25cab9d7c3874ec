//! Mapping code generation.
//!
//! For each declaration the generator extracts both record shapes, resolves the
//! assignments, selects a constructor and converts every source-backed value through
//! the registry. The outcome is a [`MappingFunction`] plus the [`RecordMappingPlan`]
//! that explains it. Plans are built fresh for every declaration and never cached:
//! per-field rule enablement can change the converter chosen for the same type pair.

use crate::code::{Argument, AssignTarget, Construction, Expr, MappingFunction, PropertyAssignment};
use crate::context::ConversionContext;
use crate::declaration::{MappingDeclaration, MappingSignature};
use crate::error::{Diagnostic, MappingError, Result};
use crate::extract::{extract_source_data, extract_target_data, TargetData};
use crate::model::{AccessContext, ConstructorCandidate, TypeDescriptor, TypeModel};
use crate::naming::TypeName;
use crate::options::GeneratorOptions;
use crate::registry::ConversionRegistry;
use crate::resolve::{
    select_constructor, AssignmentOrigin, AssignmentValue, Diagnostics, PropertyResolver,
    ResolvedAssignment,
};
use crate::rules::RuleId;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

/// One target member with its final value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedAssignment {
    pub target: String,
    pub value: Expr,
    /// Conversion rule used, for source-backed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
    pub origin: AssignmentOrigin,
}

/// A planned write after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostConstructionAssignment {
    pub via: AssignTarget,
    #[serde(flatten)]
    pub assignment: PlannedAssignment,
}

/// The decisions behind one generated function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMappingPlan {
    pub constructor: ConstructorCandidate,
    pub constructor_assignments: Vec<PlannedAssignment>,
    pub post_construction_assignments: Vec<PostConstructionAssignment>,
}

/// A successfully generated declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMapping {
    pub function: MappingFunction,
    pub plan: RecordMappingPlan,
    /// Warnings raised while resolving
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of one declaration in a batch.
#[derive(Debug, Clone)]
pub struct DeclarationOutcome {
    /// Generated function name
    pub name: String,
    pub source: TypeName,
    pub target: TypeName,
    pub result: std::result::Result<GeneratedMapping, MappingError>,
    /// Warnings, plus the fatal error if generation failed
    pub diagnostics: Vec<Diagnostic>,
}

impl DeclarationOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn mapping(&self) -> Option<&GeneratedMapping> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&MappingError> {
        self.result.as_ref().err()
    }
}

/// Generates mapping functions against one type model, rule registry and option set.
pub struct MappingGenerator<'a> {
    model: &'a dyn TypeModel,
    registry: &'a ConversionRegistry,
    options: &'a GeneratorOptions,
    access: AccessContext,
}

impl<'a> MappingGenerator<'a> {
    pub fn new(
        model: &'a dyn TypeModel,
        registry: &'a ConversionRegistry,
        options: &'a GeneratorOptions,
    ) -> Self {
        MappingGenerator {
            model,
            registry,
            options,
            access: AccessContext::default(),
        }
    }

    /// Set the compilation module the generated code lives in.
    pub fn with_access(mut self, access: AccessContext) -> Self {
        self.access = access;
        self
    }

    /// Generate a single declaration; only its own signature is known to the record rule.
    pub fn generate(&self, declaration: &MappingDeclaration) -> Result<GeneratedMapping> {
        let signatures = [declaration.signature()];
        let mut diagnostics = Diagnostics::new(self.options.invalid_mapping);
        let (function, plan) = self.build(declaration, &signatures, &mut diagnostics)?;
        Ok(GeneratedMapping {
            function,
            plan,
            diagnostics: diagnostics.into_vec(),
        })
    }

    /// Generate every declaration. Each one sees the signatures of all others, and a
    /// failure is recorded on its own outcome without stopping the batch.
    pub fn generate_all(&self, declarations: &[MappingDeclaration]) -> Vec<DeclarationOutcome> {
        let signatures: Vec<MappingSignature> =
            declarations.iter().map(MappingDeclaration::signature).collect();
        declarations
            .iter()
            .map(|declaration| self.generate_in_batch(declaration, &signatures))
            .collect()
    }

    /// Generate one declaration with the given set of known mapping signatures.
    pub fn generate_in_batch(
        &self,
        declaration: &MappingDeclaration,
        signatures: &[MappingSignature],
    ) -> DeclarationOutcome {
        let mut diagnostics = Diagnostics::new(self.options.invalid_mapping);
        let result = self.build(declaration, signatures, &mut diagnostics);
        let mut diagnostics = diagnostics.into_vec();

        let result = match result {
            Ok((function, plan)) => Ok(GeneratedMapping {
                function,
                plan,
                diagnostics: diagnostics.clone(),
            }),
            Err(err) => {
                warn!("Mapping {} failed: {}", declaration.function_name(), err);
                diagnostics.push(Diagnostic::error(&err));
                Err(err)
            }
        };

        DeclarationOutcome {
            name: declaration.function_name(),
            source: declaration.source.name.clone(),
            target: declaration.target.name.clone(),
            result,
            diagnostics,
        }
    }

    fn build(
        &self,
        declaration: &MappingDeclaration,
        signatures: &[MappingSignature],
        diagnostics: &mut Diagnostics,
    ) -> Result<(MappingFunction, RecordMappingPlan)> {
        let name = declaration.function_name();
        let span = info_span!(
            "mapping",
            function = %name,
            source = %declaration.source,
            target = %declaration.target
        );
        let _enter = span.enter();

        let source_data = extract_source_data(self.model, &self.access, &declaration.source)?;
        let target = extract_target_data(self.model, &self.access, &declaration.target)?;

        let strategy = declaration.options.strategy.unwrap_or(self.options.strategy);
        let resolver = PropertyResolver::new(strategy, &declaration.source, &source_data, &target);
        let resolution = resolver.resolve(&declaration.entries, diagnostics)?;

        let constructor = select_constructor(
            &target,
            &resolution.assignments,
            declaration.options.constructor.as_deref(),
        )?;

        let mut ctx = ConversionContext::new(self.registry, self.options, signatures);
        let receiver = Expr::var(declaration.source_parameter());
        let assignments: Vec<&ResolvedAssignment> = resolution
            .assignments
            .iter()
            .filter(|a| !a.is_ignored())
            .collect();

        let mut args = Vec::new();
        let mut constructor_assignments = Vec::new();
        for param in &constructor.parameters {
            match assignments.iter().find(|a| a.target == param.name) {
                Some(assignment) => {
                    let planned =
                        self.plan(&mut ctx, declaration, &receiver, assignment, &param.tpe)?;
                    args.push(Argument {
                        name: param.name.clone(),
                        value: planned.value.clone(),
                    });
                    constructor_assignments.push(planned);
                }
                None if param.has_default => {}
                None if param.tpe.nullable => args.push(Argument {
                    name: param.name.clone(),
                    value: Expr::Null,
                }),
                None => {
                    return Err(MappingError::UnmappedTarget {
                        target_type: target.name.to_string(),
                        fields: vec![param.name.clone()],
                    });
                }
            }
        }

        let mut post_construction_assignments = Vec::new();
        for assignment in assignments
            .iter()
            .filter(|a| constructor.parameter(&a.target).is_none())
        {
            let (via, tpe) = settable(&target, &assignment.target)?;
            let planned = self.plan(&mut ctx, declaration, &receiver, assignment, &tpe)?;
            post_construction_assignments.push(PostConstructionAssignment {
                via,
                assignment: planned,
            });
        }

        info!(
            "Generated {} with {} constructor argument(s) and {} assignment(s)",
            name,
            args.len(),
            post_construction_assignments.len()
        );

        let body = Construction {
            constructor: Expr::Construct {
                target: declaration.target.name.clone(),
                args,
            },
            assignments: post_construction_assignments
                .iter()
                .map(|p| PropertyAssignment {
                    target: p.via.clone(),
                    value: p.assignment.value.clone(),
                })
                .collect(),
        };

        let function = MappingFunction {
            name,
            parameter: declaration.source_parameter().to_string(),
            source: declaration.source.clone(),
            target: declaration.target.clone(),
            body,
        };

        let plan = RecordMappingPlan {
            constructor: constructor.clone(),
            constructor_assignments,
            post_construction_assignments,
        };

        Ok((function, plan))
    }

    /// Final value of one non-ignored assignment into a slot of type `target`.
    fn plan(
        &self,
        ctx: &mut ConversionContext<'_>,
        declaration: &MappingDeclaration,
        receiver: &Expr,
        assignment: &ResolvedAssignment,
        target: &TypeDescriptor,
    ) -> Result<PlannedAssignment> {
        let (value, rule) = match &assignment.value {
            AssignmentValue::Source { datum } => {
                let mut scope = assignment.enabled_rules.clone();
                scope.extend(declaration.options.enabled_rules.iter().cloned());
                let (value, rule) = ctx
                    .with_scoped_rules(&scope, |ctx| {
                        ctx.convert_with_rule(datum.access(receiver.clone()), &datum.tpe, target)
                    })
                    .map_err(|e| e.in_field(&assignment.target))?;
                debug!("{} <- {} via {}", assignment.target, datum.name, rule);
                (value, Some(rule))
            }
            AssignmentValue::Constant { text } => (Expr::literal(text), None),
            AssignmentValue::Expression { code } => (Expr::raw(code), None),
            AssignmentValue::Ignored => {
                return Err(MappingError::InvalidMappingEntry {
                    target: assignment.target.clone(),
                    reason: "ignored members receive no value".to_string(),
                });
            }
        };

        Ok(PlannedAssignment {
            target: assignment.target.clone(),
            value,
            rule,
            origin: assignment.origin,
        })
    }
}

/// How `name` is written after construction, and the type it accepts.
fn settable(target: &TargetData, name: &str) -> Result<(AssignTarget, TypeDescriptor)> {
    if let Some(property) = target.mutable_property(name) {
        return Ok((
            AssignTarget::Property {
                name: property.name.clone(),
            },
            property.tpe.clone(),
        ));
    }
    if let Some(setter) = target.setter(name) {
        return Ok((
            AssignTarget::Setter {
                method: setter.method.clone(),
            },
            setter.tpe.clone(),
        ));
    }
    Err(MappingError::PropertyMappingNotExisting {
        field: name.to_string(),
        target_type: target.name.to_string(),
    })
}

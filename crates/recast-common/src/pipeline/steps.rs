//! The stages of a generation run and the report they build.

use crate::loader::{load_input, ModelInput};
use crate::render::Renderer;
use crate::sink::CodeSink;
use crate::vfs::Vfs;
use crate::Result;
use recast_core::model::AccessContext;
use recast_core::{
    ConversionRegistry, DeclarationOutcome, Diagnostic, GeneratorOptions, MappingGenerator,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Reads the input model from a file or directory.
pub struct LoadStep<'v, V: Vfs> {
    vfs: &'v V,
}

impl<'v, V: Vfs> LoadStep<'v, V> {
    pub fn new(vfs: &'v V) -> Self {
        LoadStep { vfs }
    }
}

impl<V: Vfs> LoadStep<'_, V> {
    pub fn load(&self, input: &Path) -> Result<ModelInput> {
        load_input(self.vfs, input)
    }
}

/// Generates every declaration of the model as one batch.
pub struct GenerateStep {
    registry: ConversionRegistry,
    options: GeneratorOptions,
    access: AccessContext,
}

impl GenerateStep {
    pub fn new(registry: ConversionRegistry, options: GeneratorOptions) -> Self {
        GenerateStep {
            registry,
            options,
            access: AccessContext::default(),
        }
    }

    pub fn with_access(mut self, access: AccessContext) -> Self {
        self.access = access;
        self
    }
}

impl GenerateStep {
    /// Generate every declaration of `input`; failures are recorded per outcome.
    pub fn generate(&self, input: &ModelInput) -> GenerationReport {
        let generator = MappingGenerator::new(&input.types, &self.registry, &self.options)
            .with_access(self.access.clone());
        let outcomes = generator.generate_all(&input.declarations);
        let report = GenerationReport {
            outcomes,
            rendered: Vec::new(),
        };
        info!(
            "Generated {} of {} declaration(s)",
            report.succeeded(),
            report.outcomes.len()
        );
        report
    }
}

/// Renders every successful outcome of a report.
pub struct RenderStep {
    renderer: Renderer,
}

impl RenderStep {
    pub fn new(renderer: Renderer) -> Self {
        RenderStep { renderer }
    }
}

impl RenderStep {
    pub fn render(&self, report: &mut GenerationReport) -> Result<()> {
        let mut rendered = Vec::new();
        for mapping in report.outcomes.iter().filter_map(DeclarationOutcome::mapping) {
            rendered.push(RenderedMapping {
                name: mapping.function.name.clone(),
                text: self.renderer.render_file(&mapping.function)?,
            });
        }
        report.rendered = rendered;
        Ok(())
    }
}

/// Source text of one generated function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMapping {
    pub name: String,
    pub text: String,
}

/// Per-declaration outcomes of a run, plus rendered text once rendered.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub outcomes: Vec<DeclarationOutcome>,
    pub rendered: Vec<RenderedMapping>,
}

impl GenerationReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Every diagnostic, tagged with the function it belongs to.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.outcomes
            .iter()
            .flat_map(|o| o.diagnostics.iter().map(move |d| (o.name.as_str(), d)))
    }

    /// Hand every rendered function to `sink`; returns how many were written.
    pub fn write_to(&self, sink: &mut dyn CodeSink) -> Result<usize> {
        for mapping in &self.rendered {
            sink.accept(&mapping.name, &mapping.text)?;
        }
        Ok(self.rendered.len())
    }
}

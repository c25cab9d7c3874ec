//! Generation pipeline.
//!
//! Every run loads the input model and generates all of its declarations as one
//! batch, so a failing declaration never stops the others. `recast generate` adds a
//! render stage and writes the successful functions through a [`CodeSink`];
//! `recast check` stops after generation.

use crate::render::Renderer;
use crate::sink::CodeSink;
use crate::vfs::Vfs;
use crate::Result;
use std::path::Path;
use tracing::{debug, info};

pub mod steps;

pub use steps::{GenerateStep, GenerationReport, LoadStep, RenderStep, RenderedMapping};

/// Load, generate and optionally render one input model.
pub struct GenerationPipeline<'v, V: Vfs> {
    load: LoadStep<'v, V>,
    generate: GenerateStep,
    render: Option<RenderStep>,
}

impl<'v, V: Vfs> GenerationPipeline<'v, V> {
    pub fn new(vfs: &'v V, generate: GenerateStep) -> Self {
        GenerationPipeline {
            load: LoadStep::new(vfs),
            generate,
            render: None,
        }
    }

    /// Render every successful declaration with `renderer`.
    pub fn rendering(mut self, renderer: Renderer) -> Self {
        self.render = Some(RenderStep::new(renderer));
        self
    }

    pub fn run(&self, input: &Path) -> Result<GenerationReport> {
        let model = self.load.load(input)?;
        let mut report = self.generate.generate(&model);
        if let Some(render) = &self.render {
            render.render(&mut report)?;
            debug!("Rendered {} function(s)", report.rendered.len());
        }
        Ok(report)
    }

    /// Run, then hand every rendered function to `sink`.
    pub fn run_into(&self, input: &Path, sink: &mut dyn CodeSink) -> Result<GenerationReport> {
        let report = self.run(input)?;
        let written = report.write_to(sink)?;
        info!(
            "Wrote {} function(s), {} declaration(s) failed",
            written,
            report.failed()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::vfs::MemoryVfs;
    use recast_core::{ConversionRegistry, DiagnosticKind, GeneratorOptions};

    const MODEL: &str = r#"{
        "types": [
            { "name": "com.example.User",
              "properties": [
                { "name": "id", "type": { "name": "String", "kind": "scalar" } },
                { "name": "age", "type": { "name": "Int", "kind": "scalar" } }
              ],
              "constructors": [ { "parameters": [
                { "name": "id", "type": { "name": "String", "kind": "scalar" } },
                { "name": "age", "type": { "name": "Int", "kind": "scalar" } }
              ] } ] },
            { "name": "com.example.UserDto",
              "properties": [
                { "name": "id", "type": { "name": "String", "kind": "scalar" } },
                { "name": "age", "type": { "name": "Int", "kind": "scalar" }, "mutable": true }
              ],
              "constructors": [ { "parameters": [
                { "name": "id", "type": { "name": "String", "kind": "scalar" } }
              ] } ] }
        ],
        "declarations": [
            { "source": { "name": "com.example.User", "kind": "record" },
              "target": { "name": "com.example.UserDto", "kind": "record" } },
            { "source": { "name": "com.example.User", "kind": "record" },
              "target": { "name": "com.example.Missing", "kind": "record" } }
        ]
    }"#;

    fn generate_step() -> GenerateStep {
        GenerateStep::new(ConversionRegistry::with_defaults(), GeneratorOptions::default())
    }

    #[test]
    fn test_render_and_write_successful_declarations() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new().with_file("model.json", MODEL)?;
        let pipeline = GenerationPipeline::new(&vfs, generate_step()).rendering(Renderer::default());

        let mut sink = MemorySink::new();
        let report = pipeline.run_into(Path::new("model.json"), &mut sink)?;
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());

        let (name, diagnostic) = report.diagnostics().next().expect("one diagnostic");
        assert_eq!(name, "toMissing");
        assert_eq!(diagnostic.kind, DiagnosticKind::UnknownType);

        assert_eq!(sink.len(), 1);
        let text = sink.get("toUserDto").expect("rendered");
        assert!(text.contains("com.example.UserDto(id = source.id).apply {"));
        assert!(text.contains("age = source.age"));
        Ok(())
    }

    #[test]
    fn test_without_renderer_nothing_is_written() -> anyhow::Result<()> {
        let vfs = MemoryVfs::new().with_file("model.json", MODEL)?;
        let pipeline = GenerationPipeline::new(&vfs, generate_step());

        let mut sink = MemorySink::new();
        let report = pipeline.run_into(Path::new("model.json"), &mut sink)?;
        assert_eq!(report.outcomes.len(), 2);
        assert!(report.rendered.is_empty());
        assert!(sink.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let vfs = MemoryVfs::new();
        let pipeline = GenerationPipeline::new(&vfs, generate_step());
        assert!(pipeline.run(Path::new("model.json")).is_err());
    }
}

//! `recast generate`: resolve every declaration and write one file per function.

use super::ProjectContext;
use crate::error::CliError;
use crate::output::{write_json, GenerateOutput, OutputFormat};
use recast_common::pipeline::{GenerateStep, GenerationPipeline};
use recast_common::render::Renderer;
use recast_common::sink::VfsSink;
use recast_common::vfs::OsVfs;
use starbase::AppResult;
use std::path::PathBuf;
use tracing::info;

/// Run the generate command
pub fn run_generate(
    ctx: &ProjectContext,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> AppResult {
    let format = OutputFormat::from_flags(json);
    let input = ctx.input_path(input.as_deref())?;
    let directory = ctx.output_directory(output.as_deref());
    let registry = ctx.config.registry().map_err(CliError::from)?;

    let generate = GenerateStep::new(registry, ctx.config.generator_options())
        .with_access(ctx.config.mapping.access_context());
    let pipeline = GenerationPipeline::new(&OsVfs, generate)
        .rendering(Renderer::from_config(&ctx.config.output));

    info!("Generating from {}", input.display());
    let mut sink = VfsSink::new(&OsVfs, &directory, ctx.config.output.extension.clone());
    let report = pipeline
        .run_into(&input, &mut sink)
        .map_err(CliError::from)?;
    let artifacts = sink
        .written()
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    let result = GenerateOutput::from_report(&report, artifacts);
    match format {
        OutputFormat::Json => write_json(&result).map_err(CliError::from)?,
        OutputFormat::Human => result.print_human(),
    }

    Ok(if result.success { None } else { Some(1) })
}

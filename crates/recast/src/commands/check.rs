//! `recast check`: resolve every declaration and report diagnostics without writing.

use super::ProjectContext;
use crate::error::CliError;
use crate::output::{write_json, GenerateOutput, OutputFormat};
use recast_common::pipeline::{GenerateStep, GenerationPipeline};
use recast_common::vfs::OsVfs;
use starbase::AppResult;
use std::path::PathBuf;

/// Run the check command; exits with 1 when any declaration fails.
pub fn run_check(ctx: &ProjectContext, input: Option<PathBuf>, json: bool) -> AppResult {
    let input = ctx.input_path(input.as_deref())?;
    let registry = ctx.config.registry().map_err(CliError::from)?;

    let generate = GenerateStep::new(registry, ctx.config.generator_options())
        .with_access(ctx.config.mapping.access_context());
    let report = GenerationPipeline::new(&OsVfs, generate)
        .run(&input)
        .map_err(CliError::from)?;

    let result = GenerateOutput::from_report(&report, Vec::new());
    match OutputFormat::from_flags(json) {
        OutputFormat::Json => write_json(&result).map_err(CliError::from)?,
        OutputFormat::Human => result.print_human(),
    }

    Ok(if result.success { None } else { Some(1) })
}

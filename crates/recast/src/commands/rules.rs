//! `recast rules`: list conversion rules in resolution order.

use super::ProjectContext;
use crate::error::CliError;
use crate::output::{print_rules, rule_rows, write_json, OutputFormat};
use starbase::AppResult;

/// Run the rules command
pub fn run_rules(ctx: &ProjectContext, json: bool) -> AppResult {
    let registry = ctx.config.registry().map_err(CliError::from)?;
    let rows = rule_rows(&registry, &ctx.config.generator_options());

    match OutputFormat::from_flags(json) {
        OutputFormat::Json => write_json(&rows).map_err(CliError::from)?,
        OutputFormat::Human => print_rules(&rows),
    }
    Ok(None)
}

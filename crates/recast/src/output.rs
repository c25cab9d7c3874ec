//! Human and JSON output of command results.

use owo_colors::OwoColorize;
use recast_common::pipeline::GenerationReport;
use recast_core::{ConversionRegistry, Diagnostic, DiagnosticKind, GeneratorOptions, Severity};
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flags(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Print a value as pretty JSON on stdout
pub fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticOutput {
    pub function: String,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl DiagnosticOutput {
    fn new(function: &str, diagnostic: &Diagnostic) -> Self {
        DiagnosticOutput {
            function: function.to_string(),
            severity: diagnostic.severity,
            kind: diagnostic.kind,
            message: diagnostic.message.clone(),
        }
    }
}

/// Result of `recast check` and `recast generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOutput {
    pub success: bool,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
    pub diagnostics: Vec<DiagnosticOutput>,
}

impl GenerateOutput {
    pub fn from_report(report: &GenerationReport, artifacts: Vec<String>) -> Self {
        GenerateOutput {
            success: !report.has_failures(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            artifacts,
            diagnostics: report
                .diagnostics()
                .map(|(function, d)| DiagnosticOutput::new(function, d))
                .collect(),
        }
    }

    pub fn print_human(&self) {
        for d in &self.diagnostics {
            let label = match d.severity {
                Severity::Error => "error".red().bold().to_string(),
                Severity::Warning => "warning".yellow().bold().to_string(),
            };
            println!("{}[{}] {}: {}", label, d.kind, d.function.bold(), d.message);
        }
        for artifact in &self.artifacts {
            println!("  {} {}", "wrote".green(), artifact);
        }
        let summary = format!(
            "{} declaration(s) succeeded, {} failed",
            self.succeeded, self.failed
        );
        if self.success {
            println!("{}", summary.green());
        } else {
            println!("{}", summary.red());
        }
    }
}

/// One row of `recast rules`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutput {
    pub id: String,
    pub priority: i32,
    pub enabled: bool,
    pub description: String,
}

/// Rules in resolution order; `enabled` reflects the defaults plus configured rules.
pub fn rule_rows(registry: &ConversionRegistry, options: &GeneratorOptions) -> Vec<RuleOutput> {
    registry
        .rules()
        .map(|rule| RuleOutput {
            id: rule.id.to_string(),
            priority: rule.priority,
            enabled: rule.enabled_by_default || options.enabled_rules.contains(&rule.id),
            description: rule.description.clone(),
        })
        .collect()
}

pub fn print_rules(rows: &[RuleOutput]) {
    let width = rows.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for row in rows {
        let enabled = if row.enabled {
            "on ".green().to_string()
        } else {
            "off".dimmed().to_string()
        };
        println!(
            "{:>10}  {}  {:width$}  {}",
            row.priority,
            enabled,
            row.id,
            row.description,
            width = width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::RuleId;

    #[test]
    fn test_rule_rows_follow_resolution_order() {
        let registry = ConversionRegistry::with_defaults();
        let options = GeneratorOptions::default().with_enabled_rule("string-to-int");
        let rows = rule_rows(&registry, &options);

        assert_eq!(rows[0].id, "same-type");
        assert!(rows.windows(2).all(|w| w[0].priority <= w[1].priority));
        let string_to_int = rows.iter().find(|r| r.id == "string-to-int").unwrap();
        assert!(string_to_int.enabled);
        let string_to_long = rows.iter().find(|r| r.id == "string-to-long").unwrap();
        assert!(!string_to_long.enabled);
        assert!(registry.contains(&RuleId::from("string-to-long")));
    }

    #[test]
    fn test_json_shape() {
        let output = GenerateOutput {
            success: false,
            succeeded: 0,
            failed: 1,
            artifacts: vec![],
            diagnostics: vec![DiagnosticOutput {
                function: "toFinal".into(),
                severity: Severity::Error,
                kind: DiagnosticKind::NullSafetyViolation,
                message: "boom".into(),
            }],
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["diagnostics"][0]["kind"], "null-safety-violation");
        assert_eq!(value["diagnostics"][0]["severity"], "error");
        assert!(value.get("artifacts").is_none());
    }
}

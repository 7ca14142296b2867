//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands talk to the
//! reporting backend through a [`ReportPipeline`] built by [`connect`].

pub mod attach;
pub mod batch;
pub mod comment;
pub mod list;
pub mod status;
pub mod submit;
pub mod update;
pub mod validate;

use std::fmt::Write as _;
use std::sync::Arc;

use adapter_backend::HttpBackend;
use report_core::{ValidationFinding, ValidationResult};
use report_pipeline::ReportPipeline;
use tracing::debug;

use crate::config::ClientConfig;
use crate::Result;

/// Build a pipeline against the configured backend.
///
/// With `load` set the store is filled from `GET /reports` first; every
/// command that addresses a report by id needs that.
pub async fn connect(config: &ClientConfig, actor: &str, load: bool) -> Result<ReportPipeline> {
    let backend = HttpBackend::new(config.backend_config())?;
    let pipeline = ReportPipeline::new(Arc::new(backend), config.pipeline_config(actor));
    if load {
        let count = pipeline.load_reports().await?;
        debug!(count, base_url = %config.base_url, "Report store loaded");
    }
    Ok(pipeline)
}

/// Findings as indented lines, errors first
pub fn render_findings(findings: &[ValidationFinding]) -> String {
    let mut out = String::new();
    let (errors, warnings): (Vec<_>, Vec<_>) = findings.iter().partition(|f| f.is_blocking());
    for finding in errors.into_iter().chain(warnings) {
        let _ = writeln!(out, "    {}", finding);
        if let Some(recommendation) = &finding.recommendation {
            let _ = writeln!(out, "      -> {}", recommendation);
        }
    }
    out
}

/// One validation result as a headline plus findings
pub fn render_validation(report_id: &str, result: &ValidationResult) -> String {
    let verdict = if report_core::is_submittable(result) {
        "passed"
    } else {
        "blocked"
    };
    let mut out = format!(
        "{}: {} ({} error(s), {} warning(s))\n",
        report_id,
        verdict,
        result.errors().count(),
        result.warnings().count()
    );
    out.push_str(&render_findings(&result.findings));
    out
}

//! Submit-batch command implementation
//!
//! Validates the selection concurrently and submits the eligible reports in
//! one batch call.

use report_core::ReportStatus;
use report_pipeline::BatchItemOutcome;
use tracing::info;

use super::render_findings;
use crate::config::ClientConfig;
use crate::{CliError, Result};

/// Run the submit-batch command
///
/// With `all_drafts` every pre-submission report in the store joins the
/// explicit ids.
pub async fn run(
    config: &ClientConfig,
    actor: &str,
    report_ids: &[String],
    all_drafts: bool,
) -> Result<()> {
    let pipeline = super::connect(config, actor, true).await?;

    let mut selection: Vec<String> = report_ids.to_vec();
    if all_drafts {
        selection.extend(
            [ReportStatus::Draft, ReportStatus::PendingApproval]
                .into_iter()
                .flat_map(|status| pipeline.store().by_status(status))
                .map(|report| report.id),
        );
    }
    if selection.is_empty() {
        return Err(CliError::InvalidArgument(
            "no reports selected; pass ids or --all-drafts".to_string(),
        ));
    }

    info!(selected = selection.len(), "Submit selected");
    let outcome = pipeline.submit_batch(selection).await?;

    for (id, item) in &outcome.items {
        match item {
            BatchItemOutcome::ValidationFailed { error } => {
                println!("{}: {}: {}", id, item.label(), error);
            }
            _ => {
                println!("{}: {}", id, item.label());
                print!("{}", render_findings(item.findings()));
            }
        }
    }
    println!("{}", outcome.summary());

    let failed = outcome.len() - outcome.submitted.len();
    if failed > 0 {
        return Err(CliError::Incomplete {
            action: "submitted",
            failed,
            total: outcome.len(),
        });
    }
    Ok(())
}

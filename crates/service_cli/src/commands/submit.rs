//! Submit command implementation
//!
//! Validate, gate and submit a single report.

use report_pipeline::SubmissionOutcome;

use super::{render_findings, render_validation};
use crate::config::ClientConfig;
use crate::{CliError, Result};

/// Run the submit command
pub async fn run(config: &ClientConfig, actor: &str, report_id: &str) -> Result<()> {
    let pipeline = super::connect(config, actor, true).await?;

    let outcome = pipeline.submit_one(report_id).await;
    println!("{}", outcome.summary());
    match &outcome {
        SubmissionOutcome::Blocked { validation, .. } => {
            print!("{}", render_validation(report_id, validation));
        }
        SubmissionOutcome::Rejected { submission, .. } => {
            print!("{}", render_findings(&submission.findings));
        }
        SubmissionOutcome::Submitted { submission, .. } => {
            print!("{}", render_findings(&submission.findings));
        }
        SubmissionOutcome::Failed { .. } => {}
    }

    if outcome.is_submitted() {
        Ok(())
    } else {
        Err(CliError::Incomplete {
            action: "submitted",
            failed: 1,
            total: 1,
        })
    }
}

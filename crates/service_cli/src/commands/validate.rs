//! Validate command implementation
//!
//! Runs backend validation for each id and shows the findings. Nothing is
//! submitted.

use tracing::warn;

use super::render_validation;
use crate::config::ClientConfig;
use crate::{CliError, Result};

/// Run the validate command
pub async fn run(config: &ClientConfig, actor: &str, report_ids: &[String]) -> Result<()> {
    let pipeline = super::connect(config, actor, true).await?;

    let mut failed = 0;
    for id in report_ids {
        match pipeline.validate(id).await {
            Ok(result) => {
                if !report_core::is_submittable(&result) {
                    failed += 1;
                }
                print!("{}", render_validation(id, &result));
            }
            Err(e) => {
                warn!(report_id = %id, error = %e, "Validation call failed");
                println!("{}: validation failed: {}", id, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Incomplete {
            action: "submittable",
            failed,
            total: report_ids.len(),
        });
    }
    Ok(())
}

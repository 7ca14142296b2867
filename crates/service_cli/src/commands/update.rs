//! Update command implementation
//!
//! Replaces the payload and/or reporting period of a report that has not
//! been submitted yet.

use std::path::Path;

use chrono::{DateTime, Utc};
use report_core::{ReportUpdate, ReportingPeriod};

use crate::config::ClientConfig;
use crate::{CliError, Result};

/// Assemble an update from the command-line pieces
pub fn build_update(
    data: Option<serde_json::Value>,
    period_start: Option<DateTime<Utc>>,
    period_end: Option<DateTime<Utc>>,
) -> Result<ReportUpdate> {
    let reporting_period = match (period_start, period_end) {
        (Some(start), Some(end)) if start <= end => Some(ReportingPeriod { start, end }),
        (Some(_), Some(_)) => {
            return Err(CliError::InvalidArgument(
                "period start is after period end".to_string(),
            ))
        }
        (None, None) => None,
        _ => {
            return Err(CliError::InvalidArgument(
                "--period-start and --period-end must be given together".to_string(),
            ))
        }
    };

    let update = ReportUpdate {
        report_data: data,
        reporting_period,
    };
    if update.is_empty() {
        return Err(CliError::InvalidArgument(
            "nothing to update; pass --data-file or a period".to_string(),
        ));
    }
    Ok(update)
}

/// Run the update command
pub async fn run(
    config: &ClientConfig,
    actor: &str,
    report_id: &str,
    data_file: Option<&Path>,
    period_start: Option<DateTime<Utc>>,
    period_end: Option<DateTime<Utc>>,
) -> Result<()> {
    let data = match data_file {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|_| CliError::FileNotFound(path.display().to_string()))?;
            Some(serde_json::from_str(&content)?)
        }
        None => None,
    };
    let update = build_update(data, period_start, period_end)?;

    let pipeline = super::connect(config, actor, true).await?;
    let report = pipeline.update_report(report_id, update).await?;

    println!("{}: updated ({})", report.id, report.status);
    Ok(())
}

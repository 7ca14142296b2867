//! List command implementation

use report_core::{Report, ReportStatus};

use crate::config::ClientConfig;
use crate::Result;

/// One report as a table row
pub fn render_row(report: &Report) -> String {
    let submitted = report
        .submitted_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let reference = report
        .acknowledgment
        .as_ref()
        .map(|ack| ack.reference_id.as_str())
        .unwrap_or("-");
    format!(
        "{:<24} {:<9} {:<17} {:<17} {}",
        report.id,
        report.report_type.code(),
        report.status,
        submitted,
        reference
    )
}

/// Run the list command
pub async fn run(config: &ClientConfig, actor: &str, status: Option<ReportStatus>) -> Result<()> {
    let pipeline = super::connect(config, actor, true).await?;
    let store = pipeline.store();

    let reports = match status {
        Some(status) => store.by_status(status),
        None => store.list(),
    };

    println!(
        "{:<24} {:<9} {:<17} {:<17} {}",
        "ID", "TYPE", "STATUS", "SUBMITTED", "REFERENCE"
    );
    for report in &reports {
        println!("{}", render_row(report));
    }

    let stats = store.statistics();
    println!(
        "{} report(s): {} draft, {} pending approval, {} submitted, {} accepted, {} rejected",
        stats.total,
        stats.draft,
        stats.pending_approval,
        stats.submitted,
        stats.accepted,
        stats.rejected
    );
    Ok(())
}

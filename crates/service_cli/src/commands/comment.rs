//! Comment command implementation

use report_core::NewComment;

use crate::config::ClientConfig;
use crate::Result;

/// Run the comment command
pub async fn run(
    config: &ClientConfig,
    actor: &str,
    report_id: &str,
    text: &str,
    regulatory: bool,
) -> Result<()> {
    let pipeline = super::connect(config, actor, true).await?;

    let comment = if regulatory {
        NewComment::regulatory(text)
    } else {
        NewComment::internal(text)
    }
    .with_author(actor);

    pipeline.add_comment(report_id, comment).await?;

    let count = pipeline
        .store()
        .get(report_id)
        .map(|report| report.comments.len())
        .unwrap_or_default();
    println!("{}: comment added ({} total)", report_id, count);
    Ok(())
}

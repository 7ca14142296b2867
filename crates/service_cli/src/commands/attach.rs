//! Attach command implementation
//!
//! Uploads a local file as supporting evidence for a report.

use std::path::Path;

use adapter_backend::AttachmentUpload;
use tracing::info;

use crate::config::ClientConfig;
use crate::{CliError, Result};

/// Run the attach command
pub async fn run(
    config: &ClientConfig,
    actor: &str,
    report_id: &str,
    file: &Path,
    content_type: Option<&str>,
) -> Result<()> {
    if !file.is_file() {
        return Err(CliError::FileNotFound(file.display().to_string()));
    }
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::InvalidArgument(format!("not a file: {}", file.display())))?;
    let bytes = tokio::fs::read(file).await?;
    info!(report_id, file_name = %file_name, size = bytes.len(), "Uploading attachment");

    let mut upload = AttachmentUpload::new(file_name, bytes);
    if let Some(content_type) = content_type {
        upload = upload.with_content_type(content_type);
    }

    let pipeline = super::connect(config, actor, true).await?;
    let attachment = pipeline.upload_attachment(report_id, upload).await?;

    println!(
        "{}: attached {} as {} ({} bytes)",
        report_id, attachment.file_name, attachment.id, attachment.size
    );
    Ok(())
}

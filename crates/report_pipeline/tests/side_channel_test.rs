//! Side-Channel Tests
//!
//! Comments, attachments, edits, store loading and bridge status.

mod common;

use std::sync::Arc;

use common::{draft, pipeline, Call, StubBackend};
use report_core::{CommentKind, NewComment, ReportStatus, ReportUpdate};
use report_pipeline::prelude::*;

#[tokio::test]
async fn test_comment_refreshes_store_from_backend() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")));
    let pipeline = pipeline(backend.clone()).await;

    pipeline
        .add_comment("r1", NewComment::internal("checked with KYC team").with_author("mlro"))
        .await
        .unwrap();

    let stored = pipeline.store().get("r1").unwrap();
    assert_eq!(stored.comments.len(), 1);
    assert_eq!(stored.comments[0].text, "checked with KYC team");
    assert_eq!(stored.comments[0].kind, CommentKind::Internal);
    assert_eq!(stored.comments[0].author.as_deref(), Some("mlro"));
    assert_eq!(
        backend.calls()[1..],
        [Call::Comment("r1".to_string()), Call::Fetch("r1".to_string())]
    );
}

#[tokio::test]
async fn test_refresh_picks_up_backend_side_status() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")));
    let pipeline = pipeline(backend.clone()).await;
    backend.set_status("r1", ReportStatus::PendingApproval);

    pipeline
        .add_comment("r1", NewComment::regulatory("additional information supplied"))
        .await
        .unwrap();

    assert_eq!(pipeline.store().status("r1"), Some(ReportStatus::PendingApproval));
}

#[tokio::test]
async fn test_comment_allowed_on_rejected_report() {
    let backend = Arc::new(
        StubBackend::new().with_report(draft("r1").with_status(ReportStatus::Rejected)),
    );
    let pipeline = pipeline(backend.clone()).await;

    pipeline
        .add_comment("r1", NewComment::regulatory("resubmission planned"))
        .await
        .unwrap();

    assert_eq!(backend.validate_calls(), 0);
    let stored = pipeline.store().get("r1").unwrap();
    assert_eq!(stored.status, ReportStatus::Rejected);
    assert_eq!(stored.comments[0].kind, CommentKind::Regulatory);
}

#[tokio::test]
async fn test_upload_returns_reference_and_refreshes() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")));
    let pipeline = pipeline(backend.clone()).await;

    let attachment = pipeline
        .upload_attachment(
            "r1",
            AttachmentUpload::new("evidence.pdf", b"%PDF-1.7".to_vec())
                .with_content_type("application/pdf"),
        )
        .await
        .unwrap();

    assert_eq!(attachment.file_name, "evidence.pdf");
    assert_eq!(attachment.size, 8);
    assert_eq!(attachment.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(pipeline.store().get("r1").unwrap().attachments, vec![attachment]);

    let uploads = pipeline
        .audit()
        .events_by_type(AuditEventType::AttachmentUploaded);
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].details["size"], 8);
}

#[tokio::test]
async fn test_failed_refresh_does_not_fail_the_call() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")).fail_fetch("r1"));
    let pipeline = pipeline(backend.clone()).await;

    let result = pipeline
        .add_comment("r1", NewComment::internal("noted"))
        .await;

    assert!(result.is_ok());
    // Cached record is stale but intact.
    assert!(pipeline.store().get("r1").unwrap().comments.is_empty());
    assert!(pipeline.refresh("r1").await.is_err());
}

#[tokio::test]
async fn test_side_channel_rejects_unknown_report() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")));
    let pipeline = pipeline(backend.clone()).await;

    let err = pipeline
        .add_comment("ghost", NewComment::internal("?"))
        .await
        .unwrap_err();
    assert_eq!(err, PipelineError::UnknownReport("ghost".to_string()));

    let err = pipeline
        .upload_attachment("ghost", AttachmentUpload::new("a.txt", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnknownReport(_)));
    assert_eq!(backend.calls(), vec![Call::List]);
}

#[tokio::test]
async fn test_update_draft_replaces_store_record() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")));
    let pipeline = pipeline(backend.clone()).await;

    let update = ReportUpdate {
        report_data: Some(serde_json::json!({"amount": 99000, "currency": "USD"})),
        reporting_period: None,
    };
    let updated = pipeline.update_report("r1", update).await.unwrap();

    assert_eq!(updated.report_data["currency"], "USD");
    assert_eq!(pipeline.store().get("r1").unwrap(), updated);
    assert_eq!(
        pipeline
            .audit()
            .events_by_type(AuditEventType::ReportUpdated)
            .len(),
        1
    );
}

#[tokio::test]
async fn test_update_after_submission_is_refused() {
    let backend = Arc::new(
        StubBackend::new().with_report(draft("r1").with_status(ReportStatus::Submitted)),
    );
    let pipeline = pipeline(backend.clone()).await;

    let update = ReportUpdate {
        report_data: Some(serde_json::json!({"amount": 1})),
        reporting_period: None,
    };
    let err = pipeline.update_report("r1", update).await.unwrap_err();

    assert_eq!(
        err,
        PipelineError::NotEditable {
            report_id: "r1".to_string(),
            status: ReportStatus::Submitted,
        }
    );
    assert!(!backend.calls().contains(&Call::Update("r1".to_string())));
}

#[tokio::test]
async fn test_empty_update_is_refused() {
    let backend = Arc::new(StubBackend::new().with_report(draft("r1")));
    let pipeline = pipeline(backend.clone()).await;

    let err = pipeline
        .update_report("r1", ReportUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::EmptyUpdate("r1".to_string()));
}

#[tokio::test]
async fn test_load_reports_replaces_store() {
    let backend = Arc::new(
        StubBackend::new()
            .with_report(draft("r1"))
            .with_report(draft("r2").with_status(ReportStatus::Accepted)),
    );
    let pipeline = ReportPipeline::new(backend.clone(), PipelineConfig::default());
    pipeline.store().upsert(draft("stale"));

    let count = pipeline.load_reports().await.unwrap();

    assert_eq!(count, 2);
    assert!(!pipeline.store().contains("stale"));
    assert_eq!(pipeline.store().by_status(ReportStatus::Accepted).len(), 1);
}

#[tokio::test]
async fn test_goaml_status() {
    let backend = Arc::new(StubBackend::new());
    let pipeline = ReportPipeline::new(backend, PipelineConfig::default());

    let status = pipeline.goaml_status().await.unwrap();

    assert!(status.connected);
    assert!(status.can_sync());
}

//! reqwest implementation of [`ReportingBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use report_core::{AttachmentRef, NewComment, Report, ReportUpdate, ValidationResult};

use crate::backend::ReportingBackend;
use crate::error::BackendError;
use crate::types::{AttachmentUpload, BatchItemResult, BatchSubmitRequest, GoAmlStatus};

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL, e.g. `https://aml.example.ae/api`
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpBackendConfig {
    /// Config with a 30 second timeout and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the reporting backend.
pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
    api_token: Option<String>,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidRequest(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidRequest(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::transport(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            api_token: config.api_token,
            timeout: config.timeout,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidRequest(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, BackendError> {
        let url = self.url(segments)?;
        debug!(method = %method, url = %url, "Backend request");
        let builder = self.client.request(method, url);
        Ok(match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::transport(err.to_string())
        }
    }

    /// Send a request and fail on non-success statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(path));
        }
        Err(BackendError::Status {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        let response = self.send(builder).await?;
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout)
            } else {
                BackendError::decode(e.to_string())
            }
        })
    }
}

#[async_trait]
impl ReportingBackend for HttpBackend {
    async fn list_reports(&self) -> Result<Vec<Report>, BackendError> {
        self.send_json(self.request(Method::GET, &["reports"])?).await
    }

    async fn fetch_report(&self, report_id: &str) -> Result<Report, BackendError> {
        self.send_json(self.request(Method::GET, &["reports", report_id])?)
            .await
    }

    async fn validate(&self, report_id: &str) -> Result<ValidationResult, BackendError> {
        self.send_json(self.request(Method::POST, &["reports", report_id, "validate"])?)
            .await
    }

    async fn submit(&self, report_id: &str) -> Result<ValidationResult, BackendError> {
        self.send_json(self.request(Method::POST, &["reports", report_id, "submit"])?)
            .await
    }

    async fn batch_submit(&self, report_ids: &[String]) -> Result<Vec<BatchItemResult>, BackendError> {
        let body = BatchSubmitRequest {
            report_ids: report_ids.to_vec(),
        };
        self.send_json(
            self.request(Method::POST, &["reports", "batch-submit"])?
                .json(&body),
        )
        .await
    }

    async fn update_report(
        &self,
        report_id: &str,
        update: &ReportUpdate,
    ) -> Result<Report, BackendError> {
        self.send_json(
            self.request(Method::PATCH, &["reports", report_id])?
                .json(update),
        )
        .await
    }

    async fn upload_attachment(
        &self,
        report_id: &str,
        file: AttachmentUpload,
    ) -> Result<AttachmentRef, BackendError> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;
        }
        let form = Form::new().part("file", part);

        self.send_json(
            self.request(Method::POST, &["reports", report_id, "attachments"])?
                .multipart(form),
        )
        .await
    }

    async fn add_comment(&self, report_id: &str, comment: &NewComment) -> Result<(), BackendError> {
        self.send(
            self.request(Method::POST, &["reports", report_id, "comments"])?
                .json(comment),
        )
        .await?;
        Ok(())
    }

    async fn goaml_status(&self) -> Result<GoAmlStatus, BackendError> {
        self.send_json(self.request(Method::GET, &["goaml", "status"])?)
            .await
    }
}

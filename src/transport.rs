//! HTTP transport for the document QA backend.
//!
//! Two one-shot operations, each a single multipart `POST` against a fixed
//! origin. No retries, no timeouts and no cancellation: a call resolves once,
//! to either a decoded response or a [`TransportError`].

use crate::types::{AskResponse, SelectedFile, UploadResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

pub const UPLOAD_PATH: &str = "/upload";
pub const ASK_PATH: &str = "/ask";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST /upload` with the file under the `file` field.
    async fn upload_document(&self, file: &SelectedFile) -> TransportResult<UploadResponse>;

    /// `POST /ask` with `question` and `doc_id` fields.
    async fn ask_question(&self, question: &str, doc_id: &str) -> TransportResult<AskResponse>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: crate::config::normalize_base_url(&base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> TransportResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "posting multipart form");
        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BACKEND_URL)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn upload_document(&self, file: &SelectedFile) -> TransportResult<UploadResponse> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)?;
        let form = Form::new().part("file", part);
        self.post_form(UPLOAD_PATH, form).await
    }

    async fn ask_question(&self, question: &str, doc_id: &str) -> TransportResult<AskResponse> {
        let form = Form::new()
            .text("question", question.to_string())
            .text("doc_id", doc_id.to_string());
        self.post_form(ASK_PATH, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let transport = HttpTransport::new("http://localhost:8000/");
        assert_eq!(transport.base_url(), "http://localhost:8000");
        assert_eq!(transport.endpoint(UPLOAD_PATH), "http://localhost:8000/upload");
        assert_eq!(transport.endpoint(ASK_PATH), "http://localhost:8000/ask");
    }

    #[test]
    fn test_status_error_message() {
        let err = TransportError::Status {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":"Only PDF files are supported"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"backend error 400 Bad Request: {"error":"Only PDF files are supported"}"#
        );
    }
}

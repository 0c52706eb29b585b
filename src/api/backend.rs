use std::fmt;

use async_trait::async_trait;

use super::types::{ChatTurn, Document, DocumentId};

/// Errors that can occur talking to the document backend.
#[derive(Debug)]
pub enum ApiError {
    /// Client misconfigured (unusable base URL, TLS setup). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned a non-2xx response. `detail` is the backend's own
    /// message when it sent one.
    Api { status: u16, detail: Option<String> },
    /// Response body didn't match the expected shape.
    Parse(String),
    /// Local file could not be read for upload.
    Io(String),
}

impl ApiError {
    /// The backend-provided message, if this error carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, detail } => match detail {
                Some(detail) => write!(f, "API error (HTTP {status}): {detail}"),
                None => write!(f, "API error (HTTP {status})"),
            },
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Io(msg) => write!(f, "file error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// A PDF ready to be posted as the multipart `file` field.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// `POST /documents/upload`
    async fn upload_document(&self, upload: PdfUpload) -> Result<Document, ApiError>;

    /// `GET /documents/?skip=&limit=`. Order is whatever the backend returns.
    async fn list_documents(&self, skip: u32, limit: u32) -> Result<Vec<Document>, ApiError>;

    /// `GET /documents/{id}`
    async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError>;

    /// `POST /documents/{id}/ask`. `history` holds the turns before `question`.
    async fn ask_question(
        &self,
        id: &DocumentId,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String, ApiError>;
}

//! reqwest implementation of [`DocumentBackend`].
//!
//! One shared `reqwest::Client`, a fixed base URL, no retry and no caching.
//! Every call is a single request/response round trip.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::backend::{ApiError, DocumentBackend, PdfUpload};
use super::types::{AskRequest, AskResponse, ChatTurn, Document, DocumentId, ErrorBody};

const PDF_MIME: &str = "application/pdf";

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Build a backend rooted at `base_url` (e.g. `http://localhost:8000/api/v1`).
    /// `timeout` is applied to every request when set.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a response into `T`, mapping non-2xx statuses to `ApiError::Api`
/// with the backend's `detail` string when the body has one.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    debug!("Backend response status: {}", status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Backend error: {} - {}", status, body);
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message());
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn network(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn upload_document(&self, upload: PdfUpload) -> Result<Document, ApiError> {
        info!(
            "Uploading document: filename={}, bytes={}",
            upload.filename,
            upload.bytes.len()
        );

        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(PDF_MIME)
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/documents/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;

        decode(response).await
    }

    async fn list_documents(&self, skip: u32, limit: u32) -> Result<Vec<Document>, ApiError> {
        debug!("Listing documents: skip={}, limit={}", skip, limit);

        let response = self
            .client
            .get(self.url("/documents/"))
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await
            .map_err(network)?;

        // A `null` body is treated as an empty list.
        let docs: Option<Vec<Document>> = decode(response).await?;
        Ok(docs.unwrap_or_default())
    }

    async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError> {
        debug!("Fetching document {}", id);

        let response = self
            .client
            .get(self.url(&format!("/documents/{}", id)))
            .send()
            .await
            .map_err(network)?;

        decode(response).await
    }

    async fn ask_question(
        &self,
        id: &DocumentId,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String, ApiError> {
        info!(
            "Ask request: document={}, history_len={}, question_len={}",
            id,
            history.len(),
            question.len()
        );

        let body = AskRequest {
            question,
            chat_history: history,
        };

        let response = self
            .client
            .post(self.url(&format!("/documents/{}/ask", id)))
            .json(&body)
            .send()
            .await
            .map_err(network)?;

        let answer: AskResponse = decode(response).await?;
        Ok(answer.answer)
    }
}

//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, ChatTurn, Document, DocumentBackend, DocumentId, PdfUpload};
use crate::core::state::{ActiveSession, App, Session};

/// In-memory backend. Answers every question with `answer`, or fails with
/// HTTP 500 when `answer` is `None`. Records what it was asked.
pub struct FakeBackend {
    pub documents: Vec<Document>,
    pub answer: Option<String>,
    pub asked: Mutex<Vec<(DocumentId, String, Vec<ChatTurn>)>>,
    pub uploaded: Mutex<Vec<(String, usize)>>,
}

impl FakeBackend {
    pub fn new(documents: Vec<Document>, answer: Option<&str>) -> Self {
        Self {
            documents,
            answer: answer.map(str::to_string),
            asked: Mutex::new(Vec::new()),
            uploaded: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentBackend for FakeBackend {
    async fn upload_document(&self, upload: PdfUpload) -> Result<Document, ApiError> {
        let mut uploaded = self.uploaded.lock().unwrap();
        uploaded.push((upload.filename.clone(), upload.bytes.len()));
        Ok(Document::new("99", upload.filename))
    }

    async fn list_documents(&self, skip: u32, limit: u32) -> Result<Vec<Document>, ApiError> {
        Ok(self
            .documents
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError> {
        self.documents
            .iter()
            .find(|d| &d.id == id)
            .cloned()
            .ok_or(ApiError::Api {
                status: 404,
                detail: Some("Document not found".to_string()),
            })
    }

    async fn ask_question(
        &self,
        id: &DocumentId,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String, ApiError> {
        self.asked
            .lock()
            .unwrap()
            .push((id.clone(), question.to_string(), history.to_vec()));
        self.answer.clone().ok_or(ApiError::Api {
            status: 500,
            detail: None,
        })
    }
}

/// Creates a test App with no document selected.
pub fn test_app() -> App {
    App::new(10, Duration::from_millis(1500))
}

/// Creates a test App already chatting about one document.
pub fn active_app(id: &str, filename: &str) -> App {
    let mut app = test_app();
    app.session = Session::Active(ActiveSession::new(Document::new(id, filename)));
    app
}

/// Rows of a rendered test buffer as plain strings.
pub fn buffer_lines(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

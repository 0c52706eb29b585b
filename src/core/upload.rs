//! # Upload Dialog
//!
//! State for the "Upload PDF Document" modal and the local checks that run
//! before anything goes over the wire.
//!
//! ```text
//! Idle ──submit──▶ Notice(..)          (empty path / not a PDF, no request)
//!   │
//!   └──submit──▶ Uploading ──ok──▶ Succeeded { filename } ──delay──▶ closed
//!                    │
//!                    └──err──▶ Failed(detail | "Upload failed.")
//! ```

use std::path::{Path, PathBuf};

use crate::api::ApiError;
use crate::core::state::Ticket;

pub const MSG_SELECT_FILE: &str = "Please select a PDF file.";
pub const MSG_INVALID_TYPE: &str = "Invalid file type. Please upload a PDF.";
pub const MSG_UPLOADING: &str = "Uploading...";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed.";

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Idle,
    /// Local validation message. No request was made.
    Notice(String),
    Uploading,
    Succeeded { filename: String },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadDialog {
    pub status: UploadStatus,
    /// Ticket of the request this dialog started, if any. Outcomes of
    /// requests started by an earlier, dismissed dialog never land here.
    pub ticket: Option<Ticket>,
}

impl Default for UploadDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadDialog {
    pub fn new() -> Self {
        Self {
            status: UploadStatus::Idle,
            ticket: None,
        }
    }

    /// Whether the request behind `ticket` was started by this dialog.
    pub fn owns(&self, ticket: Ticket) -> bool {
        self.ticket == Some(ticket)
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.status, UploadStatus::Uploading)
    }

    /// Path editing and submission are only allowed before a request starts
    /// and again after one fails.
    pub fn accepts_input(&self) -> bool {
        !matches!(
            self.status,
            UploadStatus::Uploading | UploadStatus::Succeeded { .. }
        )
    }

    /// Status line shown under the path field, if any.
    pub fn message(&self) -> Option<String> {
        match &self.status {
            UploadStatus::Idle => None,
            UploadStatus::Notice(msg) | UploadStatus::Failed(msg) => Some(msg.clone()),
            UploadStatus::Uploading => Some(MSG_UPLOADING.to_string()),
            UploadStatus::Succeeded { filename } => Some(success_message(filename)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, UploadStatus::Notice(_) | UploadStatus::Failed(_))
    }
}

pub fn success_message(filename: &str) -> String {
    format!("Uploaded \"{}\" successfully!", filename)
}

/// Message for a failed upload: the backend's own detail when it sent one.
pub fn failure_message(err: &ApiError) -> String {
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| MSG_UPLOAD_FAILED.to_string())
}

/// Validate what the user typed into the path field.
///
/// The check mirrors a browser file input: the MIME type comes from the file
/// name, and only `application/pdf` passes. Existence is not checked here;
/// an unreadable file surfaces as an upload failure.
pub fn validate_path(input: &str) -> Result<PathBuf, &'static str> {
    let trimmed = strip_quotes(input.trim());
    if trimmed.is_empty() {
        return Err(MSG_SELECT_FILE);
    }

    let path = PathBuf::from(trimmed);
    if !is_pdf(&path) {
        return Err(MSG_INVALID_TYPE);
    }
    Ok(path)
}

fn is_pdf(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .is_some_and(|mime| mime == mime_guess::mime::APPLICATION_PDF)
}

/// Terminals quote dragged-in paths that contain spaces.
fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

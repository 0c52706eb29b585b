use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque document identifier.
///
/// The backend hands out integer ids, but nothing on this side does arithmetic
/// on them. They are only compared for equality and echoed back in URLs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "RawId", into = "String")]
pub struct DocumentId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for DocumentId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => DocumentId(n.to_string()),
            RawId::Text(s) => DocumentId(s),
        }
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded document as reported by the backend.
///
/// Upload and list responses carry more fields (stored filename, file paths);
/// only the ones the client shows are kept.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub original_filename: String,
    #[serde(default, deserialize_with = "deserialize_upload_date")]
    pub upload_date: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(id: impl Into<String>, original_filename: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(id),
            original_filename: original_filename.into(),
            upload_date: None,
        }
    }
}

/// Accepts RFC 3339 timestamps as well as the naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// form the backend emits (no offset, UTC implied). Anything else becomes `None`.
fn deserialize_upload_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_upload_date(&s)))
}

pub(crate) fn parse_upload_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// One prior turn sent to the backend as conversational context.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /documents/{id}/ask`.
#[derive(Serialize, Debug)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub chat_history: &'a [ChatTurn],
}

#[derive(Deserialize, Debug)]
pub struct AskResponse {
    pub answer: String,
}

/// FastAPI-style error body: `{"detail": "..."}`.
/// Validation errors put a list in `detail`; those are not shown to the user.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        self.detail.as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accepts_integer_id() {
        let doc: Document = serde_json::from_str(
            r#"{"id":7,"original_filename":"report.pdf","stored_filename":"abc_report.pdf","upload_date":"2024-05-01T10:30:00.123456","pdf_file_path":"/x"}"#,
        )
        .unwrap();
        assert_eq!(doc.id, DocumentId::new("7"));
        assert_eq!(doc.original_filename, "report.pdf");
        assert!(doc.upload_date.is_some());
    }

    #[test]
    fn test_document_accepts_string_id_and_missing_date() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"doc-1","original_filename":"a.pdf"}"#).unwrap();
        assert_eq!(doc.id.as_str(), "doc-1");
        assert_eq!(doc.upload_date, None);
    }

    #[test]
    fn test_unparseable_date_is_dropped() {
        let doc: Document = serde_json::from_str(
            r#"{"id":1,"original_filename":"a.pdf","upload_date":"yesterday"}"#,
        )
        .unwrap();
        assert_eq!(doc.upload_date, None);
    }

    #[test]
    fn test_parse_upload_date_rfc3339() {
        let dt = parse_upload_date("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    /// Contract test: the ask body must match the backend's pydantic model.
    #[test]
    fn test_ask_request_serialization() {
        let history = vec![
            ChatTurn {
                role: Role::User,
                content: "hello".to_string(),
            },
            ChatTurn {
                role: Role::Assistant,
                content: "hi there".to_string(),
            },
        ];
        let req = AskRequest {
            question: "What is the summary?",
            chat_history: &history,
        };

        let serialized = serde_json::to_string(&req).unwrap();
        let expected = r#"{"question":"What is the summary?","chat_history":[{"role":"user","content":"hello"},{"role":"assistant","content":"hi there"}]}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Invalid file type. Only PDF files are allowed."}"#)
                .unwrap();
        assert_eq!(
            body.message().as_deref(),
            Some("Invalid file type. Only PDF files are allowed.")
        );
    }

    #[test]
    fn test_error_body_list_detail_has_no_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#)
                .unwrap();
        assert_eq!(body.message(), None);
    }
}

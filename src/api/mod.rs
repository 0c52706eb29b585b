//! # Backend API
//!
//! Typed access to the document question-answering service.
//!
//! - [`backend`]: the `DocumentBackend` trait and `ApiError`
//! - [`http`]: `HttpBackend`, the reqwest implementation
//! - [`types`]: wire types (documents, chat turns, ask request/response)

pub mod backend;
pub mod http;
pub mod types;

pub use backend::{ApiError, DocumentBackend, PdfUpload};
pub use http::HttpBackend;
pub use types::{AskRequest, AskResponse, ChatTurn, Document, DocumentId};

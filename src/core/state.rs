//! # Application State
//!
//! Everything the session container owns, in one struct.
//!
//! ```text
//! App
//! ├── session: Session                 // which document, what was said
//! │   ├── NoDocument
//! │   └── Active(ActiveSession)
//! │       ├── document: Document
//! │       ├── messages: Vec<Message>   // append-only
//! │       └── request: RequestState    // Idle | Pending { ticket }
//! ├── documents: Vec<Document>         // last good list from the backend
//! ├── overlay: Overlay                 // None | Upload(..) | Picker(..)
//! ├── status_message: String           // header status text
//! └── refresh_generation: u64          // bumped on every successful upload
//! ```
//!
//! The request state lives inside `ActiveSession`, so a pending request
//! without a selected document cannot be expressed. State changes only happen
//! through `update(app, action)` in action.rs.

use std::time::Duration;

use crate::api::{ChatTurn, Document};
use crate::api::types::Role;
use crate::core::config::ResolvedConfig;
use crate::core::picker::DocumentPicker;
use crate::core::upload::UploadDialog;

/// Assistant reply shown in place of any failed ask request.
pub const FALLBACK_ANSWER: &str = "Sorry, I encountered an error. Please try again.";

/// Identifies one in-flight backend request so late replies can be matched or dropped.
pub type Ticket = u64;

/// Locally generated message id. Monotonic for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending { ticket: Ticket },
}

/// A conversation about one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub document: Document,
    pub messages: Vec<Message>,
    pub request: RequestState,
}

impl ActiveSession {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            messages: Vec::new(),
            request: RequestState::Idle,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.request, RequestState::Pending { .. })
    }

    /// All turns so far, in the shape the ask endpoint expects.
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(Message::to_turn).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    NoDocument,
    Active(ActiveSession),
}

impl Session {
    pub fn document(&self) -> Option<&Document> {
        match self {
            Session::NoDocument => None,
            Session::Active(active) => Some(&active.document),
        }
    }

    pub fn messages(&self) -> &[Message] {
        match self {
            Session::NoDocument => &[],
            Session::Active(active) => &active.messages,
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            Session::NoDocument => false,
            Session::Active(active) => active.is_pending(),
        }
    }
}

/// Which modal, if any, sits on top of the chat.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    Upload(UploadDialog),
    Picker(DocumentPicker),
}

pub struct App {
    pub session: Session,
    pub documents: Vec<Document>,
    pub overlay: Overlay,
    pub status_message: String,
    /// Page size for `GET /documents/`.
    pub list_limit: u32,
    /// How long the upload modal lingers on its success message.
    pub upload_close_delay: Duration,
    pub refresh_generation: u64,
    pub(crate) next_message_id: u64,
    pub(crate) next_ticket: Ticket,
}

impl App {
    pub fn new(list_limit: u32, upload_close_delay: Duration) -> Self {
        Self {
            session: Session::NoDocument,
            documents: Vec::new(),
            overlay: Overlay::None,
            status_message: String::new(),
            list_limit,
            upload_close_delay,
            refresh_generation: 0,
            next_message_id: 0,
            next_ticket: 0,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.list_limit, config.upload_close_delay)
    }

    /// True when the input bar should accept a submission.
    pub fn can_submit(&self) -> bool {
        matches!(&self.session, Session::Active(active) if !active.is_pending())
    }
}

/// Hand out the next value of a monotonic counter.
pub(crate) fn bump(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

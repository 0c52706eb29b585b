//! # Actions
//!
//! Everything that can happen in docchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::AnswerReceived { ticket, result }`.
//!
//! `update()` applies one action to the `App` and returns the effects the
//! TUI must carry out (requests to spawn, timers to start). No I/O here.
//!
//! ```text
//! App + Action  →  update()  →  App' + Vec<Effect>
//! ```
//!
//! Every request carries a ticket. Replies whose ticket no longer matches
//! the state that asked for them are dropped, so switching documents while a
//! question is in flight can never attach an answer to the wrong chat.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};

use crate::api::types::Role;
use crate::api::{ApiError, ChatTurn, Document, DocumentId};
use crate::core::picker::DocumentPicker;
use crate::core::state::{
    ActiveSession, App, FALLBACK_ANSWER, Message, MessageId, Overlay, RequestState, Session,
    Ticket, bump,
};
use crate::core::upload::{self, UploadDialog, UploadStatus};

#[derive(Debug)]
pub enum Action {
    /// App mounted. Optionally opens a document passed on the command line.
    Started { document: Option<DocumentId> },
    Quit,

    Submit(String),
    AnswerReceived {
        ticket: Ticket,
        result: Result<String, ApiError>,
    },

    DocumentsLoaded {
        target: FetchTarget,
        result: Result<Vec<Document>, ApiError>,
    },
    DocumentResolved(Result<Document, ApiError>),
    SelectDocument(Document),

    OpenUpload,
    CloseUpload,
    /// The path field changed; clears any stale validation message.
    UploadPathEdited,
    UploadRequested(String),
    UploadFinished {
        ticket: Ticket,
        result: Result<Document, ApiError>,
    },
    /// Fired by the timer started after a successful upload.
    UploadAutoClose { ticket: Ticket },

    OpenPicker,
    ClosePicker,
}

/// Who asked for a document list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// The session container's own list (header count, welcome screen).
    Session,
    Picker { ticket: Ticket },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    Ask {
        ticket: Ticket,
        document_id: DocumentId,
        question: String,
        history: Vec<ChatTurn>,
    },
    FetchDocuments(FetchTarget),
    FetchDocument(DocumentId),
    Upload {
        ticket: Ticket,
        path: PathBuf,
    },
    CloseUploadAfter {
        ticket: Ticket,
        delay: Duration,
    },
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Started { document } => {
            let mut effects = vec![Effect::FetchDocuments(FetchTarget::Session)];
            if let Some(id) = document {
                info!("Opening document {} from command line", id);
                effects.push(Effect::FetchDocument(id));
            }
            effects
        }
        Action::Quit => vec![Effect::Quit],

        Action::Submit(text) => submit(app, text),
        Action::AnswerReceived { ticket, result } => {
            answer_received(app, ticket, result);
            vec![]
        }

        Action::DocumentsLoaded { target, result } => {
            documents_loaded(app, target, result);
            vec![]
        }
        Action::DocumentResolved(Ok(document)) => {
            select_document(app, document);
            vec![]
        }
        Action::DocumentResolved(Err(e)) => {
            warn!("Could not open requested document: {}", e);
            app.status_message = format!("Could not open document: {}", e);
            vec![]
        }
        Action::SelectDocument(document) => {
            select_document(app, document);
            vec![]
        }

        Action::OpenUpload => {
            app.overlay = Overlay::Upload(UploadDialog::new());
            vec![]
        }
        Action::CloseUpload => {
            if matches!(app.overlay, Overlay::Upload(_)) {
                app.overlay = Overlay::None;
            }
            vec![]
        }
        Action::UploadPathEdited => {
            if let Overlay::Upload(dialog) = &mut app.overlay
                && matches!(
                    dialog.status,
                    UploadStatus::Notice(_) | UploadStatus::Failed(_)
                )
            {
                dialog.status = UploadStatus::Idle;
            }
            vec![]
        }
        Action::UploadRequested(input) => upload_requested(app, &input),
        Action::UploadFinished { ticket, result } => upload_finished(app, ticket, result),
        Action::UploadAutoClose { ticket } => {
            if let Overlay::Upload(dialog) = &app.overlay
                && dialog.owns(ticket)
                && matches!(dialog.status, UploadStatus::Succeeded { .. })
            {
                app.overlay = Overlay::None;
            }
            vec![]
        }

        Action::OpenPicker => {
            let ticket = bump(&mut app.next_ticket);
            app.overlay = Overlay::Picker(DocumentPicker::new(ticket, app.refresh_generation));
            vec![Effect::FetchDocuments(FetchTarget::Picker { ticket })]
        }
        Action::ClosePicker => {
            if matches!(app.overlay, Overlay::Picker(_)) {
                app.overlay = Overlay::None;
            }
            vec![]
        }
    }
}

fn submit(app: &mut App, text: String) -> Vec<Effect> {
    let question = text.trim();
    if question.is_empty() || !app.can_submit() {
        debug!("Submit ignored (empty input, no document, or request pending)");
        return vec![];
    }

    let id = MessageId(bump(&mut app.next_message_id));
    let ticket = bump(&mut app.next_ticket);

    let Session::Active(active) = &mut app.session else {
        return vec![];
    };

    // History is everything before this question.
    let history = active.history();
    active.messages.push(Message {
        id,
        role: Role::User,
        content: question.to_string(),
    });
    active.request = RequestState::Pending { ticket };

    info!(
        "Question submitted: ticket={}, history_len={}",
        ticket,
        history.len()
    );

    vec![Effect::Ask {
        ticket,
        document_id: active.document.id.clone(),
        question: question.to_string(),
        history,
    }]
}

fn answer_received(app: &mut App, ticket: Ticket, result: Result<String, ApiError>) {
    let Session::Active(active) = &mut app.session else {
        debug!("Dropping answer for ticket {}: no active document", ticket);
        return;
    };
    if active.request != (RequestState::Pending { ticket }) {
        debug!("Dropping stale answer for ticket {}", ticket);
        return;
    }

    let content = match result {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Ask request failed: {}", e);
            FALLBACK_ANSWER.to_string()
        }
    };

    let id = MessageId(bump(&mut app.next_message_id));
    active.messages.push(Message {
        id,
        role: Role::Assistant,
        content,
    });
    active.request = RequestState::Idle;
}

fn documents_loaded(app: &mut App, target: FetchTarget, result: Result<Vec<Document>, ApiError>) {
    match target {
        FetchTarget::Session => match result {
            Ok(docs) => {
                debug!("Document list refreshed: {} documents", docs.len());
                app.documents = docs;
            }
            Err(e) => warn!("Failed to refresh document list: {}", e),
        },
        FetchTarget::Picker { ticket } => {
            if let Err(e) = &result {
                warn!("Document picker fetch failed: {}", e);
            }
            let applied = match &mut app.overlay {
                Overlay::Picker(picker) => picker.apply(ticket, result),
                _ => false,
            };
            if !applied {
                debug!("Dropping stale picker result for ticket {}", ticket);
            }
        }
    }
}

/// Make `document` the active one. Re-selecting the current document keeps
/// its conversation. The picker always closes.
fn select_document(app: &mut App, document: Document) {
    let same = app
        .session
        .document()
        .is_some_and(|current| current.id == document.id);

    if same {
        debug!("Document {} already active", document.id);
    } else {
        info!("Active document: {} ({})", document.id, document.original_filename);
        app.status_message = String::new();
        app.session = Session::Active(ActiveSession::new(document));
    }

    if matches!(app.overlay, Overlay::Picker(_)) {
        app.overlay = Overlay::None;
    }
}

fn upload_requested(app: &mut App, input: &str) -> Vec<Effect> {
    let ticket = bump(&mut app.next_ticket);
    let Overlay::Upload(dialog) = &mut app.overlay else {
        return vec![];
    };
    if !dialog.accepts_input() {
        return vec![];
    }

    match upload::validate_path(input) {
        Ok(path) => {
            info!("Upload started: ticket={}, path={}", ticket, path.display());
            dialog.status = UploadStatus::Uploading;
            dialog.ticket = Some(ticket);
            vec![Effect::Upload { ticket, path }]
        }
        Err(msg) => {
            dialog.status = UploadStatus::Notice(msg.to_string());
            vec![]
        }
    }
}

/// The upload dialog that started request `ticket`, if it is still open.
fn owning_dialog(app: &mut App, ticket: Ticket) -> Option<&mut UploadDialog> {
    match &mut app.overlay {
        Overlay::Upload(dialog) if dialog.owns(ticket) => Some(dialog),
        _ => None,
    }
}

fn upload_finished(
    app: &mut App,
    ticket: Ticket,
    result: Result<Document, ApiError>,
) -> Vec<Effect> {
    let document = match result {
        Ok(document) => document,
        Err(e) => {
            warn!("Upload failed: ticket={}, {}", ticket, e);
            let message = upload::failure_message(&e);
            match owning_dialog(app, ticket) {
                Some(dialog) => dialog.status = UploadStatus::Failed(message),
                None => app.status_message = message,
            }
            return vec![];
        }
    };

    info!(
        "Upload succeeded: ticket={}, id={}, filename={}",
        ticket, document.id, document.original_filename
    );

    let mut effects = vec![Effect::FetchDocuments(FetchTarget::Session)];
    let delay = app.upload_close_delay;
    let filename = document.original_filename.clone();
    match owning_dialog(app, ticket) {
        Some(dialog) => {
            dialog.status = UploadStatus::Succeeded { filename };
            app.status_message = String::new();
            effects.push(Effect::CloseUploadAfter { ticket, delay });
        }
        None => app.status_message = upload::success_message(&filename),
    }

    // A fresh upload always starts a fresh conversation.
    app.session = Session::Active(ActiveSession::new(document));
    app.refresh_generation += 1;

    // An open picker is now showing an outdated list.
    if let Overlay::Picker(picker) = &mut app.overlay
        && picker.generation != app.refresh_generation
    {
        let ticket = bump(&mut app.next_ticket);
        picker.reload(ticket, app.refresh_generation);
        effects.push(Effect::FetchDocuments(FetchTarget::Picker { ticket }));
    }

    effects
}

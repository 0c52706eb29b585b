//! # Document Picker
//!
//! State for the "Select a Document" modal. The picker fetches its own copy
//! of the document list every time it opens, independent of the list the
//! session container keeps for the header and welcome screen.

use crate::api::Document;
use crate::core::state::Ticket;

pub const MSG_LOAD_FAILED: &str = "Failed to load documents.";
pub const MSG_NO_DOCUMENTS: &str = "No documents uploaded yet.";

#[derive(Debug, Clone, PartialEq)]
pub enum PickerStatus {
    Loading,
    Failed(String),
    Loaded(Vec<Document>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPicker {
    /// Ticket of the fetch whose reply this picker is waiting for.
    pub ticket: Ticket,
    /// Refresh generation the current fetch was issued under.
    pub generation: u64,
    pub status: PickerStatus,
}

impl DocumentPicker {
    pub fn new(ticket: Ticket, generation: u64) -> Self {
        Self {
            ticket,
            generation,
            status: PickerStatus::Loading,
        }
    }

    /// Start over with a new fetch.
    pub fn reload(&mut self, ticket: Ticket, generation: u64) {
        self.ticket = ticket;
        self.generation = generation;
        self.status = PickerStatus::Loading;
    }

    pub fn documents(&self) -> &[Document] {
        match &self.status {
            PickerStatus::Loaded(docs) => docs,
            _ => &[],
        }
    }

    /// Apply a fetch result. Returns false (and changes nothing) if the
    /// result belongs to an older fetch.
    pub fn apply<E>(&mut self, ticket: Ticket, result: Result<Vec<Document>, E>) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.status = match result {
            Ok(docs) => PickerStatus::Loaded(docs),
            Err(_) => PickerStatus::Failed(MSG_LOAD_FAILED.to_string()),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_picker_is_loading() {
        let picker = DocumentPicker::new(1, 0);
        assert_eq!(picker.status, PickerStatus::Loading);
        assert!(picker.documents().is_empty());
    }

    #[test]
    fn test_apply_keeps_backend_order() {
        let mut picker = DocumentPicker::new(3, 0);
        let docs = vec![Document::new("9", "z.pdf"), Document::new("1", "a.pdf")];
        assert!(picker.apply::<()>(3, Ok(docs.clone())));
        assert_eq!(picker.documents(), docs.as_slice());
    }

    #[test]
    fn test_apply_failure_sets_message() {
        let mut picker = DocumentPicker::new(3, 0);
        assert!(picker.apply(3, Err("boom")));
        assert_eq!(picker.status, PickerStatus::Failed(MSG_LOAD_FAILED.to_string()));
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut picker = DocumentPicker::new(3, 0);
        picker.reload(4, 1);
        assert!(!picker.apply::<()>(3, Ok(vec![Document::new("1", "a.pdf")])));
        assert_eq!(picker.status, PickerStatus::Loading);
    }
}

//! # TUI Components
//!
//! Every piece of the docchat screen lives here.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they show as struct fields:
//! - `Header`: one-line bar with the active document and shortcuts
//! - `Welcome`: landing copy shown until a document is chosen
//! - `Message`: a single chat bubble
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it each
//! frame. Event handling returns a component-level event that the event
//! loop translates into a `core::Action`.
//! - `InputBar`: question editor, emits `InputEvent`
//! - `MessageList`: scrollable conversation with a height cache
//! - `UploadModal`: PDF path entry, emits `UploadEvent`
//! - `DocumentPickerView`: document list overlay, emits `PickerEvent`
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── widgets.rs          (spinner, avatars, key hints, centering)
//! ├── header.rs
//! ├── welcome.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── input_bar.rs
//! ├── upload_modal.rs
//! └── document_picker.rs
//! ```

pub mod document_picker;
pub mod header;
pub mod input_bar;
pub mod message;
pub mod message_list;
pub mod upload_modal;
pub mod welcome;
pub mod widgets;

pub use document_picker::{DocumentPickerState, DocumentPickerView, PickerEvent};
pub use header::Header;
pub use input_bar::{InputBar, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use upload_modal::{UploadEvent, UploadModal, UploadModalState};
pub use welcome::Welcome;

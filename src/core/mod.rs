//! # Core Application Logic
//!
//! The chat session as data plus a reducer. Nothing in here touches the
//! terminal or the network.
//!
//! ```text
//!   terminal events        backend replies
//!         │                      │
//!         ▼                      ▼
//!   ┌──────────────────────────────────┐
//!   │  update(&mut App, Action)        │
//!   │        → Vec<Effect>             │
//!   └──────────────────────────────────┘
//!         │                      │
//!         ▼                      ▼
//!     redraw (TUI)     spawn request (TUI effect runner)
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, the session/request state machines, messages
//! - [`action`]: `Action`, `Effect`, and `update()`
//! - [`upload`]: upload dialog state and local file validation
//! - [`picker`]: document selector state
//! - [`config`]: config file loading and resolution

pub mod action;
pub mod config;
pub mod picker;
pub mod state;
pub mod upload;

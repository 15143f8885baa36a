//! Settings surface: item list, add/edit form validation, test action,
//! verbosity preference, export and import.
//!
//! Rendering is left to the host (or the CLI in `main.rs`); this module holds
//! the behavior behind each control.

pub mod editor;
pub mod panel;

pub use editor::ItemDraft;
pub use panel::{ItemRow, SettingsListener, SettingsPanel};

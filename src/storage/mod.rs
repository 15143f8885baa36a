//! Storage layer for launcher items and preferences.
//!
//! Items are persisted in a flat, section-oriented text file that is re-read on
//! every query and rewritten on every change.
//!
//! # Modules
//!
//! - `backend`: [`ItemStore`] trait the rest of the crate talks to
//! - `ini`: INI file implementation with reset-on-corruption
//! - `models`: In-memory document model and section names
//! - `search`: Fuzzy name filter for item lists

pub mod backend;
pub mod ini;
pub mod models;
pub mod search;

pub use backend::ItemStore;
pub use ini::IniStore;
pub use models::{ConfigDocument, CONFIG_SECTIONS};
pub use search::filter_items;

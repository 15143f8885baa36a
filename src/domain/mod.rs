//! Domain layer for the instant Access launcher.
//!
//! Core types and rules, independent of the host application, the configuration
//! file format and the operating system's launch APIs.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Item, item kind and verbosity models
//! - [`gesture`]: Gesture normalization, layout variants and shortcut rules
//!
//! # Examples
//!
//! ```
//! use instant_access::domain::{gesture, Item, ItemKind};
//!
//! let item = Item::new("Docs", ItemKind::Folder, "~/Documents")
//!     .with_gesture(gesture::normalize_gesture("D"));
//! assert_eq!(item.primary_gesture(), Some("kb:d"));
//! ```

pub mod error;
pub mod gesture;
pub mod item;

pub use error::{LauncherError, Result, ValidationError};
pub use item::{Item, ItemKind, Verbosity};

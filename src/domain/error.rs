//! Error types for the instant Access launcher.
//!
//! This module defines the centralized error type [`LauncherError`], the editor's
//! [`ValidationError`], and a [`Result`] alias used throughout the crate. All errors
//! are implemented with `thiserror`.
//!
//! None of these errors is fatal to the hosting process: the plugin logs them,
//! shows them to the user once, and abandons the operation that caused them.

use thiserror::Error;

/// The main error type for launcher operations.
///
/// # Examples
///
/// ```
/// use instant_access::domain::LauncherError;
///
/// fn read_store() -> Result<(), LauncherError> {
///     Err(LauncherError::Storage("config file is locked".to_string()))
/// }
/// assert!(read_store().is_err());
/// ```
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Reading or writing the item configuration file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Runtime configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An item edit was rejected by the editor rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The imported file could not be parsed; the live configuration is untouched.
    #[error("Could not import settings: {0}")]
    Import(String),

    /// Copying the configuration file to the export destination failed.
    #[error("Could not export settings: {0}")]
    Export(String),

    /// The launch worker pool is gone or refused the job.
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Reasons the item editor refuses to commit an edit.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name, path or shortcut was left empty.
    #[error("All fields are required.")]
    MissingField,

    /// The shortcut is escape or one of the instant mode toggle gestures.
    #[error("This shortcut is reserved for instant Access.")]
    ReservedGesture,

    /// The host's gesture grammar does not accept the shortcut.
    #[error("Invalid shortcut key.")]
    InvalidGesture,

    /// The name would be read back as a comment, a section header or a
    /// different key.
    #[error("Names cannot start with #, ; or [ and cannot contain =.")]
    InvalidName,

    /// A field holds a line break, which would split its entry in two.
    #[error("Fields cannot contain line breaks.")]
    LineBreak,

    /// Another item already uses this name.
    #[error("This name already exists.")]
    DuplicateName,

    /// Another item is already bound to this shortcut.
    #[error("This shortcut is already assigned.")]
    GestureTaken,
}

/// A specialized `Result` type for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;

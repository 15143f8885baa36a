//! Item store abstraction.
//!
//! The [`ItemStore`] trait is the only way the controller and the settings
//! surface touch persisted items. Each method maps to one use case; there is no
//! caching contract, so implementations may (and the INI store does) re-read the
//! backing file on every call.

use crate::domain::error::Result;
use crate::domain::{Item, Verbosity};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Persistent mapping from item name to item definition.
///
/// # Implementations
///
/// - [`IniStore`](crate::storage::IniStore): section-oriented text file (default)
///
/// # Examples
///
/// ```no_run
/// use instant_access::domain::{Item, ItemKind};
/// use instant_access::storage::{IniStore, ItemStore};
///
/// let store = IniStore::new("/tmp/instantAccess/config.ini")?;
/// store.add_item(&Item::new("Docs", ItemKind::Folder, "~/Documents").with_gesture("kb:d"))?;
/// assert_eq!(store.list_items()?.len(), 1);
/// # Ok::<(), instant_access::LauncherError>(())
/// ```
pub trait ItemStore: Send + Sync {
    /// All items, grouped by kind in section order, file order within a kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or reset.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Names of every item across all kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or reset.
    fn all_names(&self) -> Result<BTreeSet<String>>;

    /// Lower-cased gesture to item name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or reset.
    fn gesture_to_name_map(&self) -> Result<HashMap<String, String>>;

    /// Writes an item, replacing any gesture and argument entries previously
    /// stored under its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten.
    fn add_item(&self, item: &Item) -> Result<()>;

    /// Replaces the item stored as `old_name` with `item`, which may have a new
    /// name and kind. Gestures and arguments of both names are dropped before
    /// the new ones are written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten.
    fn update_item(&self, old_name: &str, item: &Item) -> Result<()>;

    /// Removes the item with its gestures and arguments. Unknown names are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten.
    fn delete_item(&self, name: &str) -> Result<()>;

    /// Stored verbosity, [`Verbosity::Beginner`] when missing or invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or reset.
    fn verbosity(&self) -> Result<Verbosity>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten.
    fn set_verbosity(&self, verbosity: Verbosity) -> Result<()>;

    /// Location of the backing file.
    fn config_path(&self) -> &Path;

    /// Copies the backing file byte for byte to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Export`](crate::LauncherError::Export) on I/O failure.
    fn export_to(&self, destination: &Path) -> Result<()>;

    /// Replaces the backing file with `source` after parsing it. Missing sections
    /// are added rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Import`](crate::LauncherError::Import) if `source`
    /// cannot be read or parsed; the current file is left untouched.
    fn import_from(&self, source: &Path) -> Result<()>;
}

//! Settings panel logic: the item list, its buttons and the preference choice.
//!
//! Every successful change is reported to a [`SettingsListener`] so the running
//! controller can rebind gestures or adopt a new verbosity immediately.

use super::editor::ItemDraft;
use crate::domain::gesture::{format_for_display, GestureRules};
use crate::domain::{Item, LauncherError, Result, Verbosity};
use crate::storage::ItemStore;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Receives change notifications from the settings panel.
pub trait SettingsListener {
    /// Items were added, edited, deleted or imported.
    fn config_changed(&mut self);

    fn verbosity_changed(&mut self, verbosity: Verbosity);

    /// The test button was pressed on `item`.
    fn run_item(&mut self, item: Item);
}

/// One row of the item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub name: String,
    pub kind: String,
    /// Comma-separated shortcuts without the `kb:` prefix.
    pub shortcut: String,
    pub path: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        let shortcut = item
            .gestures
            .iter()
            .map(|gesture| format_for_display(gesture))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            name: item.name.clone(),
            kind: item.kind.label().to_string(),
            shortcut,
            path: item.path.clone(),
        }
    }
}

/// Settings panel bound to a store and a listener for the panel's lifetime.
pub struct SettingsPanel<'a> {
    store: Arc<dyn ItemStore>,
    rules: GestureRules,
    listener: &'a mut dyn SettingsListener,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(store: Arc<dyn ItemStore>, rules: GestureRules, listener: &'a mut dyn SettingsListener) -> Self {
        Self { store, rules, listener }
    }

    #[must_use]
    pub const fn rules(&self) -> &GestureRules {
        &self.rules
    }

    /// List rows in file order.
    ///
    /// # Errors
    ///
    /// Store read failures.
    pub fn rows(&self) -> Result<Vec<ItemRow>> {
        Ok(self.store.list_items()?.iter().map(ItemRow::from).collect())
    }

    /// The stored item called `name`.
    ///
    /// # Errors
    ///
    /// Store read failures.
    pub fn find(&self, name: &str) -> Result<Option<Item>> {
        Ok(self.store.list_items()?.into_iter().find(|item| item.name == name))
    }

    /// Validates and stores a new item.
    ///
    /// # Errors
    ///
    /// The first validation failure, or a store failure.
    pub fn add(&mut self, draft: &ItemDraft) -> Result<Item> {
        let item = draft.validate(None, self.store.as_ref(), &self.rules)?;
        self.store.add_item(&item)?;
        tracing::info!(item = %item.name, kind = %item.kind, "item added");
        self.listener.config_changed();
        Ok(item)
    }

    /// Validates and stores an edit of the item called `old_name`.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Storage`] if no item has that name, the first
    /// validation failure, or a store failure.
    pub fn edit(&mut self, old_name: &str, draft: &ItemDraft) -> Result<Item> {
        if self.find(old_name)?.is_none() {
            return Err(LauncherError::Storage(format!("no item named {old_name:?}")));
        }
        let item = draft.validate(Some(old_name), self.store.as_ref(), &self.rules)?;
        self.store.update_item(old_name, &item)?;
        tracing::info!(old_name, item = %item.name, "item updated");
        self.listener.config_changed();
        Ok(item)
    }

    /// Removes the item called `name` with its shortcut and arguments.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.store.delete_item(name)?;
        tracing::info!(item = name, "item deleted");
        self.listener.config_changed();
        Ok(())
    }

    /// Runs the item called `name` without touching instant mode. Returns
    /// `false` when there is no such item.
    ///
    /// # Errors
    ///
    /// Store read failures.
    pub fn test(&mut self, name: &str) -> Result<bool> {
        let Some(item) = self.find(name)? else {
            return Ok(false);
        };
        self.listener.run_item(item);
        Ok(true)
    }

    /// # Errors
    ///
    /// Store failures.
    pub fn verbosity(&self) -> Result<Verbosity> {
        self.store.verbosity()
    }

    /// Saves the verbosity choice.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) -> Result<()> {
        self.store.set_verbosity(verbosity)?;
        self.listener.verbosity_changed(verbosity);
        Ok(())
    }

    /// Copies the item file to `destination`.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Export`]; the live file is untouched.
    pub fn export(&self, destination: &Path) -> Result<()> {
        self.store.export_to(destination)?;
        tracing::info!(destination = %destination.display(), "settings exported");
        Ok(())
    }

    /// Replaces the item file with `source`, then reports both the item and
    /// verbosity changes.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Import`]; the live file is untouched.
    pub fn import(&mut self, source: &Path) -> Result<()> {
        self.store.import_from(source)?;
        let verbosity = self.store.verbosity()?;
        tracing::info!(source = %source.display(), %verbosity, "settings imported");
        self.listener.config_changed();
        self.listener.verbosity_changed(verbosity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gesture::{is_valid_gesture, DEFAULT_TOGGLE_GESTURE};
    use crate::domain::ItemKind;
    use crate::storage::IniStore;

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
    }

    impl SettingsListener for Log {
        fn config_changed(&mut self) {
            self.events.push("config".into());
        }

        fn verbosity_changed(&mut self, verbosity: Verbosity) {
            self.events.push(format!("verbosity {verbosity}"));
        }

        fn run_item(&mut self, item: Item) {
            self.events.push(format!("run {}", item.name));
        }
    }

    fn parts() -> (tempfile::TempDir, Arc<dyn ItemStore>, GestureRules) {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ItemStore> = Arc::new(IniStore::new(dir.path().join("config.ini")).unwrap());
        let rules = GestureRules::new(&[DEFAULT_TOGGLE_GESTURE], is_valid_gesture);
        (dir, store, rules)
    }

    #[test]
    fn add_edit_delete_notify_and_update_rows() {
        let (_dir, store, rules) = parts();
        let mut log = Log::default();
        let mut panel = SettingsPanel::new(store, rules, &mut log);

        panel
            .add(&ItemDraft::new("Docs", ItemKind::Folder, "~/Documents", "kb:d"))
            .unwrap();
        assert_eq!(
            panel.rows().unwrap(),
            vec![ItemRow {
                name: "Docs".into(),
                kind: "Folder".into(),
                shortcut: "d".into(),
                path: "~/Documents".into(),
            }]
        );

        panel
            .edit("Docs", &ItemDraft::new("Documents", ItemKind::Folder, "~/Documents", "kb:control+d"))
            .unwrap();
        assert_eq!(panel.rows().unwrap()[0].shortcut, "control+d");

        assert!(panel.test("Documents").unwrap());
        assert!(!panel.test("Docs").unwrap());

        panel.delete("Documents").unwrap();
        assert!(panel.rows().unwrap().is_empty());

        assert_eq!(log.events, vec!["config", "config", "run Documents", "config"]);
    }

    #[test]
    fn rejected_edit_does_not_notify() {
        let (_dir, store, rules) = parts();
        let mut log = Log::default();
        let mut panel = SettingsPanel::new(store, rules, &mut log);

        let err = panel
            .add(&ItemDraft::new("Docs", ItemKind::Folder, "~/Documents", "kb:escape"))
            .unwrap_err();
        assert_eq!(err.to_string(), "This shortcut is reserved for instant Access.");
        assert!(matches!(
            panel.edit("Missing", &ItemDraft::new("X", ItemKind::File, "/x", "kb:x")),
            Err(LauncherError::Storage(_))
        ));
        assert!(log.events.is_empty());
    }

    #[test]
    fn import_reports_config_and_verbosity() {
        let (dir, store, rules) = parts();
        let source = dir.path().join("incoming.ini");
        std::fs::write(&source, "[Settings]\nverbosity = advanced\n[Websites]\nMail = mail.example.com\n").unwrap();
        let mut log = Log::default();
        let mut panel = SettingsPanel::new(store, rules, &mut log);

        panel.import(&source).unwrap();

        assert_eq!(panel.verbosity().unwrap(), Verbosity::Advanced);
        assert_eq!(panel.rows().unwrap()[0].name, "Mail");
        assert_eq!(log.events, vec!["config", "verbosity advanced"]);
    }

    #[test]
    fn set_verbosity_persists_and_notifies() {
        let (_dir, store, rules) = parts();
        let mut log = Log::default();
        let mut panel = SettingsPanel::new(store, rules, &mut log);

        panel.set_verbosity(Verbosity::Advanced).unwrap();

        assert_eq!(panel.verbosity().unwrap(), Verbosity::Advanced);
        assert_eq!(log.events, vec!["verbosity advanced"]);
    }
}

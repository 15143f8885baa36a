//! INI file storage backend.
//!
//! Items live in one section-oriented text file per user profile (see
//! [`models`](crate::storage::models) for the layout). The file is the only
//! state: every query re-reads it and every mutation rewrites it whole.
//!
//! # Corruption policy
//!
//! A file that cannot be read or parsed is replaced with an empty document that
//! has every section, and the empty document is written back to disk. Items in
//! the broken file are lost. This keeps the launcher usable after a bad hand
//! edit without ever surfacing a parse error to the host.

use crate::domain::error::{LauncherError, Result};
use crate::domain::{Item, ItemKind, Verbosity};
use crate::storage::backend::ItemStore;
use crate::storage::models::{
    ConfigDocument, ARGUMENTS_SECTION, GESTURES_SECTION, SETTINGS_SECTION, VERBOSITY_KEY,
};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// INI file item store.
///
/// Holds nothing but the file path, so it is cheap to share between the
/// controller and the settings surface.
#[derive(Debug, Clone)]
pub struct IniStore {
    file_path: PathBuf,
}

impl IniStore {
    /// Opens the store, creating the file (and its directory) with every section
    /// when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the initial file cannot be created.
    pub fn new(file_path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            file_path: file_path.into(),
        };
        tracing::debug!(path = ?store.file_path, "initializing INI item store");
        store.ensure_file()?;
        Ok(store)
    }

    fn ensure_file(&self) -> Result<()> {
        if self.file_path.exists() {
            return Ok(());
        }
        tracing::debug!("creating empty configuration file");
        self.save_document(&ConfigDocument::empty())
    }

    /// Reads and parses the file.
    ///
    /// Missing sections are added in memory only. An unreadable or unparsable
    /// file is reset on disk to an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error only if the reset document cannot be written.
    pub fn load_document(&self) -> Result<ConfigDocument> {
        self.ensure_file()?;

        let parsed = std::fs::read_to_string(&self.file_path)
            .map_err(|e| e.to_string())
            .and_then(|contents| ConfigDocument::parse(&contents));

        let mut doc = match parsed {
            Ok(doc) => doc,
            Err(reason) => {
                tracing::warn!(
                    path = ?self.file_path,
                    reason = %reason,
                    "configuration file unreadable, resetting to empty"
                );
                let doc = ConfigDocument::empty();
                self.save_document(&doc)?;
                doc
            }
        };
        doc.ensure_sections();
        Ok(doc)
    }

    /// Writes the document via a temporary file and rename, so a crash never
    /// leaves a half-written file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, temporary file or rename fails.
    fn save_document(&self, doc: &ConfigDocument) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.file_path.with_extension("ini.tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing configuration to temporary file");
        std::fs::write(&tmp_path, doc.render())?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "configuration saved");
        Ok(())
    }

    /// Writes the type, argument and gesture entries of `item`. Callers remove
    /// stale entries first.
    fn write_item(doc: &mut ConfigDocument, item: &Item) {
        doc.set(item.kind.section(), &item.name, &item.path);

        let arguments = item.arguments.trim();
        if item.kind.takes_arguments() && !arguments.is_empty() {
            doc.set(ARGUMENTS_SECTION, &item.name, arguments);
        }

        for gesture in &item.gestures {
            let gesture = gesture.trim();
            if !gesture.is_empty() {
                doc.set(GESTURES_SECTION, gesture, &item.name);
            }
        }
    }
}

impl ItemStore for IniStore {
    fn list_items(&self) -> Result<Vec<Item>> {
        let _span = tracing::debug_span!("ini_list_items").entered();
        let doc = self.load_document()?;

        let mut gestures: HashMap<&str, Vec<String>> = HashMap::new();
        for (gesture, name) in doc.entries(GESTURES_SECTION) {
            gestures.entry(name.as_str()).or_default().push(gesture.clone());
        }

        let items: Vec<Item> = ItemKind::ALL
            .into_iter()
            .flat_map(|kind| {
                doc.entries(kind.section()).iter().map(move |(name, path)| (kind, name, path))
            })
            .map(|(kind, name, path)| Item {
                name: name.clone(),
                kind,
                path: path.clone(),
                arguments: doc.get(ARGUMENTS_SECTION, name).unwrap_or_default().to_string(),
                gestures: gestures.get(name.as_str()).cloned().unwrap_or_default(),
            })
            .collect();

        tracing::debug!(count = items.len(), "items listed");
        Ok(items)
    }

    fn all_names(&self) -> Result<BTreeSet<String>> {
        let doc = self.load_document()?;
        Ok(ItemKind::ALL
            .into_iter()
            .flat_map(|kind| doc.entries(kind.section()).iter().map(|(name, _)| name.clone()))
            .collect())
    }

    fn gesture_to_name_map(&self) -> Result<HashMap<String, String>> {
        let doc = self.load_document()?;
        Ok(doc
            .entries(GESTURES_SECTION)
            .iter()
            .map(|(gesture, name)| (gesture.to_lowercase(), name.clone()))
            .collect())
    }

    fn add_item(&self, item: &Item) -> Result<()> {
        let _span = tracing::debug_span!("ini_add_item",
            name = %item.name,
            kind = %item.kind
        )
        .entered();

        let mut doc = self.load_document()?;
        doc.remove_by_value(GESTURES_SECTION, &item.name);
        doc.remove(ARGUMENTS_SECTION, &item.name);
        Self::write_item(&mut doc, item);
        self.save_document(&doc)?;

        tracing::debug!("item added");
        Ok(())
    }

    fn update_item(&self, old_name: &str, item: &Item) -> Result<()> {
        let _span = tracing::debug_span!("ini_update_item",
            old_name = %old_name,
            name = %item.name,
            kind = %item.kind
        )
        .entered();

        let mut doc = self.load_document()?;
        for kind in ItemKind::ALL {
            doc.remove(kind.section(), old_name);
        }
        for name in [old_name, item.name.as_str()] {
            doc.remove(ARGUMENTS_SECTION, name);
            doc.remove_by_value(GESTURES_SECTION, name);
        }
        Self::write_item(&mut doc, item);
        self.save_document(&doc)?;

        tracing::debug!("item updated");
        Ok(())
    }

    fn delete_item(&self, name: &str) -> Result<()> {
        let _span = tracing::debug_span!("ini_delete_item", name = %name).entered();

        let mut doc = self.load_document()?;
        let mut found = false;
        for kind in ItemKind::ALL {
            found |= doc.remove(kind.section(), name);
        }
        doc.remove(ARGUMENTS_SECTION, name);
        doc.remove_by_value(GESTURES_SECTION, name);
        self.save_document(&doc)?;

        tracing::debug!(found, "item deleted");
        Ok(())
    }

    fn verbosity(&self) -> Result<Verbosity> {
        let doc = self.load_document()?;
        Ok(doc
            .get(SETTINGS_SECTION, VERBOSITY_KEY)
            .map(Verbosity::parse_lenient)
            .unwrap_or_default())
    }

    fn set_verbosity(&self, verbosity: Verbosity) -> Result<()> {
        let mut doc = self.load_document()?;
        doc.set(SETTINGS_SECTION, VERBOSITY_KEY, verbosity.as_str());
        self.save_document(&doc)?;
        tracing::debug!(verbosity = %verbosity, "verbosity saved");
        Ok(())
    }

    fn config_path(&self) -> &Path {
        &self.file_path
    }

    fn export_to(&self, destination: &Path) -> Result<()> {
        let _span = tracing::debug_span!("ini_export", destination = ?destination).entered();

        self.ensure_file()
            .and_then(|()| std::fs::copy(&self.file_path, destination).map_err(LauncherError::from))
            .map_err(|e| {
                tracing::warn!(error = %e, "export failed");
                LauncherError::Export(e.to_string())
            })?;

        tracing::debug!("configuration exported");
        Ok(())
    }

    fn import_from(&self, source: &Path) -> Result<()> {
        let _span = tracing::debug_span!("ini_import", source = ?source).entered();

        let contents = std::fs::read_to_string(source).map_err(|e| {
            tracing::warn!(error = %e, "import source unreadable");
            LauncherError::Import(e.to_string())
        })?;
        let mut doc = ConfigDocument::parse(&contents).map_err(|reason| {
            tracing::warn!(reason = %reason, "import source rejected");
            LauncherError::Import(reason)
        })?;

        if doc.ensure_sections() {
            tracing::debug!("added missing sections to imported configuration");
        }
        self.save_document(&doc)?;

        tracing::debug!("configuration imported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::CONFIG_SECTIONS;

    fn store() -> (tempfile::TempDir, IniStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = IniStore::new(dir.path().join("instantAccess").join("config.ini")).unwrap();
        (dir, store)
    }

    #[test]
    fn new_creates_file_with_all_sections() {
        let (_dir, store) = store();
        let contents = std::fs::read_to_string(store.config_path()).unwrap();
        for section in CONFIG_SECTIONS {
            assert!(contents.contains(&format!("[{section}]")), "{section}");
        }
    }

    #[test]
    fn add_replaces_previous_gesture_and_arguments() {
        let (_dir, store) = store();
        let first = Item::new("Editor", ItemKind::Program, "/usr/bin/gedit")
            .with_arguments("--new-window")
            .with_gesture("kb:e");
        store.add_item(&first).unwrap();

        let second = Item::new("Editor", ItemKind::Program, "/usr/bin/gedit").with_gesture("kb:g");
        store.add_item(&second).unwrap();

        let items = store.list_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].gestures, vec!["kb:g"]);
        assert_eq!(items[0].arguments, "");
        assert!(!store.gesture_to_name_map().unwrap().contains_key("kb:e"));
    }

    #[test]
    fn update_moves_item_between_kinds_and_drops_arguments() {
        let (_dir, store) = store();
        store
            .add_item(
                &Item::new("Tool", ItemKind::Program, "/opt/tool")
                    .with_arguments("-v")
                    .with_gesture("kb:t"),
            )
            .unwrap();

        store
            .update_item("Tool", &Item::new("Tools", ItemKind::Folder, "/opt").with_gesture("kb:o"))
            .unwrap();

        let items = store.list_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tools");
        assert_eq!(items[0].kind, ItemKind::Folder);
        assert_eq!(items[0].arguments, "");
        assert_eq!(items[0].gestures, vec!["kb:o"]);

        let doc = store.load_document().unwrap();
        assert!(doc.entries(ARGUMENTS_SECTION).is_empty());
        assert_eq!(doc.entries(GESTURES_SECTION).len(), 1);
    }

    #[test]
    fn delete_removes_every_trace() {
        let (_dir, store) = store();
        store
            .add_item(
                &Item::new("Tool", ItemKind::Program, "/opt/tool")
                    .with_arguments("-v")
                    .with_gesture("kb:t"),
            )
            .unwrap();
        store.delete_item("Tool").unwrap();

        let doc = store.load_document().unwrap();
        assert!(doc.entries("Programs").is_empty());
        assert!(doc.entries(ARGUMENTS_SECTION).is_empty());
        assert!(doc.entries(GESTURES_SECTION).is_empty());
        store.delete_item("Tool").unwrap();
    }

    #[test]
    fn verbosity_defaults_and_persists() {
        let (_dir, store) = store();
        assert_eq!(store.verbosity().unwrap(), Verbosity::Beginner);
        store.set_verbosity(Verbosity::Advanced).unwrap();
        assert_eq!(store.verbosity().unwrap(), Verbosity::Advanced);

        let mut doc = store.load_document().unwrap();
        doc.set(SETTINGS_SECTION, VERBOSITY_KEY, "loud");
        store.save_document(&doc).unwrap();
        assert_eq!(store.verbosity().unwrap(), Verbosity::Beginner);
    }

    #[test]
    fn corrupt_file_is_reset_on_disk() {
        let (_dir, store) = store();
        store
            .add_item(&Item::new("Docs", ItemKind::Folder, "~/Documents").with_gesture("kb:d"))
            .unwrap();
        std::fs::write(store.config_path(), "[Folders\nDocs=~/Documents").unwrap();

        assert!(store.list_items().unwrap().is_empty());
        let doc = store.load_document().unwrap();
        assert_eq!(doc, ConfigDocument::empty());

        let on_disk = ConfigDocument::parse(&std::fs::read_to_string(store.config_path()).unwrap());
        assert!(on_disk.is_ok());
    }

    #[test]
    fn export_copies_bytes_and_import_rejects_garbage() {
        let (dir, store) = store();
        store
            .add_item(&Item::new("News", ItemKind::Website, "news.example.org").with_gesture("kb:n"))
            .unwrap();

        let exported = dir.path().join("backup.ini");
        store.export_to(&exported).unwrap();
        assert_eq!(
            std::fs::read(&exported).unwrap(),
            std::fs::read(store.config_path()).unwrap()
        );

        let garbage = dir.path().join("garbage.ini");
        std::fs::write(&garbage, "not an ini file").unwrap();
        let before = std::fs::read(store.config_path()).unwrap();
        assert!(matches!(store.import_from(&garbage), Err(LauncherError::Import(_))));
        assert_eq!(std::fs::read(store.config_path()).unwrap(), before);

        let missing = dir.path().join("missing.ini");
        assert!(matches!(store.import_from(&missing), Err(LauncherError::Import(_))));
    }

    #[test]
    fn imported_default_section_survives_the_next_read() {
        let (dir, store) = store();
        let source = dir.path().join("with-default.ini");
        std::fs::write(
            &source,
            "[default]\nx=1\n[Websites]\nMail=mail.example.com\n[Gestures]\nkb:m=Mail\n",
        )
        .unwrap();

        store.import_from(&source).unwrap();

        let items = store.list_items().unwrap();
        assert_eq!(items, vec![Item::new("Mail", ItemKind::Website, "mail.example.com").with_gesture("kb:m")]);
        assert!(store.load_document().unwrap().has_section("default"));
    }

    #[test]
    fn mixed_items_round_trip_in_any_insertion_order() {
        let items = vec![
            Item::new("News", ItemKind::Website, "news.example.org").with_gesture("kb:n"),
            Item::new("Editor", ItemKind::Program, "/usr/bin/gedit")
                .with_gesture("kb:control+e")
                .with_arguments("--new-window notes.txt"),
            Item::new("Shell", ItemKind::Program, "/bin/sh").with_gesture("kb:s"),
            Item::new("Docs", ItemKind::Folder, "~/Documents").with_gesture("kb:d"),
            Item::new("Todo", ItemKind::File, "~/todo.txt").with_gesture("kb:alt+;"),
        ];
        let key = |item: &Item| {
            (
                item.name.clone(),
                item.kind,
                item.path.clone(),
                item.arguments.clone(),
                item.primary_gesture().map(str::to_string),
            )
        };
        let mut expected: Vec<_> = items.iter().map(key).collect();
        expected.sort();

        for order in [vec![0, 1, 2, 3, 4], vec![4, 3, 2, 1, 0], vec![2, 0, 4, 1, 3]] {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.ini");
            let store = IniStore::new(&path).unwrap();
            for index in order {
                store.add_item(&items[index]).unwrap();
            }

            let reopened = IniStore::new(&path).unwrap();
            let mut actual: Vec<_> = reopened.list_items().unwrap().iter().map(key).collect();
            actual.sort();
            assert_eq!(actual, expected);
        }
    }
}

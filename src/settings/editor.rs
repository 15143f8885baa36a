//! Add/edit item form state and its validation.

use crate::domain::gesture::{format_for_display, GestureRules, KeyChord};
use crate::domain::{Item, ItemKind, Result, ValidationError};
use crate::storage::ItemStore;

/// Values typed into the item form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub kind: Option<ItemKind>,
    pub path: String,
    /// Normalized gesture, set by [`capture`](Self::capture) or typed directly.
    pub gesture: String,
    /// Only kept for programs.
    pub arguments: String,
}

impl ItemDraft {
    #[must_use]
    pub fn new(name: &str, kind: ItemKind, path: &str, gesture: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind),
            path: path.to_string(),
            gesture: gesture.to_string(),
            arguments: String::new(),
        }
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: &str) -> Self {
        self.arguments = arguments.to_string();
        self
    }

    /// Form prefilled from a stored item. Only the first gesture is editable.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            kind: Some(item.kind),
            path: item.path.clone(),
            gesture: item.primary_gesture().unwrap_or_default().to_string(),
            arguments: item.arguments.clone(),
        }
    }

    /// Shortcut label shown next to the capture button.
    #[must_use]
    pub fn shortcut_label(&self) -> String {
        format_for_display(&self.gesture)
    }

    /// Takes a captured key press as the shortcut.
    ///
    /// A chord with no recognizable key leaves the draft unchanged and is not an
    /// error, matching a capture dialog that just keeps waiting.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ReservedGesture`] or [`ValidationError::InvalidGesture`];
    /// the draft keeps its previous shortcut.
    pub fn capture(&mut self, chord: &KeyChord, rules: &GestureRules) -> std::result::Result<(), ValidationError> {
        let Some(name) = chord.gesture_name() else {
            return Ok(());
        };
        self.gesture = rules.check_shortcut(&name)?;
        Ok(())
    }

    /// Checks the draft against the store and returns the item to write.
    ///
    /// `existing` names the item being edited, which may keep its own name and
    /// shortcut. Checks run in order: required fields, reserved shortcut,
    /// shortcut grammar, fields the file can hold, duplicate name, taken
    /// shortcut.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Validation`](crate::domain::LauncherError::Validation)
    /// for the first failed check, or a store error while reading names.
    pub fn validate(&self, existing: Option<&str>, store: &dyn ItemStore, rules: &GestureRules) -> Result<Item> {
        let name = self.name.trim();
        let path = self.path.trim();
        let gesture = self.gesture.trim();
        let kind = match self.kind {
            Some(kind) if !name.is_empty() && !path.is_empty() && !gesture.is_empty() => kind,
            _ => return Err(ValidationError::MissingField.into()),
        };

        let gesture = rules.check_shortcut(gesture)?;

        if [name, path, self.arguments.as_str()]
            .iter()
            .any(|field| field.contains(['\n', '\r']))
        {
            return Err(ValidationError::LineBreak.into());
        }
        if name.starts_with(['#', ';', '[']) || name.contains('=') {
            return Err(ValidationError::InvalidName.into());
        }

        let mut names = store.all_names()?;
        if let Some(existing) = existing {
            names.remove(existing);
        }
        if names.contains(name) {
            return Err(ValidationError::DuplicateName.into());
        }

        rules.check_collision(&gesture, existing, &store.gesture_to_name_map()?)?;

        Ok(Item::new(name, kind, path)
            .with_gesture(gesture)
            .with_arguments(self.arguments.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gesture::{is_valid_gesture, Key, DEFAULT_TOGGLE_GESTURE};
    use crate::domain::LauncherError;
    use crate::storage::IniStore;

    fn rules() -> GestureRules {
        GestureRules::new(&[DEFAULT_TOGGLE_GESTURE], is_valid_gesture)
    }

    fn store() -> (tempfile::TempDir, IniStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = IniStore::new(dir.path().join("config.ini")).unwrap();
        let docs = Item::new("Docs", ItemKind::Folder, "~/Documents").with_gesture("kb:d");
        store.add_item(&docs).unwrap();
        (dir, store)
    }

    fn rejection(result: Result<Item>) -> ValidationError {
        match result {
            Err(LauncherError::Validation(e)) => e,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_reported_first() {
        let (_dir, store) = store();
        let draft = ItemDraft::new("", ItemKind::Website, "example.com", "kb:escape");
        assert_eq!(rejection(draft.validate(None, &store, &rules())), ValidationError::MissingField);

        let untyped = ItemDraft {
            name: "Site".into(),
            path: "example.com".into(),
            gesture: "kb:s".into(),
            ..ItemDraft::default()
        };
        assert_eq!(rejection(untyped.validate(None, &store, &rules())), ValidationError::MissingField);
    }

    #[test]
    fn reserved_and_invalid_shortcuts_are_rejected() {
        let (_dir, store) = store();
        let escape = ItemDraft::new("Site", ItemKind::Website, "example.com", "escape");
        assert_eq!(rejection(escape.validate(None, &store, &rules())), ValidationError::ReservedGesture);

        let toggle = ItemDraft::new("Site", ItemKind::Website, "example.com", "kb:nvda+E");
        assert_eq!(rejection(toggle.validate(None, &store, &rules())), ValidationError::ReservedGesture);

        let bogus = ItemDraft::new("Site", ItemKind::Website, "example.com", "kb:notakey");
        assert_eq!(rejection(bogus.validate(None, &store, &rules())), ValidationError::InvalidGesture);
    }

    #[test]
    fn values_the_file_cannot_hold_are_rejected() {
        let (_dir, store) = store();
        let equals_key = ItemDraft::new("Docs2", ItemKind::Folder, "/tmp", "kb:=");
        assert_eq!(rejection(equals_key.validate(None, &store, &rules())), ValidationError::InvalidGesture);

        for name in ["#1 News", ";News", "[News]", "a=b"] {
            let draft = ItemDraft::new(name, ItemKind::Website, "example.com", "kb:w");
            assert_eq!(rejection(draft.validate(None, &store, &rules())), ValidationError::InvalidName, "{name}");
        }

        let split_path = ItemDraft::new("Web", ItemKind::Website, "example.com\n[Files]", "kb:w");
        assert_eq!(rejection(split_path.validate(None, &store, &rules())), ValidationError::LineBreak);

        let inner_hash = ItemDraft::new("News #1", ItemKind::Website, "example.com", "kb:w");
        assert_eq!(inner_hash.validate(None, &store, &rules()).unwrap().name, "News #1");
    }

    #[test]
    fn duplicate_name_and_taken_shortcut() {
        let (_dir, store) = store();
        let same_name = ItemDraft::new("Docs", ItemKind::Website, "example.com", "kb:w");
        assert_eq!(rejection(same_name.validate(None, &store, &rules())), ValidationError::DuplicateName);

        let same_key = ItemDraft::new("Web", ItemKind::Website, "example.com", "KB:D");
        assert_eq!(rejection(same_key.validate(None, &store, &rules())), ValidationError::GestureTaken);
    }

    #[test]
    fn editing_may_keep_own_name_and_shortcut() {
        let (_dir, store) = store();
        let draft = ItemDraft::new("Docs", ItemKind::Folder, "~/Docs2", "kb:d");

        let item = draft.validate(Some("Docs"), &store, &rules()).unwrap();
        assert_eq!(item.path, "~/Docs2");
        assert_eq!(item.gestures, vec!["kb:d"]);
    }

    #[test]
    fn arguments_survive_only_for_programs() {
        let (_dir, store) = store();
        let folder = ItemDraft::new("Src", ItemKind::Folder, "~/src", "kb:s").with_arguments("-x");
        assert_eq!(folder.validate(None, &store, &rules()).unwrap().arguments, "");

        let program = ItemDraft::new("Ed", ItemKind::Program, "/usr/bin/ed", "kb:e").with_arguments(" -p ");
        assert_eq!(program.validate(None, &store, &rules()).unwrap().arguments, "-p");
    }

    #[test]
    fn capture_keeps_previous_shortcut_on_rejection() {
        let mut draft = ItemDraft::new("Site", ItemKind::Website, "example.com", "kb:s");

        let escape = KeyChord::plain(Key::Named("escape"));
        assert_eq!(draft.capture(&escape, &rules()), Err(ValidationError::ReservedGesture));
        assert_eq!(draft.gesture, "kb:s");

        let chord = KeyChord {
            control: true,
            ..KeyChord::plain(Key::Char('W'))
        };
        draft.capture(&chord, &rules()).unwrap();
        assert_eq!(draft.gesture, "kb:control+w");
        assert_eq!(draft.shortcut_label(), "control+w");
    }
}

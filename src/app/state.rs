//! Instant mode state container.
//!
//! [`AppState`] owns the mode flag, the verbosity used for announcements, the
//! toggle gestures currently mapped in the host, and the gesture map built at
//! the last activation. All transitions go through [`AppState::activate`] and
//! [`AppState::deactivate`], which return the actions the host must carry out so
//! that the installed bindings always match the mode.
//!
//! # Example
//!
//! ```rust
//! use instant_access::app::{Action, AppState, InstantMode};
//! use instant_access::domain::{Item, ItemKind, Verbosity};
//!
//! let mut state = AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Beginner);
//! let docs = Item::new("Docs", ItemKind::Folder, "~/Documents").with_gesture("kb:d");
//! let actions = state.activate(vec![docs], true);
//!
//! assert_eq!(state.mode, InstantMode::Active);
//! assert!(matches!(actions.last(), Some(Action::Speak(_))));
//! ```

use super::actions::Action;
use super::announce;
use super::bindings::{BindingSet, ScriptAction};
use super::modes::InstantMode;
use crate::domain::gesture::{canonical_identifier, expand_layouts, ESCAPE_GESTURE};
use crate::domain::{Item, Verbosity};
use std::collections::{BTreeMap, BTreeSet};

/// Central instant mode state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Whether the item bindings are installed.
    pub mode: InstantMode,

    /// Announcement wording.
    pub verbosity: Verbosity,

    /// Gestures mapped to the toggle script in the host.
    ///
    /// Refreshed before every dispatch since the user may remap them while the
    /// plugin runs.
    pub toggle_gestures: Vec<String>,

    /// Lower-cased gesture variant to item, built at the last activation.
    gesture_map: BTreeMap<String, Item>,

    /// Distinct item names bound at the last activation.
    loaded: usize,
}

impl AppState {
    #[must_use]
    pub fn new(toggle_gestures: Vec<String>, verbosity: Verbosity) -> Self {
        Self {
            toggle_gestures,
            verbosity,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    /// Number of distinct items bound at the last activation.
    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    /// Binding set holding only the toggle gestures.
    #[must_use]
    pub fn toggle_bindings(&self) -> BindingSet {
        BindingSet::toggle_only(&self.toggle_gestures)
    }

    /// Binding set for active mode: item gestures, then toggle, then escape.
    ///
    /// Reserved gestures are bound last so an item that claims one through a
    /// hand-edited file cannot shadow them.
    #[must_use]
    pub fn active_bindings(&self) -> BindingSet {
        let mut set = BindingSet::default();
        for gesture in self.gesture_map.keys() {
            set.bind(gesture, ScriptAction::RunItem);
        }
        for gesture in &self.toggle_gestures {
            set.bind_all_layouts(gesture, ScriptAction::Toggle);
        }
        set.bind(ESCAPE_GESTURE, ScriptAction::Exit);
        set
    }

    /// Item bound to the first matching identifier, checked verbatim and then
    /// in canonical form.
    #[must_use]
    pub fn item_for<S: AsRef<str>>(&self, identifiers: &[S]) -> Option<&Item> {
        identifiers.iter().find_map(|identifier| {
            let identifier = identifier.as_ref();
            self.gesture_map
                .get(&identifier.trim().to_lowercase())
                .or_else(|| self.gesture_map.get(&canonical_identifier(identifier)))
        })
    }

    /// Rebuilds the gesture map from `items` and enters instant mode.
    ///
    /// With no bound items the state stays (or becomes) inactive and only the
    /// toggle bindings are installed.
    pub fn activate(&mut self, items: Vec<Item>, speak: bool) -> Vec<Action> {
        self.rebuild_gesture_map(items);

        if self.loaded == 0 {
            self.mode = InstantMode::Inactive;
            let mut actions = vec![Action::InstallBindings(self.toggle_bindings())];
            if speak {
                actions.push(Action::Speak(announce::NO_COMMANDS.to_string()));
            }
            return actions;
        }

        self.mode = InstantMode::Active;
        let mut actions = vec![Action::InstallBindings(self.active_bindings())];
        if speak {
            actions.push(Action::Speak(announce::activated(self.verbosity, self.loaded)));
        }
        actions
    }

    /// Leaves instant mode. Does nothing when already inactive.
    pub fn deactivate(&mut self, speak: bool) -> Vec<Action> {
        if !self.is_active() {
            return Vec::new();
        }
        self.mode = InstantMode::Inactive;

        let mut actions = vec![Action::InstallBindings(self.toggle_bindings())];
        if speak {
            actions.push(Action::Speak(announce::deactivated(self.verbosity).to_string()));
        }
        actions
    }

    /// Feedback for a gesture with no item while active.
    #[must_use]
    pub fn invalid_key_feedback(&self) -> Vec<Action> {
        let (frequency_hz, duration_ms) = announce::INVALID_KEY_TONE;
        let beep = Action::Beep {
            frequency_hz,
            duration_ms,
        };
        match self.verbosity {
            Verbosity::Beginner => {
                vec![Action::Speak(announce::UNASSIGNED_GESTURE.to_string()), beep]
            }
            Verbosity::Advanced => vec![beep],
        }
    }

    fn rebuild_gesture_map(&mut self, items: Vec<Item>) {
        self.gesture_map.clear();
        let mut names = BTreeSet::new();

        for item in items {
            let variants: Vec<String> = item
                .gestures
                .iter()
                .flat_map(|gesture| expand_layouts(gesture))
                .collect();
            if variants.is_empty() {
                continue;
            }
            names.insert(item.name.clone());
            for variant in variants {
                self.gesture_map.insert(variant, item.clone());
            }
        }

        self.loaded = names.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKind;

    fn state() -> AppState {
        AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Beginner)
    }

    fn site(name: &str, gesture: &str) -> Item {
        Item::new(name, ItemKind::Website, "example.com").with_gesture(gesture)
    }

    #[test]
    fn activation_binds_every_layout_and_reserved_gestures() {
        let mut state = state();
        state.activate(vec![site("Example", "kb:x")], false);

        let bindings = state.active_bindings();
        assert_eq!(bindings.get("kb:x"), Some(ScriptAction::RunItem));
        assert_eq!(bindings.get("kb(laptop):x"), Some(ScriptAction::RunItem));
        assert_eq!(bindings.get("kb:nvda+e"), Some(ScriptAction::Toggle));
        assert_eq!(bindings.get("kb:escape"), Some(ScriptAction::Exit));
    }

    #[test]
    fn items_without_gestures_are_not_counted() {
        let mut state = state();
        let bare = Item::new("Bare", ItemKind::File, "/tmp/a.txt");
        let actions = state.activate(vec![bare], true);

        assert_eq!(state.mode, InstantMode::Inactive);
        assert_eq!(state.loaded(), 0);
        assert_eq!(
            actions,
            vec![
                Action::InstallBindings(state.toggle_bindings()),
                Action::Speak(announce::NO_COMMANDS.to_string()),
            ]
        );
    }

    #[test]
    fn loaded_counts_names_not_gestures() {
        let mut state = state();
        let multi = site("Example", "kb:x").with_gesture("kb:y");
        let actions = state.activate(vec![multi, site("Other", "kb:o")], true);

        assert_eq!(state.loaded(), 2);
        assert!(actions.contains(&Action::Speak("instant Access On. 2 commands loaded".into())));
    }

    #[test]
    fn deactivate_when_inactive_is_silent() {
        let mut state = state();
        assert!(state.deactivate(true).is_empty());
    }

    #[test]
    fn item_lookup_accepts_layout_qualified_identifiers() {
        let mut state = state();
        state.activate(vec![site("Example", "kb:x")], false);

        assert_eq!(state.item_for(&["kb(desktop):x"]).map(|i| i.name.as_str()), Some("Example"));
        assert!(state.item_for(&["kb:z"]).is_none());
    }

    #[test]
    fn invalid_key_feedback_depends_on_verbosity() {
        let mut state = state();
        assert_eq!(state.invalid_key_feedback().len(), 2);
        state.verbosity = Verbosity::Advanced;
        assert_eq!(
            state.invalid_key_feedback(),
            vec![Action::Beep { frequency_hz: 250, duration_ms: 50 }]
        );
    }
}

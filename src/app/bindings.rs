//! Gesture binding sets installed in the host.
//!
//! Exactly one [`BindingSet`] is installed at a time. While instant mode is
//! inactive it holds only the toggle gestures; while active it also holds every
//! item gesture and escape.

use crate::domain::gesture::{canonical_identifier, expand_layouts};
use std::collections::BTreeMap;

/// Named script a gesture is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptAction {
    /// Enter or leave instant mode.
    Toggle,
    /// Leave instant mode without running anything.
    Exit,
    /// Launch the item bound to the pressed gesture.
    RunItem,
}

impl ScriptAction {
    /// Script name registered with the host.
    #[must_use]
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::Toggle => "toggleInstantMode",
            Self::Exit => "exitInstantMode",
            Self::RunItem => "runInstantItem",
        }
    }
}

/// Mapping of lower-cased gesture identifiers to script actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    bindings: BTreeMap<String, ScriptAction>,
}

impl BindingSet {
    /// Every layout variant of every toggle gesture, bound to [`ScriptAction::Toggle`].
    ///
    /// ```
    /// use instant_access::app::{BindingSet, ScriptAction};
    ///
    /// let set = BindingSet::toggle_only(&["kb:NVDA+e"]);
    /// assert_eq!(set.get("kb:nvda+e"), Some(ScriptAction::Toggle));
    /// assert_eq!(set.get("kb(laptop):nvda+e"), Some(ScriptAction::Toggle));
    /// assert_eq!(set.len(), 2);
    /// ```
    #[must_use]
    pub fn toggle_only<S: AsRef<str>>(toggle_gestures: &[S]) -> Self {
        let mut set = Self::default();
        for gesture in toggle_gestures {
            set.bind_all_layouts(gesture.as_ref(), ScriptAction::Toggle);
        }
        set
    }

    /// Binds one identifier exactly as given (lower-cased). Later bindings win.
    pub fn bind(&mut self, identifier: &str, action: ScriptAction) {
        let key = identifier.trim().to_lowercase();
        if !key.is_empty() {
            self.bindings.insert(key, action);
        }
    }

    /// Binds `gesture` in every layout variant.
    pub fn bind_all_layouts(&mut self, gesture: &str, action: ScriptAction) {
        for variant in expand_layouts(gesture) {
            self.bindings.insert(variant, action);
        }
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<ScriptAction> {
        self.bindings.get(&identifier.trim().to_lowercase()).copied()
    }

    /// Finds the action for the first identifier that is bound, trying each
    /// identifier verbatim and then in canonical (unqualified) form.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, identifiers: &[S]) -> Option<ScriptAction> {
        identifiers.iter().find_map(|identifier| {
            let identifier = identifier.as_ref();
            self.get(identifier)
                .or_else(|| self.bindings.get(&canonical_identifier(identifier)).copied())
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Identifiers and actions in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ScriptAction)> {
        self.bindings.iter().map(|(gesture, action)| (gesture.as_str(), *action))
    }

    /// Identifiers bound to `action`.
    pub fn gestures_for(&self, action: ScriptAction) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|(gesture, _)| gesture)
    }
}

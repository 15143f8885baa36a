//! Event handling and instant mode transitions.
//!
//! [`handle_event`] is the inner stage of the dispatch pipeline. It never calls
//! into the host; everything it wants done comes back as [`Action`]s.
//!
//! # Event Types
//!
//! - **Gestures**: `Toggle`, `Exit`, `RunItem`, `Unbound`
//! - **Settings**: `ConfigChanged`, `VerbosityChanged`
//! - **Lifecycle**: `Terminate`
//!
//! The single-shot exit after a gesture is not handled here; it is a pipeline
//! stage (see [`crate::app::pipeline::SingleShot`]).

use crate::app::{Action, AppState};
use crate::domain::{Item, Verbosity};
use crate::storage::ItemStore;

/// Events delivered by the host or by the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The toggle gesture was pressed.
    Toggle,

    /// Escape was pressed while instant mode was active.
    Exit,

    /// A gesture bound to an item was pressed.
    RunItem {
        /// Every identifier the host reports for the pressed key, most
        /// specific first.
        identifiers: Vec<String>,
    },

    /// A gesture with no binding was pressed while instant mode was active.
    Unbound {
        identifiers: Vec<String>,
    },

    /// Items were added, edited, deleted or imported.
    ConfigChanged,

    /// The verbosity preference changed.
    VerbosityChanged(Verbosity),

    /// The plugin is being unloaded.
    Terminate,
}

impl Event {
    /// Whether the event comes from a key press (and so ends instant mode).
    #[must_use]
    pub const fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::Toggle | Self::Exit | Self::RunItem { .. } | Self::Unbound { .. }
        )
    }

    /// Short name used in trace output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Exit => "exit",
            Self::RunItem { .. } => "run_item",
            Self::Unbound { .. } => "unbound",
            Self::ConfigChanged => "config_changed",
            Self::VerbosityChanged(_) => "verbosity_changed",
            Self::Terminate => "terminate",
        }
    }
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// Store failures while activating are logged and treated as an empty store,
/// so a broken file leaves the user with "No commands configured." rather
/// than a stuck mode.
///
/// # Example
///
/// ```rust
/// use instant_access::app::{handle_event, AppState, Event};
/// use instant_access::domain::Verbosity;
/// use instant_access::storage::IniStore;
///
/// let dir = tempfile::tempdir()?;
/// let store = IniStore::new(dir.path().join("config.ini"))?;
/// let mut state = AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Beginner);
///
/// let actions = handle_event(&mut state, &store, &Event::Toggle);
/// assert!(!state.is_active());
/// assert_eq!(actions.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn handle_event(state: &mut AppState, store: &dyn ItemStore, event: &Event) -> Vec<Action> {
    match event {
        Event::Toggle => {
            if state.is_active() {
                state.deactivate(true)
            } else {
                activate(state, store, true)
            }
        }
        Event::Exit => state.deactivate(true),
        Event::RunItem { identifiers } => {
            if !state.is_active() {
                return vec![];
            }
            match state.item_for(identifiers) {
                Some(item) => {
                    tracing::debug!(item = %item.name, kind = %item.kind, "launching item");
                    vec![Action::Launch(item.clone())]
                }
                None => {
                    tracing::debug!(?identifiers, "no item for gesture");
                    vec![]
                }
            }
        }
        Event::Unbound { identifiers } => {
            if !state.is_active() {
                return vec![];
            }
            tracing::debug!(?identifiers, "unassigned gesture in instant mode");
            state.invalid_key_feedback()
        }
        Event::ConfigChanged => {
            if state.is_active() {
                activate(state, store, false)
            } else {
                vec![]
            }
        }
        Event::VerbosityChanged(verbosity) => {
            state.verbosity = *verbosity;
            vec![]
        }
        Event::Terminate => state.deactivate(false),
    }
}

fn activate(state: &mut AppState, store: &dyn ItemStore, speak: bool) -> Vec<Action> {
    state.activate(load_items(store), speak)
}

fn load_items(store: &dyn ItemStore) -> Vec<Item> {
    match store.list_items() {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.config_path().display(), "could not read items");
            Vec::new()
        }
    }
}

//! Gesture dispatch pipeline.
//!
//! Every event passes through an ordered list of [`Middleware`] stages before
//! reaching [`handle_event`]. Each stage receives the rest of the chain as a
//! `next` callback and may act before and after calling it.
//!
//! ```text
//! event ─▶ TraceStage ─▶ SingleShot ─▶ handle_event
//! ```

use super::actions::Action;
use super::handler::{handle_event, Event};
use super::state::AppState;
use crate::storage::ItemStore;

/// Remainder of the pipeline, as seen from a stage.
pub type Next<'a> = &'a dyn Fn(&mut AppState, &Event) -> Vec<Action>;

/// A wrapper around event dispatch.
pub trait Middleware: Send + Sync {
    fn handle(&self, state: &mut AppState, event: &Event, next: Next<'_>) -> Vec<Action>;
}

/// Ordered middleware stages ending in [`handle_event`].
pub struct Pipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl Default for Pipeline {
    /// Tracing outermost, then the single-shot exit.
    fn default() -> Self {
        Self::new()
            .with_stage(TraceStage)
            .with_stage(SingleShot)
    }
}

impl Pipeline {
    /// A pipeline with no stages.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn dispatch(&self, state: &mut AppState, store: &dyn ItemStore, event: &Event) -> Vec<Action> {
        self.run(0, state, store, event)
    }

    fn run(&self, index: usize, state: &mut AppState, store: &dyn ItemStore, event: &Event) -> Vec<Action> {
        match self.stages.get(index) {
            Some(stage) => stage.handle(state, event, &|state: &mut AppState, event: &Event| {
                self.run(index + 1, state, store, event)
            }),
            None => handle_event(state, store, event),
        }
    }
}

/// Leaves instant mode after any gesture handled while it was active.
///
/// Toggle and escape already leave it (with an announcement); every other
/// gesture leaves it silently once the inner stages have run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleShot;

impl Middleware for SingleShot {
    fn handle(&self, state: &mut AppState, event: &Event, next: Next<'_>) -> Vec<Action> {
        let was_active = state.is_active();
        let mut actions = next(state, event);

        if was_active && event.is_gesture() && state.is_active() {
            tracing::debug!(event = event.kind(), "single-shot exit");
            actions.extend(state.deactivate(false));
        }
        actions
    }
}

/// Records each dispatch with the mode before and after.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceStage;

impl Middleware for TraceStage {
    fn handle(&self, state: &mut AppState, event: &Event, next: Next<'_>) -> Vec<Action> {
        let _span = tracing::debug_span!("dispatch", event = event.kind()).entered();
        let before = state.mode;
        let actions = next(state, event);
        tracing::debug!(?before, after = ?state.mode, actions = actions.len(), "event dispatched");
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{InstantMode, ScriptAction};
    use crate::domain::{Item, ItemKind, Verbosity};
    use crate::storage::IniStore;

    fn store_with_docs(dir: &tempfile::TempDir) -> IniStore {
        let store = IniStore::new(dir.path().join("config.ini")).unwrap();
        let docs = Item::new("Docs", ItemKind::Folder, "~/Documents").with_gesture("kb:d");
        store.add_item(&docs).unwrap();
        store
    }

    #[test]
    fn run_item_launches_then_reinstalls_toggle_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_docs(&dir);
        let pipeline = Pipeline::default();
        let mut state = AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Beginner);

        pipeline.dispatch(&mut state, &store, &Event::Toggle);
        let actions = pipeline.dispatch(
            &mut state,
            &store,
            &Event::RunItem {
                identifiers: vec!["kb:d".into()],
            },
        );

        assert_eq!(state.mode, InstantMode::Inactive);
        assert!(matches!(&actions[0], Action::Launch(item) if item.name == "Docs"));
        assert!(matches!(
            &actions[1],
            Action::InstallBindings(set) if set.gestures_for(ScriptAction::RunItem).count() == 0
        ));
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn unbound_gesture_gives_feedback_and_exits() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_docs(&dir);
        let pipeline = Pipeline::default();
        let mut state = AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Advanced);

        pipeline.dispatch(&mut state, &store, &Event::Toggle);
        let actions = pipeline.dispatch(
            &mut state,
            &store,
            &Event::Unbound {
                identifiers: vec!["kb:q".into()],
            },
        );

        assert_eq!(state.mode, InstantMode::Inactive);
        assert_eq!(actions[0], Action::Beep { frequency_hz: 250, duration_ms: 50 });
    }

    #[test]
    fn non_gesture_events_do_not_exit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_docs(&dir);
        let pipeline = Pipeline::default();
        let mut state = AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Beginner);

        pipeline.dispatch(&mut state, &store, &Event::Toggle);
        pipeline.dispatch(&mut state, &store, &Event::ConfigChanged);
        assert_eq!(state.mode, InstantMode::Active);
    }

    #[test]
    fn escape_speaks_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_docs(&dir);
        let pipeline = Pipeline::default();
        let mut state = AppState::new(vec!["kb:NVDA+e".into()], Verbosity::Beginner);

        pipeline.dispatch(&mut state, &store, &Event::Toggle);
        let actions = pipeline.dispatch(&mut state, &store, &Event::Exit);

        let spoken: Vec<_> = actions
            .iter()
            .filter(|action| matches!(action, Action::Speak(_)))
            .collect();
        assert_eq!(spoken, vec![&Action::Speak("instant Access Off".into())]);
        assert!(!actions.iter().any(|action| matches!(action, Action::Launch(_))));
    }
}

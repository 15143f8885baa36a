//! Host-facing plugin object.
//!
//! [`InstantAccess`] owns the item store, the instant mode state, the dispatch
//! pipeline and the launch pool, and drives a [`Host`]. Every method runs on the
//! host's main thread; launch feedback produced on pool threads is only spoken
//! when the host calls [`InstantAccess::pump_feedback`].
//!
//! # Lifecycle
//!
//! 1. [`load`](InstantAccess::load): open the store, start the pool, install the
//!    toggle bindings (or stay inert in secure mode)
//! 2. [`on_gesture`](InstantAccess::on_gesture): for every key press the host
//!    routes to the plugin
//! 3. [`open_settings`](InstantAccess::open_settings): settings panel wired back
//!    into the running controller
//! 4. [`terminate`](InstantAccess::terminate): leave instant mode silently and
//!    release the pool without waiting for launches in flight

use crate::app::{Action, AppState, BindingSet, Event, Host, InstantMode, Pipeline, ScriptAction};
use crate::domain::gesture::GestureRules;
use crate::domain::{Item, Result, Verbosity};
use crate::settings::{SettingsListener, SettingsPanel};
use crate::storage::{IniStore, ItemStore};
use crate::worker::{Feedback, LaunchPool, Launcher, SystemLauncher, WorkerMessage};
use crate::Config;
use crossbeam_channel::Receiver;
use std::sync::Arc;

/// What the host should do with a key press after [`InstantAccess::on_gesture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The plugin handled the gesture.
    Consumed,
    /// Not ours; the host processes the key normally.
    PassThrough,
}

struct Runtime {
    store: Arc<dyn ItemStore>,
    state: AppState,
    pipeline: Pipeline,
    pool: LaunchPool,
    feedback: Receiver<Feedback>,
    installed: BindingSet,
}

impl Runtime {
    fn dispatch<H: Host>(&mut self, host: &mut H, event: &Event) {
        self.state.toggle_gestures = host.toggle_gestures();
        let actions = self.pipeline.dispatch(&mut self.state, self.store.as_ref(), event);
        self.apply(host, actions);
    }

    fn apply<H: Host>(&mut self, host: &mut H, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::InstallBindings(bindings) => {
                    host.install_bindings(&bindings);
                    self.installed = bindings;
                }
                Action::Speak(message) => host.speak(&message),
                Action::Beep {
                    frequency_hz,
                    duration_ms,
                } => host.beep(frequency_hz, duration_ms),
                Action::Launch(item) => self.submit(WorkerMessage::launch(item)),
            }
        }
    }

    fn submit(&self, message: WorkerMessage) {
        if let Err(e) = self.pool.submit(message) {
            tracing::warn!(error = %e, "launch not queued");
        }
    }
}

/// The instant Access plugin, bound to one host.
pub struct InstantAccess<H: Host> {
    host: H,
    runtime: Option<Runtime>,
}

impl<H: Host> InstantAccess<H> {
    /// Loads the plugin with the system launcher.
    ///
    /// # Errors
    ///
    /// Store creation or pool start-up failures.
    pub fn load(config: &Config, host: H) -> Result<Self> {
        Self::load_with_launcher(config, host, Arc::new(SystemLauncher))
    }

    /// Loads the plugin with a custom launcher.
    ///
    /// In secure mode (from the config or the host) nothing is opened or bound
    /// and every later call is a no-op.
    ///
    /// # Errors
    ///
    /// Store creation or pool start-up failures.
    pub fn load_with_launcher(config: &Config, mut host: H, launcher: Arc<dyn Launcher>) -> Result<Self> {
        if config.secure_mode || host.is_secure() {
            tracing::info!("secure mode, instant Access stays inactive");
            return Ok(Self { host, runtime: None });
        }

        let store: Arc<dyn ItemStore> = Arc::new(IniStore::new(config.config_file())?);
        let verbosity = store.verbosity().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read verbosity, using default");
            Verbosity::default()
        });
        let (pool, feedback) = LaunchPool::new(config.worker_count, launcher)?;

        let state = AppState::new(host.toggle_gestures(), verbosity);
        let installed = state.toggle_bindings();
        host.install_bindings(&installed);

        tracing::info!(
            config_file = %store.config_path().display(),
            %verbosity,
            worker_count = pool.worker_count(),
            "instant Access loaded"
        );

        Ok(Self {
            host,
            runtime: Some(Runtime {
                store,
                state,
                pipeline: Pipeline::default(),
                pool,
                feedback,
                installed,
            }),
        })
    }

    /// Handles one key press.
    ///
    /// `identifiers` are every name the host reports for the key, most
    /// specific first (for example `kb(desktop):d`, then `kb:d`).
    pub fn on_gesture<S: AsRef<str>>(&mut self, identifiers: &[S]) -> Dispatch {
        let Some(runtime) = self.runtime.as_mut() else {
            return Dispatch::PassThrough;
        };
        let identifiers: Vec<String> = identifiers.iter().map(|id| id.as_ref().to_string()).collect();

        let event = match (runtime.installed.resolve(&identifiers), runtime.state.mode) {
            (Some(ScriptAction::Toggle), _) => Event::Toggle,
            (Some(ScriptAction::Exit), _) => Event::Exit,
            (Some(ScriptAction::RunItem), _) => Event::RunItem { identifiers },
            (None, InstantMode::Active) => Event::Unbound { identifiers },
            (None, InstantMode::Inactive) => return Dispatch::PassThrough,
        };

        let span = tracing::info_span!("gesture", event = event.kind());
        let _guard = span.entered();
        runtime.dispatch(&mut self.host, &event);
        Dispatch::Consumed
    }

    /// Speaks feedback queued by launch threads. Returns how many messages
    /// were spoken.
    pub fn pump_feedback(&mut self) -> usize {
        let Some(runtime) = self.runtime.as_ref() else {
            return 0;
        };
        let mut spoken = 0;
        for feedback in runtime.feedback.try_iter() {
            self.host.speak(feedback.message());
            spoken += 1;
        }
        spoken
    }

    /// Settings panel whose changes apply to this plugin immediately. `None`
    /// in secure mode.
    pub fn open_settings(&mut self) -> Option<SettingsPanel<'_>> {
        let store = Arc::clone(&self.runtime.as_ref()?.store);
        let rules = GestureRules::new(&self.host.toggle_gestures(), self.host.gesture_grammar());
        Some(SettingsPanel::new(store, rules, self))
    }

    /// Leaves instant mode without speaking and shuts the pool down.
    /// Later calls do nothing.
    pub fn terminate(&mut self) {
        let Some(mut runtime) = self.runtime.take() else {
            return;
        };
        runtime.dispatch(&mut self.host, &Event::Terminate);
        runtime.pool.shutdown();
        tracing::info!("instant Access terminated");
    }

    #[must_use]
    pub fn mode(&self) -> InstantMode {
        self.runtime
            .as_ref()
            .map_or(InstantMode::Inactive, |runtime| runtime.state.mode)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode().is_active()
    }

    /// True in secure mode and after [`terminate`](Self::terminate).
    #[must_use]
    pub const fn is_inert(&self) -> bool {
        self.runtime.is_none()
    }

    /// Bindings currently installed in the host.
    #[must_use]
    pub fn installed_bindings(&self) -> Option<&BindingSet> {
        self.runtime.as_ref().map(|runtime| &runtime.installed)
    }

    #[must_use]
    pub fn store(&self) -> Option<Arc<dyn ItemStore>> {
        self.runtime.as_ref().map(|runtime| Arc::clone(&runtime.store))
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: Host> SettingsListener for InstantAccess<H> {
    fn config_changed(&mut self) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.dispatch(&mut self.host, &Event::ConfigChanged);
        }
    }

    fn verbosity_changed(&mut self, verbosity: Verbosity) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.dispatch(&mut self.host, &Event::VerbosityChanged(verbosity));
        }
    }

    fn run_item(&mut self, item: Item) {
        if let Some(runtime) = self.runtime.as_ref() {
            runtime.submit(WorkerMessage::test(item));
        }
    }
}

impl<H: Host> Drop for InstantAccess<H> {
    fn drop(&mut self) {
        self.terminate();
    }
}

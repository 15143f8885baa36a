//! instant Access: a single-shot keyboard launcher for screen reader users.
//!
//! Pressing the toggle gesture (`NVDA+e` by default) arms instant mode. The
//! next key press either launches the website, program, folder or file bound
//! to it, or is rejected with a short signal; either way instant mode ends.
//! Items live in a small per-user INI file edited through a settings panel.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host / CLI shim (main.rs, plugin.rs)               │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Instant mode FSM
//! │  - Event handling and dispatch pipeline             │
//! │  - Binding sets                                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Settings      │   │ Storage Layer │   │ Worker Layer  │
//! │ (settings/)   │   │ (storage/)    │   │ (worker/)     │
//! │ - Item editor │   │ - INI file    │   │ - Launch pool │
//! │ - Export/imp. │   │ - Fuzzy search│   │ - OS launcher │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Per-user paths, path expansion (infrastructure/) │
//! │  - Items, gestures, errors (domain/)                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry spans exported to a JSON file      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Instant mode state machine with event/action model
//! - [`domain`]: Items, gesture grammar, errors
//! - [`infrastructure`]: Per-user directories and path expansion
//! - [`storage`]: INI item store and fuzzy filter
//! - [`worker`]: Launch pool and per-type launch policy
//! - [`settings`]: Settings panel behavior
//! - [`plugin`]: Host-facing plugin object
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Runtime options come from the host as a string map or from a TOML file:
//!
//! ```toml
//! config_dir = "~/.config/instantAccess"
//! toggle_gestures = ["kb:NVDA+e"]
//! trace_level = "debug"
//! worker_count = 3
//! ```
//!
//! # Example
//!
//! ```rust
//! use instant_access::{Config, InstantAccess};
//! use instant_access::app::{BindingSet, Host};
//!
//! #[derive(Default)]
//! struct Silent(Vec<String>);
//!
//! impl Host for Silent {
//!     fn install_bindings(&mut self, _bindings: &BindingSet) {}
//!     fn speak(&mut self, message: &str) { self.0.push(message.to_string()); }
//!     fn beep(&mut self, _frequency_hz: u32, _duration_ms: u32) {}
//! }
//!
//! let dir = tempfile::tempdir()?;
//! let config = Config { config_dir: dir.path().to_path_buf(), ..Config::default() };
//! let mut plugin = InstantAccess::load(&config, Silent::default())?;
//!
//! plugin.on_gesture(&["kb:nvda+e"]);
//! assert_eq!(plugin.host().0, vec!["No commands configured."]);
//! plugin.terminate();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod plugin;
pub mod settings;
pub mod storage;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, Host, InstantMode};
pub use domain::{Item, ItemKind, LauncherError, Result, Verbosity};
pub use plugin::{Dispatch, InstantAccess};

use domain::gesture::DEFAULT_TOGGLE_GESTURE;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Folder holding `config.ini`. Default: `<user config dir>/instantAccess`
    pub config_dir: PathBuf,

    /// Toggle gestures used by hosts that do not keep their own mapping
    /// (the terminal session). Default: `["kb:NVDA+e"]`
    pub toggle_gestures: Vec<String>,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Launch threads. Default: 3
    pub worker_count: usize,

    /// Load inert, as on a secure desktop.
    pub secure_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: infrastructure::default_config_dir(),
            toggle_gestures: vec![DEFAULT_TOGGLE_GESTURE.to_string()],
            trace_level: None,
            worker_count: worker::DEFAULT_WORKER_COUNT,
            secure_mode: false,
        }
    }
}

impl Config {
    /// Parses configuration from a host-supplied string map.
    ///
    /// # Parsing Rules
    ///
    /// - `config_dir`: `~` and `$VAR` are expanded
    /// - `toggle_gestures`: comma-separated, empty entries dropped
    /// - `worker_count`: falls back to 3 when unparsable or zero
    /// - `secure_mode`: `true`, `1` or `yes` (any case)
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use instant_access::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("toggle_gestures".to_string(), "kb:NVDA+e, kb:NVDA+shift+e".to_string());
    /// map.insert("worker_count".to_string(), "0".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.toggle_gestures, vec!["kb:NVDA+e", "kb:NVDA+shift+e"]);
    /// assert_eq!(config.worker_count, 3);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let config_dir = map
            .get("config_dir")
            .map(|raw| raw.trim())
            .filter(|raw| !raw.is_empty())
            .map_or(defaults.config_dir, |raw| {
                PathBuf::from(infrastructure::expand_path(raw))
            });

        let toggle_gestures = map
            .get("toggle_gestures")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|v: &Vec<String>| !v.is_empty())
            .unwrap_or(defaults.toggle_gestures);

        let worker_count = map
            .get("worker_count")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.worker_count);

        let secure_mode = map
            .get("secure_mode")
            .is_some_and(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"));

        Self {
            config_dir,
            toggle_gestures,
            trace_level: map.get("trace_level").cloned(),
            worker_count,
            secure_mode,
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Config`] for malformed TOML, unknown keys, a zero
    /// `worker_count` or an empty `toggle_gestures` list.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| LauncherError::Config(e.to_string()))?;

        if config.worker_count == 0 {
            return Err(LauncherError::Config("worker_count must be at least 1".to_string()));
        }
        if config.toggle_gestures.iter().all(|g| g.trim().is_empty()) {
            return Err(LauncherError::Config("toggle_gestures must not be empty".to_string()));
        }
        config.config_dir = PathBuf::from(infrastructure::expand_path(&config.config_dir.to_string_lossy()));
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// I/O failures, or anything [`from_toml_str`](Self::from_toml_str) rejects.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Location of the item file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        infrastructure::config_file(&self.config_dir)
    }
}

/// Initializes tracing, then loads the plugin into `host`.
///
/// # Errors
///
/// Anything [`InstantAccess::load`] returns.
pub fn initialize<H: Host>(config: &Config, host: H) -> Result<InstantAccess<H>> {
    observability::init_tracing(config);
    tracing::debug!(config_dir = %config.config_dir.display(), "initializing instant Access");
    InstantAccess::load(config, host)
}

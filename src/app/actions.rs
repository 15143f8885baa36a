//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never talks to the host or the worker pool directly. It
//! returns a `Vec<Action>` after processing each event and the plugin executes
//! them in order on the main thread.
//!
//! # Example
//!
//! ```rust
//! use instant_access::app::{Action, BindingSet};
//!
//! let actions = vec![
//!     Action::InstallBindings(BindingSet::toggle_only(&["kb:NVDA+e"])),
//!     Action::Speak("instant Access Off".to_string()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::app::BindingSet;
use crate::domain::Item;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replaces the host's gesture bindings with this set.
    InstallBindings(BindingSet),

    /// Speaks a message through the host's speech output.
    Speak(String),

    /// Plays a short tone.
    Beep {
        /// Tone frequency in hertz.
        frequency_hz: u32,
        /// Tone length in milliseconds.
        duration_ms: u32,
    },

    /// Hands an item to the worker pool for launching.
    ///
    /// The caller does not wait for the launch to complete.
    Launch(Item),
}

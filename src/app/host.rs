//! Seam between the controller and the screen reader it runs inside.

use super::bindings::BindingSet;
use crate::domain::gesture::{is_valid_gesture, GestureGrammar, DEFAULT_TOGGLE_GESTURE};

/// Services the hosting screen reader provides.
///
/// All methods are called from the main thread only.
pub trait Host {
    /// Replaces the plugin's gesture bindings.
    fn install_bindings(&mut self, bindings: &BindingSet);

    fn speak(&mut self, message: &str);

    fn beep(&mut self, frequency_hz: u32, duration_ms: u32);

    /// Gestures the user has mapped to the toggle script.
    fn toggle_gestures(&self) -> Vec<String> {
        vec![DEFAULT_TOGGLE_GESTURE.to_string()]
    }

    /// Whether the host accepts a gesture written in display form.
    fn gesture_grammar(&self) -> GestureGrammar {
        is_valid_gesture
    }

    /// Secure desktop or lock screen; the plugin stays inert.
    fn is_secure(&self) -> bool {
        false
    }
}

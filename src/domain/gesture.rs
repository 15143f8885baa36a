//! Gesture names: normalization, layout variants and validation.
//!
//! Gestures are host key identifiers such as `kb:control+alt+d`. The host may
//! also report layout-qualified identifiers like `kb(laptop):d`; both resolve to
//! the same canonical `kb:` form here.
//!
//! The canonical form is lower-case with a single `kb:` prefix. Normalizing is
//! idempotent, so stored, edited and dispatched gestures can be compared as plain
//! strings.

use crate::domain::ValidationError;
use std::collections::{BTreeSet, HashMap};

/// Prefix of keyboard gestures.
pub const KEYBOARD_PREFIX: &str = "kb:";

/// Leaves instant mode without running anything.
pub const ESCAPE_GESTURE: &str = "kb:escape";

/// Toggle gesture used when the host reports no remapping.
pub const DEFAULT_TOGGLE_GESTURE: &str = "kb:NVDA+e";

/// Alternate physical layouts every keyboard gesture is also bound in.
pub const ALTERNATE_LAYOUTS: &[&str] = &["laptop"];

/// Signature of a host gesture grammar check. Receives the display form
/// (no `kb:` prefix).
pub type GestureGrammar = fn(&str) -> bool;

const MODIFIERS: &[&str] = &[
    "nvda",
    "control",
    "leftcontrol",
    "rightcontrol",
    "alt",
    "leftalt",
    "rightalt",
    "shift",
    "leftshift",
    "rightshift",
    "windows",
    "leftwindows",
    "rightwindows",
];

const NAMED_KEYS: &[&str] = &[
    "enter",
    "escape",
    "space",
    "tab",
    "backspace",
    "delete",
    "insert",
    "home",
    "end",
    "pageup",
    "pagedown",
    "leftarrow",
    "rightarrow",
    "uparrow",
    "downarrow",
    "applications",
    "capslock",
    "numlock",
    "scrolllock",
    "printscreen",
    "pause",
    "numpadplus",
    "numpadminus",
    "numpadmultiply",
    "numpaddivide",
    "numpaddecimal",
    "numpadenter",
];

/// Normalizes a gesture to its canonical `kb:` form.
///
/// Strips surrounding whitespace and one (case-insensitive) `kb:` prefix,
/// lower-cases what remains and re-adds the prefix. Empty input, or a bare
/// prefix, yields an empty string.
///
/// ```
/// use instant_access::domain::gesture::normalize_gesture;
///
/// assert_eq!(normalize_gesture(" KB:Control+D "), "kb:control+d");
/// assert_eq!(normalize_gesture("alt+x"), "kb:alt+x");
/// assert_eq!(normalize_gesture("kb:  "), "");
/// ```
#[must_use]
pub fn normalize_gesture(gesture: &str) -> String {
    let trimmed = gesture.trim();
    let body = strip_keyboard_prefix(trimmed).trim();
    if body.is_empty() {
        return String::new();
    }
    format!("{KEYBOARD_PREFIX}{}", body.to_lowercase())
}

/// Removes the `kb:` prefix for display. Non-keyboard gestures are returned trimmed.
///
/// ```
/// use instant_access::domain::gesture::format_for_display;
///
/// assert_eq!(format_for_display("kb:control+d"), "control+d");
/// assert_eq!(format_for_display("br(freedom):dot1"), "br(freedom):dot1");
/// ```
#[must_use]
pub fn format_for_display(gesture: &str) -> String {
    strip_keyboard_prefix(gesture.trim()).to_string()
}

/// Expands one logical gesture into every identifier that should trigger it.
///
/// Keyboard gestures are also valid in each alternate layout, written
/// `kb(<layout>):<key>`. All results are lower-cased.
///
/// ```
/// use instant_access::domain::gesture::expand_layouts;
///
/// assert_eq!(expand_layouts("kb:D"), vec!["kb:d", "kb(laptop):d"]);
/// assert!(expand_layouts("   ").is_empty());
/// ```
#[must_use]
pub fn expand_layouts(gesture: &str) -> Vec<String> {
    let gesture = gesture.trim();
    if gesture.is_empty() {
        return Vec::new();
    }
    let lowered = gesture.to_lowercase();
    match lowered.strip_prefix(KEYBOARD_PREFIX) {
        Some(key) => {
            let mut variants = Vec::with_capacity(1 + ALTERNATE_LAYOUTS.len());
            variants.push(lowered.clone());
            variants.extend(
                ALTERNATE_LAYOUTS
                    .iter()
                    .map(|layout| format!("kb({layout}):{key}")),
            );
            variants
        }
        None => vec![lowered],
    }
}

/// Converts an identifier reported by the host's dispatcher to canonical form.
///
/// Layout-qualified identifiers (`kb(desktop):d`) lose their qualifier.
///
/// ```
/// use instant_access::domain::gesture::canonical_identifier;
///
/// assert_eq!(canonical_identifier("kb(Laptop):NVDA+E"), "kb:nvda+e");
/// assert_eq!(canonical_identifier("kb:d"), "kb:d");
/// ```
#[must_use]
pub fn canonical_identifier(identifier: &str) -> String {
    let lowered = identifier.trim().to_lowercase();
    if let Some(rest) = lowered.strip_prefix("kb(") {
        if let Some(close) = rest.find("):") {
            return format!("{KEYBOARD_PREFIX}{}", &rest[close + 2..]);
        }
    }
    lowered
}

/// Default keyboard gesture grammar.
///
/// Accepts the display form (`control+alt+d`): zero or more distinct modifiers
/// followed by one key, where a key is a single character, a named key,
/// `f1`..`f24` or `numpad0`..`numpad9`.
///
/// ```
/// use instant_access::domain::gesture::is_valid_gesture;
///
/// assert!(is_valid_gesture("control+alt+d"));
/// assert!(is_valid_gesture("f12"));
/// assert!(!is_valid_gesture("control+"));
/// assert!(!is_valid_gesture("hyper+d"));
/// ```
#[must_use]
pub fn is_valid_gesture(display: &str) -> bool {
    let display = strip_keyboard_prefix(display.trim()).to_lowercase();
    if display.is_empty() {
        return false;
    }
    // "+" on its own is a valid key; "control++" is control plus "+".
    let (modifiers, key) = match display.strip_suffix("++") {
        Some(head) => (head, "+"),
        None if display == "+" => ("", "+"),
        None => match display.rsplit_once('+') {
            Some((head, key)) => (head, key),
            None => ("", display.as_str()),
        },
    };

    let mut seen = BTreeSet::new();
    if !modifiers.is_empty() {
        for modifier in modifiers.split('+') {
            if !MODIFIERS.contains(&modifier) || !seen.insert(modifier) {
                return false;
            }
        }
    }
    is_key_name(key)
}

fn is_key_name(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) => !c.is_whitespace() && !c.is_control(),
        _ => {
            NAMED_KEYS.contains(&key)
                || numbered(key, "f").is_some_and(|n| (1..=24).contains(&n))
                || numbered(key, "numpad").is_some_and(|n| n <= 9)
        }
    }
}

fn numbered(key: &str, prefix: &str) -> Option<u8> {
    key.strip_prefix(prefix)?.parse().ok()
}

fn strip_keyboard_prefix(gesture: &str) -> &str {
    match gesture.get(..KEYBOARD_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(KEYBOARD_PREFIX) => &gesture[KEYBOARD_PREFIX.len()..],
        _ => gesture,
    }
}

/// A physical key as reported by a capture widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// `F1`..`F24`.
    Function(u8),
    /// `Numpad0`..`Numpad9`.
    Numpad(u8),
    /// A non-printing key, by its gesture name (`"enter"`, `"leftArrow"`).
    Named(&'static str),
    /// Shift, control, alt or windows pressed on its own.
    Modifier,
}

/// A captured key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub windows: bool,
    pub key: Key,
}

impl KeyChord {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            control: false,
            alt: false,
            shift: false,
            windows: false,
            key,
        }
    }

    /// Builds the gesture name for this chord, modifiers first in the order
    /// control, alt, shift, windows. A lone modifier press yields `None`.
    ///
    /// ```
    /// use instant_access::domain::gesture::{Key, KeyChord};
    ///
    /// let chord = KeyChord { control: true, shift: true, ..KeyChord::plain(Key::Char('D')) };
    /// assert_eq!(chord.gesture_name().as_deref(), Some("control+shift+d"));
    /// assert_eq!(KeyChord::plain(Key::Modifier).gesture_name(), None);
    /// ```
    #[must_use]
    pub fn gesture_name(&self) -> Option<String> {
        let key = match self.key {
            Key::Modifier => return None,
            Key::Char(c) if c.is_control() || (c.is_whitespace() && c != ' ') => return None,
            Key::Char(' ') => "space".to_string(),
            Key::Char(c) => c.to_lowercase().collect(),
            Key::Function(n) if (1..=24).contains(&n) => format!("f{n}"),
            Key::Function(_) => return None,
            Key::Numpad(n) if n <= 9 => format!("numpad{n}"),
            Key::Numpad(_) => return None,
            Key::Named(name) => name.to_string(),
        };

        let mut parts = Vec::with_capacity(5);
        for (held, name) in [
            (self.control, "control"),
            (self.alt, "alt"),
            (self.shift, "shift"),
            (self.windows, "windows"),
        ] {
            if held {
                parts.push(name.to_string());
            }
        }
        parts.push(key);
        Some(parts.join("+"))
    }
}

/// Rules a candidate item gesture must satisfy before it can be stored.
#[derive(Debug, Clone)]
pub struct GestureRules {
    reserved: BTreeSet<String>,
    grammar: GestureGrammar,
}

impl GestureRules {
    /// Reserves escape plus every toggle gesture.
    pub fn new<S: AsRef<str>>(toggle_gestures: &[S], grammar: GestureGrammar) -> Self {
        let reserved = std::iter::once(ESCAPE_GESTURE.to_string())
            .chain(toggle_gestures.iter().map(|g| normalize_gesture(g.as_ref())))
            .filter(|g| !g.is_empty())
            .collect();
        Self { reserved, grammar }
    }

    #[must_use]
    pub fn is_reserved(&self, gesture: &str) -> bool {
        self.reserved.contains(&normalize_gesture(gesture))
    }

    /// Normalizes `candidate` and checks it against the reserved set and grammar.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] for an empty gesture,
    /// [`ValidationError::ReservedGesture`] or [`ValidationError::InvalidGesture`].
    pub fn check_shortcut(&self, candidate: &str) -> Result<String, ValidationError> {
        let normalized = normalize_gesture(candidate);
        if normalized.is_empty() {
            return Err(ValidationError::MissingField);
        }
        if self.reserved.contains(&normalized) {
            return Err(ValidationError::ReservedGesture);
        }
        // Gestures are stored as keys of `key=value` lines.
        if normalized.contains('=') || !(self.grammar)(&format_for_display(&normalized)) {
            return Err(ValidationError::InvalidGesture);
        }
        Ok(normalized)
    }

    /// Fails if `gesture` is bound to an item other than `owner`.
    ///
    /// `bindings` maps lower-cased gestures to item names.
    ///
    /// # Errors
    ///
    /// [`ValidationError::GestureTaken`] on a collision.
    pub fn check_collision(
        &self,
        gesture: &str,
        owner: Option<&str>,
        bindings: &HashMap<String, String>,
    ) -> Result<(), ValidationError> {
        match bindings.get(&normalize_gesture(gesture)) {
            Some(holder) if owner != Some(holder.as_str()) => Err(ValidationError::GestureTaken),
            _ => Ok(()),
        }
    }

    /// Runs [`check_shortcut`](Self::check_shortcut) then
    /// [`check_collision`](Self::check_collision).
    ///
    /// # Errors
    ///
    /// The first rule the candidate breaks.
    pub fn check(
        &self,
        candidate: &str,
        owner: Option<&str>,
        bindings: &HashMap<String, String>,
    ) -> Result<String, ValidationError> {
        let normalized = self.check_shortcut(candidate)?;
        self.check_collision(&normalized, owner, bindings)?;
        Ok(normalized)
    }
}

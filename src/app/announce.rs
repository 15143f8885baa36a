//! Spoken announcements, worded per verbosity level.

use crate::domain::Verbosity;

/// Spoken when activation finds no items.
pub const NO_COMMANDS: &str = "No commands configured.";

/// Spoken at beginner verbosity for a gesture with no item.
pub const UNASSIGNED_GESTURE: &str = "This gesture has no command assigned.";

/// Tone played for a gesture with no item: (hertz, milliseconds).
pub const INVALID_KEY_TONE: (u32, u32) = (250, 50);

/// Announcement after entering instant mode with `loaded` items.
///
/// ```
/// use instant_access::app::announce::activated;
/// use instant_access::domain::Verbosity;
///
/// assert_eq!(activated(Verbosity::Beginner, 3), "instant Access On. 3 commands loaded");
/// assert_eq!(activated(Verbosity::Advanced, 3), "On");
/// ```
#[must_use]
pub fn activated(verbosity: Verbosity, loaded: usize) -> String {
    match verbosity {
        Verbosity::Beginner => format!("instant Access On. {loaded} commands loaded"),
        Verbosity::Advanced => "On".to_string(),
    }
}

/// Announcement after leaving instant mode through toggle or escape.
#[must_use]
pub fn deactivated(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Beginner => "instant Access Off",
        Verbosity::Advanced => "Off",
    }
}

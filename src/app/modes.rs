//! Instant mode state type.
//!
//! The controller is a two-state machine:
//!
//! ```text
//!            toggle (with items)
//!   Inactive ───────────────────▶ Active
//!      ▲  ▲                          │
//!      │  └──── toggle / escape ─────┤
//!      └──── any other gesture ──────┘  (after running it)
//! ```
//!
//! Activation with no configured items stays in `Inactive`.

/// Whether key gestures are currently reinterpreted as launch commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstantMode {
    /// Normal input handling. Only the toggle gesture is bound.
    #[default]
    Inactive,

    /// Item gestures, toggle and escape are bound; the next gesture is consumed
    /// and the mode reverts to `Inactive`.
    Active,
}

impl InstantMode {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

//! Application layer: the instant mode controller.
//!
//! This module sits between the plugin runtime ([`crate::plugin`]) and the
//! domain/storage/worker layers. It follows a unidirectional data flow:
//!
//! ```text
//! Host gesture → Event → Pipeline → handle_event → State mutation → Actions
//!                                                                     ↓
//!                                     Host bindings / speech / worker pool
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`announce`]: Spoken messages per verbosity
//! - [`bindings`]: Gesture binding sets installed in the host
//! - [`handler`]: Event processing and mode transitions
//! - [`host`]: Trait the screen reader implements
//! - [`modes`]: Instant mode state machine type
//! - [`pipeline`]: Middleware stages, including the single-shot exit
//! - [`state`]: Instant mode state container

pub mod actions;
pub mod announce;
pub mod bindings;
pub mod handler;
pub mod host;
pub mod modes;
pub mod pipeline;
pub mod state;

pub use actions::Action;
pub use bindings::{BindingSet, ScriptAction};
pub use handler::{handle_event, Event};
pub use host::Host;
pub use modes::InstantMode;
pub use pipeline::{Middleware, Pipeline, SingleShot, TraceStage};
pub use state::AppState;

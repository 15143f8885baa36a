//! Background launch pool.
//!
//! Items are launched off the main thread so a slow browser or program start
//! never delays gesture handling. Results come back as [`Feedback`] for the
//! main thread to speak.
//!
//! # Architecture
//!
//! - `messages`: Job and feedback types with trace context propagation
//! - `handler`: Per-type launch policy and the pool-side job processor
//! - `launcher`: Platform seam (`open` for URLs and paths, processes for programs)
//! - `pool`: Fixed set of threads fed by a channel

pub mod handler;
pub mod launcher;
pub mod messages;
pub mod pool;

pub use handler::{execute, LaunchWorker};
pub use launcher::{Launcher, ProgramLaunch, SystemLauncher};
pub use messages::{Feedback, TraceContext, WorkerMessage};
pub use pool::{LaunchPool, DEFAULT_WORKER_COUNT};

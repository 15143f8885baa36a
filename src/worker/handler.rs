//! Per-type launch policy, run on pool threads.
//!
//! [`execute`] never returns an error to its caller: every outcome the user
//! should hear is emitted as [`Feedback`], and every failure is reported once
//! and the launch is abandoned. Feedback is emitted as it happens, so the item
//! name reaches the user before a slow handler returns.

use crate::domain::{Item, ItemKind};
use crate::infrastructure::expand_path;
use crate::worker::launcher::{Launcher, ProgramLaunch};
use crate::worker::{Feedback, WorkerMessage};
use std::path::PathBuf;
use std::sync::Arc;

pub const URL_EMPTY: &str = "Error: URL is empty";
pub const WEBSITE_FAILED: &str = "Error: Could not open the website";
pub const NOT_FOUND: &str = "Error: File not found";
pub const FOLDER_FAILED: &str = "Error: Could not open the item";
pub const FILE_FAILED: &str = "Error: Could not open the file";
pub const PROGRAM_FAILED: &str = "Error: Could not start the program";

/// Launches `item`, passing the feedback to speak to `emit` in order.
///
/// The item's name is emitted before the launcher is called whenever it is
/// not blank.
pub fn execute(item: &Item, launcher: &dyn Launcher, emit: &mut dyn FnMut(Feedback)) {
    let name = item.name.trim();
    if !name.is_empty() {
        emit(Feedback::Announce(name.to_string()));
    }

    let outcome = match item.kind {
        ItemKind::Website => open_website(&item.path, launcher),
        ItemKind::Folder | ItemKind::File | ItemKind::Program => {
            open_local(item, launcher)
        }
    };
    if let Err(message) = outcome {
        emit(Feedback::Error(message.to_string()));
    }
}

/// Adds `https://` unless the URL already names http or https.
///
/// ```
/// use instant_access::worker::handler::with_scheme;
///
/// assert_eq!(with_scheme("example.com"), "https://example.com");
/// assert_eq!(with_scheme("HTTP://example.com"), "HTTP://example.com");
/// ```
#[must_use]
pub fn with_scheme(url: &str) -> String {
    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn open_website(path: &str, launcher: &dyn Launcher) -> Result<(), &'static str> {
    let url = path.trim();
    if url.is_empty() {
        return Err(URL_EMPTY);
    }
    let url = with_scheme(url);
    launcher.open_url(&url).map_err(|e| {
        tracing::debug!(%url, error = %e, "browser refused url");
        WEBSITE_FAILED
    })
}

fn open_local(item: &Item, launcher: &dyn Launcher) -> Result<(), &'static str> {
    let resolved = expand_path(&item.path);
    let path = PathBuf::from(&resolved);
    if resolved.is_empty() || !launcher.exists(&path) {
        tracing::debug!(path = %resolved, "launch target missing");
        return Err(NOT_FOUND);
    }

    let (result, failure) = match item.kind {
        ItemKind::Folder => (launcher.open_path(&path), FOLDER_FAILED),
        ItemKind::File => (launcher.open_path(&path), FILE_FAILED),
        ItemKind::Program | ItemKind::Website => (
            launcher.spawn_program(&ProgramLaunch::new(path.clone(), &item.arguments)),
            PROGRAM_FAILED,
        ),
    };
    result.map_err(|e| {
        tracing::debug!(path = %path.display(), kind = %item.kind, error = %e, "launch failed");
        failure
    })
}

/// Pool-side message processor.
#[derive(Clone)]
pub struct LaunchWorker {
    launcher: Arc<dyn Launcher>,
}

impl LaunchWorker {
    #[must_use]
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the launch.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Runs one job, passing its feedback to `emit` as it is produced.
    pub fn handle_message(&self, message: &WorkerMessage, emit: &mut dyn FnMut(Feedback)) {
        let _context_guard = Self::attach_parent_trace_context(message);

        let item = message.item();
        let span = tracing::debug_span!(
            "launch",
            origin = message.origin(),
            item = %item.name,
            kind = %item.kind
        );
        let _guard = span.entered();

        let mut failed = false;
        execute(item, self.launcher.as_ref(), &mut |feedback| {
            failed |= matches!(feedback, Feedback::Error(_));
            emit(feedback);
        });
        tracing::debug!(failed, "launch finished");
    }
}

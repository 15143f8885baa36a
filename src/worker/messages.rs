//! Worker pool message types for cross-thread communication.
//!
//! The main thread sends [`WorkerMessage`]s into the launch pool; pool threads
//! send [`Feedback`] back. Feedback is the only way a pool thread reaches the
//! user, since speech must be driven from the main thread.

use crate::domain::Item;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry so the launch
/// span on a pool thread is parented to the dispatch span that queued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is the case
    /// whenever no OpenTelemetry layer is installed.
    ///
    /// ```
    /// use instant_access::worker::TraceContext;
    ///
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    launch(Launch { item: Item }),
    test(Test { item: Item }),
}

/// Jobs sent from the main thread to the launch pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Launch an item chosen through an instant mode gesture.
    Launch {
        item: Item,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Launch an item from the settings list's test action.
    Test {
        item: Item,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn item(&self) -> &Item {
        match self {
            Self::Launch { item, .. } | Self::Test { item, .. } => item,
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Launch { trace_context, .. } | Self::Test { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }

    /// Where the job came from, for trace output.
    #[must_use]
    pub const fn origin(&self) -> &'static str {
        match self {
            Self::Launch { .. } => "gesture",
            Self::Test { .. } => "settings",
        }
    }
}

/// Messages sent from pool threads back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// The item's name, spoken just before it is launched.
    Announce(String),

    /// A launch failed; the text is spoken as is.
    Error(String),
}

impl Feedback {
    /// Text to hand to the host's speech output.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Announce(text) | Self::Error(text) => text,
        }
    }
}

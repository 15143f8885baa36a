//! OpenTelemetry tracing with file-based span export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → JSON lines
//! ```
//!
//! Spans are written to `<local data dir>/instant-access/instant-access-otlp.json`,
//! one OTLP/JSON document per line. The file rotates at 10 MB and the three
//! newest backups are kept.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `tracer`: Tracer provider with the file exporter
//! - `span_formatter`: OTLP/JSON encoding
//! - `file_writer`: Size-rotated file

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;

#![forbid(unsafe_code)]
//! Multiline codec for log shipping.
//!
//! Merges consecutive raw lines (each tagged with byte offsets and a line
//! number) into logical multi-line events such as stack traces before they
//! are forwarded downstream. It provides:
//! - [`MultilineConfig`]: a validated, shareable pattern/mode/timeout configuration.
//! - [`MultilineCodec`]: the per-stream accumulator with crash-safe checkpoint offsets.
//! - An optional idle-flush task driven by the previous timeout.

mod codec;
mod config;
mod deadline;
mod error;
mod event;
mod snapshot;

pub use codec::MultilineCodec;
pub use config::{MultilineConfig, MultilineSettings, What};
pub use error::ConfigError;
pub use event::{CodecEvent, EventSink, LineInput};
pub use snapshot::Snapshot;

//! Shared configuration for the concept interference tools: the environment
//! driven readout settings and the global tracing subscriber.

pub mod readout;
pub mod tracing;

pub use readout::{OutputFormat, ReadoutConfig};

//! Leveled logging to the console and any number of append-only files.
//!
//! A [`Logger`] owns a set of named targets, each with its own [`Level`].
//! The target named [`STD_TARGET`] writes to stdout (or stderr, past a
//! configurable severity); every other name is a file path.
//!
//! [`LogLayer`] plugs a shared logger into a `tracing` subscriber so that
//! diagnostics emitted by the other crates land in the same targets.

pub mod error;
pub mod layer;
pub mod level;
pub mod logger;

pub use error::{LogError, LogResult};
pub use layer::LogLayer;
pub use level::Level;
pub use logger::{LogTarget, Logger, STD_TARGET};

//! Key-value configuration files with declared defaults.
//!
//! A [`ConfigFile`] is opened with the full set of setting names it knows
//! about, each with a default value. Values present in the file win; any
//! declared setting missing from the file is filled with its default and the
//! file is rewritten, so a fresh install ends up with a complete, editable
//! config on disk.
//!
//! Files are flat TOML tables of scalar values:
//!
//! ```toml
//! # stash configuration
//! data_path = "data/notes.bin"
//! log_level = "info"
//! ```

pub mod error;
pub mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigEntry, ConfigFile};

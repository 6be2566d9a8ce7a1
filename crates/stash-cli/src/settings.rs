use std::path::{Path, PathBuf};

use anyhow::Context;
use stash_config::ConfigFile;
use stash_log::{Level, Logger, STD_TARGET};
use stash_store::StoreConfig;

use crate::note::NOTE;

const HEADER: &str = "stash configuration\nlog_file = \"\" disables file logging; stderr_level = \"off\" keeps the console on stdout";

pub const DATA_PATH: &str = "data_path";
pub const AUTO_PERSIST: &str = "auto_persist";
pub const LOG_LEVEL: &str = "log_level";
pub const LOG_FILE: &str = "log_file";
pub const STDERR_LEVEL: &str = "stderr_level";

const DEFAULTS: [(&str, &str); 5] = [
    (DATA_PATH, "data/notes.bin"),
    (AUTO_PERSIST, "false"),
    (LOG_LEVEL, "info"),
    (LOG_FILE, ""),
    (STDERR_LEVEL, "warn"),
];

/// Open the config file, writing any missing defaults.
pub fn open(path: &Path) -> anyhow::Result<ConfigFile> {
    ConfigFile::open(path, HEADER, DEFAULTS)
        .with_context(|| format!("failed to open config {}", path.display()))
}

/// Typed view of the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub auto_persist: bool,
    pub log_level: Level,
    pub log_file: Option<PathBuf>,
    pub stderr_level: Option<Level>,
}

impl Settings {
    pub fn from_config(config: &ConfigFile) -> anyhow::Result<Self> {
        let log_file = config.get(LOG_FILE)?.trim();
        let stderr_level = config.get(STDERR_LEVEL)?.trim();
        Ok(Self {
            data_path: PathBuf::from(config.get(DATA_PATH)?),
            auto_persist: config.get_parsed(AUTO_PERSIST)?,
            log_level: Level::parse(config.get(LOG_LEVEL)?),
            log_file: (!log_file.is_empty()).then(|| PathBuf::from(log_file)),
            stderr_level: match stderr_level {
                "" | "off" => None,
                name => Some(Level::parse(name)),
            },
        })
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(NOTE, &self.data_path).with_auto_persist(self.auto_persist)
    }

    /// Console logger, plus a file target when `log_file` is set.
    pub fn build_logger(&self, verbose: bool) -> anyhow::Result<Logger> {
        let level = if verbose { Level::Debug } else { self.log_level };
        let logger = Logger::new([STD_TARGET], level)?.with_stderr_threshold(self.stderr_level);
        if let Some(file) = &self.log_file {
            logger.add_target(file.to_string_lossy(), self.log_level)?;
        }
        Ok(logger)
    }
}

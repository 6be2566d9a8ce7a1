use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::record::Variant;

/// Construction parameters for an [`ObjectStore`](crate::ObjectStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The single record variant the store accepts.
    pub variant: Variant,
    /// Backing file. Parent directories are created on open.
    pub path: PathBuf,
    /// Save after every `set` and `remove`.
    #[serde(default)]
    pub auto_persist: bool,
    /// `fsync` the backing file at the end of every save.
    #[serde(default)]
    pub sync_on_save: bool,
}

impl StoreConfig {
    /// A config with auto-persist and sync both off.
    pub fn new(variant: impl Into<Variant>, path: impl Into<PathBuf>) -> Self {
        Self {
            variant: variant.into(),
            path: path.into(),
            auto_persist: false,
            sync_on_save: false,
        }
    }

    pub fn with_auto_persist(mut self, auto_persist: bool) -> Self {
        self.auto_persist = auto_persist;
        self
    }

    pub fn with_sync_on_save(mut self, sync_on_save: bool) -> Self {
        self.sync_on_save = sync_on_save;
        self
    }

    /// Check that the variant and path are set and usable.
    pub fn validate(&self) -> StoreResult<()> {
        if self.variant.is_empty() {
            return Err(StoreError::Configuration("variant tag is empty".into()));
        }
        if self.variant.as_str().len() > Variant::MAX_LEN {
            return Err(StoreError::Configuration(format!(
                "variant tag is {} bytes, max {}",
                self.variant.as_str().len(),
                Variant::MAX_LEN
            )));
        }
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::Configuration("backing path is empty".into()));
        }
        if self.path.is_dir() {
            return Err(StoreError::Configuration(format!(
                "backing path {} is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }
}

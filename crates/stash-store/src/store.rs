use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec::{BincodeCodec, Codec, Decoded};
use crate::config::StoreConfig;
use crate::error::{CodecError, StoreError, StoreResult};
use crate::record::{Record, Variant};

/// Keyed record store persisted to a single file.
///
/// Holds records of one configured [`Variant`], keyed by
/// [`Record::primary_id`]. Every record crossing the API boundary is deep
/// copied: `set` stores a copy of its argument and reads hand out copies, so
/// callers never alias the store's internal state.
///
/// Nothing is written until [`save`](Self::save) runs, either explicitly or
/// after each mutation when auto-persist is on. Dropping the store discards
/// unsaved changes.
///
/// The store assumes it is the only user of its backing file. It takes no
/// locks and is meant for a single owner calling it sequentially.
pub struct ObjectStore<V: Record, C: Codec<V> = BincodeCodec> {
    entries: HashMap<V::Id, V>,
    path: PathBuf,
    variant: Variant,
    auto_persist: bool,
    sync_on_save: bool,
    codec: C,
}

impl<V: Record> ObjectStore<V> {
    /// Open a bincode-backed store with auto-persist off.
    ///
    /// Creates missing parent directories and an empty backing file. Does
    /// not read the file; call [`load`](Self::load) for that.
    pub fn open(variant: impl Into<Variant>, path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_config(StoreConfig::new(variant, path))
    }

    /// Open a bincode-backed store from a full config.
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        Self::with_codec(config, BincodeCodec)
    }
}

impl<V: Record, C: Codec<V>> ObjectStore<V, C> {
    /// Open a store that frames records with `codec`.
    pub fn with_codec(config: StoreConfig, codec: C) -> StoreResult<Self> {
        config.validate()?;
        ensure_backing_file(&config.path)?;

        debug!(
            path = %config.path.display(),
            variant = %config.variant,
            auto_persist = config.auto_persist,
            "object store opened"
        );

        Ok(Self {
            entries: HashMap::new(),
            path: config.path,
            variant: config.variant,
            auto_persist: config.auto_persist,
            sync_on_save: config.sync_on_save,
            codec,
        })
    }

    /// Deep copies of every stored record, keyed as stored.
    pub fn get_all(&self) -> StoreResult<HashMap<V::Id, V>> {
        self.entries
            .iter()
            .map(|(id, record)| self.copy_checked(record).map(|copy| (id.clone(), copy)))
            .collect()
    }

    /// A deep copy of the record stored under `id`, or `None`.
    pub fn get(&self, id: &V::Id) -> StoreResult<Option<V>> {
        self.entries
            .get(id)
            .map(|record| self.copy_checked(record))
            .transpose()
    }

    /// Store a deep copy of `record` under its primary id, replacing any
    /// previous entry. Saves immediately when auto-persist is on; a failed
    /// save is returned to the caller.
    pub fn set(&mut self, record: &V) -> StoreResult<()> {
        let copy = self.admit(record)?;
        self.entries.insert(copy.primary_id(), copy);
        if self.auto_persist {
            self.save()?;
        }
        Ok(())
    }

    /// Delete the entry for `id`. Returns whether one existed; a missing id
    /// is not an error. Saves immediately when auto-persist is on.
    pub fn remove(&mut self, id: &V::Id) -> StoreResult<bool> {
        let existed = self.entries.remove(id).is_some();
        if self.auto_persist {
            self.save()?;
        }
        Ok(existed)
    }

    /// Rewrite the backing file with every current entry.
    ///
    /// All records are encoded before the file is touched, so an encode
    /// failure leaves the previous file intact. An I/O failure while writing
    /// can still leave it truncated or partially written: there is no
    /// write-to-temp-and-rename step. The in-memory entries are never
    /// modified by a save.
    pub fn save(&self) -> StoreResult<()> {
        let mut buf = Vec::new();
        for record in self.entries.values() {
            let frame = self.codec.encode(record).map_err(encode_error)?;
            buf.extend_from_slice(&frame);
        }

        let mut file = File::create(&self.path).map_err(|e| self.persistence(e))?;
        file.write_all(&buf).map_err(|e| self.persistence(e))?;
        if self.sync_on_save {
            file.sync_all().map_err(|e| self.persistence(e))?;
        }

        debug!(
            path = %self.path.display(),
            records = self.entries.len(),
            bytes = buf.len(),
            "object store saved"
        );
        Ok(())
    }

    /// Replace the in-memory entries with the contents of the backing file.
    ///
    /// All-or-nothing: on any failure the store is left empty. Records are
    /// admitted exactly as `set` would admit them, except that auto-persist
    /// does not fire. A stored record that fails [`Record::validate`] is a
    /// [`StoreError::Decode`] at its position in the file.
    pub fn load(&mut self) -> StoreResult<()> {
        self.entries.clear();
        match self.read_entries() {
            Ok(entries) => {
                debug!(
                    path = %self.path.display(),
                    records = entries.len(),
                    "object store loaded"
                );
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "load failed; store left empty");
                Err(e)
            }
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a record is stored under `id`.
    pub fn contains(&self, id: &V::Id) -> bool {
        self.entries.contains_key(id)
    }

    /// All stored ids, in no particular order.
    pub fn keys(&self) -> Vec<V::Id> {
        self.entries.keys().cloned().collect()
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The variant every stored record must carry.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Whether `set` and `remove` save immediately.
    pub fn auto_persist(&self) -> bool {
        self.auto_persist
    }

    /// Turn saving after each mutation on or off.
    pub fn set_auto_persist(&mut self, auto_persist: bool) {
        self.auto_persist = auto_persist;
    }

    fn read_entries(&self) -> StoreResult<HashMap<V::Id, V>> {
        let file = File::open(&self.path).map_err(|e| self.persistence(e))?;
        let mut reader = BufReader::new(file);
        let mut entries = HashMap::new();
        let mut index = 0;

        loop {
            let decoded = self
                .codec
                .decode_next(&mut reader, &self.variant)
                .map_err(|e| self.decode_error(e, index))?;
            match decoded {
                Decoded::EndOfStream => return Ok(entries),
                Decoded::Record(record) => {
                    record.validate().map_err(|reason| StoreError::Decode {
                        index,
                        reason: format!("invalid record: {reason}"),
                    })?;
                    let copy = self.admit(&record)?;
                    entries.insert(copy.primary_id(), copy);
                }
            }
            index += 1;
        }
    }

    /// Validate an incoming record and return the copy to keep.
    fn admit(&self, record: &V) -> StoreResult<V> {
        record.validate().map_err(StoreError::InvalidArgument)?;
        let found = record.variant();
        if found != self.variant {
            return Err(StoreError::TypeMismatch {
                expected: self.variant.clone(),
                found,
            });
        }
        self.copy_checked(record)
    }

    fn copy_checked(&self, record: &V) -> StoreResult<V> {
        let copy = record.deep_copy();
        let variant = record.variant();
        let copied = copy.variant();
        if copied != variant {
            return Err(StoreError::Integrity { variant, copied });
        }
        Ok(copy)
    }

    fn persistence(&self, source: std::io::Error) -> StoreError {
        StoreError::persistence(&self.path, source)
    }

    fn decode_error(&self, err: CodecError, index: usize) -> StoreError {
        match err {
            CodecError::Io(source) => self.persistence(source),
            CodecError::Foreign(found) => StoreError::TypeMismatch {
                expected: self.variant.clone(),
                found,
            },
            CodecError::Malformed(reason) | CodecError::Serialization(reason) => {
                StoreError::Decode { index, reason }
            }
        }
    }
}

impl<V: Record, C: Codec<V>> std::fmt::Debug for ObjectStore<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("path", &self.path)
            .field("variant", &self.variant)
            .field("auto_persist", &self.auto_persist)
            .field("record_count", &self.entries.len())
            .finish()
    }
}

fn encode_error(err: CodecError) -> StoreError {
    match err {
        CodecError::Serialization(msg) => StoreError::Encode(msg),
        other => StoreError::Encode(other.to_string()),
    }
}

/// Create parent directories and an empty backing file if they are missing.
fn ensure_backing_file(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::persistence(parent, e))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::persistence(path, e))?;
    Ok(())
}

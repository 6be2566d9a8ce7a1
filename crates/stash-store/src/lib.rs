//! Generic keyed record store with whole-file persistence.
//!
//! An [`ObjectStore`] holds records of a single configured [`Variant`],
//! keyed by each record's primary id, and persists the whole collection to
//! one backing file on [`ObjectStore::save`].
//!
//! # Design Rules
//!
//! 1. Every record crossing the API is deep copied, in both directions.
//! 2. Every stored record has the store's configured variant.
//! 3. `save` rewrites the entire file; there is no append or rename-swap.
//! 4. `load` is all-or-nothing: any failure leaves the store empty.
//! 5. Errors are returned to the caller, never swallowed or retried.
//!
//! # Codecs
//!
//! Records are framed by a [`Codec`]:
//!
//! - [`BincodeCodec`] -- length-prefixed, CRC-checked bincode frames (default)
//! - [`JsonLinesCodec`] -- one JSON object per line

pub mod codec;
pub mod config;
pub mod error;
pub mod record;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use codec::{BincodeCodec, Codec, Decoded, JsonLinesCodec};
pub use config::StoreConfig;
pub use error::{CodecError, StoreError, StoreResult};
pub use record::{Record, Variant};
pub use store::ObjectStore;

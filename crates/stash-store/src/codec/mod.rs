//! The encode/decode boundary between a store and its backing file.
//!
//! A backing file is a flat run of encoded records: no header, no count, no
//! footer. A codec turns one record into bytes and reads one record back,
//! reporting a clean end of data as [`Decoded::EndOfStream`] rather than as
//! an error.

mod framed;
mod json_lines;

use std::io::BufRead;

use crate::error::CodecError;
use crate::record::{Record, Variant};

pub use framed::BincodeCodec;
pub use json_lines::JsonLinesCodec;

/// Outcome of reading the next record from a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded<V> {
    /// One complete record was read and the stream advanced past it.
    Record(V),
    /// No further records remain.
    EndOfStream,
}

/// Serializes and deserializes single records.
///
/// `encode` must be deterministic: the same record always yields the same
/// bytes, so saving an unchanged store twice produces identical files.
pub trait Codec<V: Record> {
    /// Encode one record into a self-delimiting frame.
    fn encode(&self, record: &V) -> Result<Vec<u8>, CodecError>;

    /// Read exactly one frame from `reader`.
    ///
    /// `expected` is the variant the caller is collecting. Codecs that carry
    /// the variant in their framing return [`CodecError::Foreign`] as soon as
    /// they see a different tag, without decoding the body.
    fn decode_next<R: BufRead>(
        &self,
        reader: &mut R,
        expected: &Variant,
    ) -> Result<Decoded<V>, CodecError>;
}

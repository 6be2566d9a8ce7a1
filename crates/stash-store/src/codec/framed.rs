use std::io::{self, BufRead, Read};

use crate::codec::{Codec, Decoded};
use crate::error::CodecError;
use crate::record::{Record, Variant};

/// Header after the tag: 4 bytes body length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Largest body accepted on decode (64 MiB). Guards against allocating for a
/// corrupted length field.
const MAX_BODY_LEN: usize = 64 * 1024 * 1024;

/// Length-prefixed, CRC-checked bincode frames.
///
/// On-disk format of one record:
/// ```text
/// [1 byte: variant tag length]
/// [N bytes: variant tag (UTF-8)]
/// [4 bytes: body length (little-endian u32)]
/// [4 bytes: CRC32 of body (little-endian u32)]
/// [M bytes: body (bincode-serialized record)]
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl<V: Record> Codec<V> for BincodeCodec {
    fn encode(&self, record: &V) -> Result<Vec<u8>, CodecError> {
        let variant = record.variant();
        let tag = variant.as_str().as_bytes();
        if tag.len() > Variant::MAX_LEN {
            return Err(CodecError::Serialization(format!(
                "variant tag is {} bytes, max {}",
                tag.len(),
                Variant::MAX_LEN
            )));
        }

        let body =
            bincode::serialize(record).map_err(|e| CodecError::Serialization(e.to_string()))?;
        if body.len() > MAX_BODY_LEN {
            return Err(CodecError::Serialization(format!(
                "record body is {} bytes, max {MAX_BODY_LEN}",
                body.len()
            )));
        }

        let length = body.len() as u32;
        let crc = crc32fast::hash(&body);

        let mut buf = Vec::with_capacity(1 + tag.len() + HEADER_SIZE + body.len());
        buf.push(tag.len() as u8);
        buf.extend_from_slice(tag);
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&crc.to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    fn decode_next<R: BufRead>(
        &self,
        reader: &mut R,
        expected: &Variant,
    ) -> Result<Decoded<V>, CodecError> {
        // A frame boundary with nothing after it is the normal end of data.
        if reader.fill_buf()?.is_empty() {
            return Ok(Decoded::EndOfStream);
        }

        let mut tag_len = [0u8; 1];
        read_frame_part(reader, &mut tag_len, "variant tag length")?;
        let mut tag = vec![0u8; tag_len[0] as usize];
        read_frame_part(reader, &mut tag, "variant tag")?;
        let tag = String::from_utf8(tag)
            .map_err(|_| CodecError::Malformed("variant tag is not valid UTF-8".into()))?;
        let found = Variant::from(tag);
        if &found != expected {
            return Err(CodecError::Foreign(found));
        }

        let mut header = [0u8; HEADER_SIZE];
        read_frame_part(reader, &mut header, "frame header")?;
        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if length > MAX_BODY_LEN {
            return Err(CodecError::Malformed(format!(
                "body length {length} exceeds max {MAX_BODY_LEN}"
            )));
        }

        let mut body = vec![0u8; length];
        read_frame_part(reader, &mut body, "record body")?;

        let actual_crc = crc32fast::hash(&body);
        if actual_crc != expected_crc {
            return Err(CodecError::Malformed(format!(
                "CRC mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
            )));
        }

        let record =
            bincode::deserialize(&body).map_err(|e| CodecError::Malformed(e.to_string()))?;
        Ok(Decoded::Record(record))
    }
}

/// `read_exact`, reporting a short read as a truncated frame.
fn read_frame_part<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<(), CodecError> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(CodecError::Malformed(format!("truncated {what}")))
        }
        Err(e) => Err(e.into()),
    }
}

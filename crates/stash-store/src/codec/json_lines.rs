use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::codec::{Codec, Decoded};
use crate::error::CodecError;
use crate::record::{Record, Variant};

#[derive(Serialize)]
struct FrameOut<'a, V> {
    variant: Variant,
    record: &'a V,
}

#[derive(Deserialize)]
struct FrameIn {
    variant: Variant,
    record: serde_json::Value,
}

/// Newline-delimited JSON, one record per line:
///
/// ```text
/// {"variant":"note","record":{...}}
/// ```
///
/// Human-readable alternative to [`BincodeCodec`](crate::BincodeCodec).
/// Blank lines are skipped; end of input ends the stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLinesCodec;

impl<V: Record> Codec<V> for JsonLinesCodec {
    fn encode(&self, record: &V) -> Result<Vec<u8>, CodecError> {
        let frame = FrameOut {
            variant: record.variant(),
            record,
        };
        let mut line =
            serde_json::to_vec(&frame).map_err(|e| CodecError::Serialization(e.to_string()))?;
        line.push(b'\n');
        Ok(line)
    }

    fn decode_next<R: BufRead>(
        &self,
        reader: &mut R,
        expected: &Variant,
    ) -> Result<Decoded<V>, CodecError> {
        // Raw bytes, so invalid UTF-8 surfaces as malformed input rather than I/O.
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(Decoded::EndOfStream);
            }
            if !line.iter().all(u8::is_ascii_whitespace) {
                break;
            }
        }

        let frame: FrameIn =
            serde_json::from_slice(&line).map_err(|e| CodecError::Malformed(e.to_string()))?;
        if &frame.variant != expected {
            return Err(CodecError::Foreign(frame.variant));
        }
        let record =
            serde_json::from_value(frame.record).map_err(|e| CodecError::Malformed(e.to_string()))?;
        Ok(Decoded::Record(record))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::fixtures::{note, task, Item, NOTE};

    fn decode_all(text: &str) -> Result<Vec<Item>, CodecError> {
        let mut cursor = Cursor::new(text.as_bytes());
        let mut out = Vec::new();
        while let Decoded::Record(item) = JsonLinesCodec.decode_next(&mut cursor, &NOTE)? {
            out.push(item);
        }
        Ok(out)
    }

    #[test]
    fn encodes_one_line_per_record() {
        let bytes = Codec::<Item>::encode(&JsonLinesCodec, &note(1, "a")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.starts_with("{\"variant\":\"note\""));
    }

    #[test]
    fn decodes_lines_and_skips_blanks() {
        let mut text = String::new();
        for item in [note(1, "a"), note(2, "b")] {
            let bytes = Codec::<Item>::encode(&JsonLinesCodec, &item).unwrap();
            text.push_str(std::str::from_utf8(&bytes).unwrap());
            text.push('\n');
        }
        assert_eq!(decode_all(&text).unwrap(), vec![note(1, "a"), note(2, "b")]);
    }

    #[test]
    fn foreign_variant_is_reported() {
        let bytes = Codec::<Item>::encode(&JsonLinesCodec, &task(3)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        match decode_all(&text) {
            Err(CodecError::Foreign(found)) => assert_eq!(found.as_str(), "task"),
            other => panic!("expected Foreign, got {other:?}"),
        }
    }

    #[test]
    fn garbage_line_is_malformed() {
        assert!(matches!(
            decode_all("not json\n"),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let mut cursor = Cursor::new(&b"{\"variant\":\"note\",\"record\":\xff\xfe}\n"[..]);
        let result: Result<Decoded<Item>, _> = JsonLinesCodec.decode_next(&mut cursor, &NOTE);
        assert!(matches!(result, Err(CodecError::Malformed(_))));
    }

    #[test]
    fn missing_trailing_newline_still_decodes() {
        let text = r#"{"variant":"note","record":{"Note":{"id":4,"payload":"x"}}}"#;
        assert_eq!(decode_all(text).unwrap(), vec![note(4, "x")]);
    }
}

//! UTF-8 destripping — remove one accidental layer of UTF-8 double-encoding
//! from a byte string.
//!
//! A double-encoded record decodes (as UTF-8) to a string whose characters
//! all lie in U+0000–U+00FF; re-emitting each character as a single byte
//! recovers the original byte string.  Any character above U+00FF proves the
//! record was never double-encoded, and the operation fails with the exact
//! source byte offset.

use thiserror::Error;

/// Failure while destripping a record.  `offset` is the byte position in the
/// input at which decoding aborted, or at which the first character above
/// U+00FF begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("at position {offset}, {detail}")]
pub struct TranscodeError {
    pub offset: usize,
    pub detail: String,
}

/// Decode `input` strictly as UTF-8, verify every character lies in
/// U+0000–U+00FF, and re-encode one byte per character.  Pure; no I/O.
pub fn destrip(input: &[u8]) -> Result<Vec<u8>, TranscodeError> {
    let decoded = std::str::from_utf8(input).map_err(|err| TranscodeError {
        offset: err.valid_up_to(),
        detail: match err.error_len() {
            Some(len) => format!("invalid UTF-8 sequence of {len} byte(s)"),
            None => "incomplete UTF-8 sequence at end of input".to_string(),
        },
    })?;

    let mut output = Vec::with_capacity(input.len());
    for (offset, ch) in decoded.char_indices() {
        let code = u32::from(ch);
        if code > 0xFF {
            return Err(TranscodeError {
                offset,
                detail: format!("invalid encoding ({ch})"),
            });
        }
        output.push(code as u8);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(destrip(&[0x41, 0x42]).unwrap(), vec![0x41, 0x42]);
    }

    #[test]
    fn two_byte_sequences_collapse_to_one_byte() {
        // "é" encodes as C3 A9 and decodes to U+00E9.
        assert_eq!(destrip("é".as_bytes()).unwrap(), vec![0xE9]);
        // The full Latin-1 upper range survives.
        let doubled: String = (0x80u32..=0xFF)
            .map(|code| char::from_u32(code).unwrap())
            .collect();
        let expected: Vec<u8> = (0x80..=0xFF).collect();
        assert_eq!(destrip(doubled.as_bytes()).unwrap(), expected);
    }

    #[test]
    fn character_above_ff_reports_prefix_byte_length() {
        // 'a' (1 byte) + 'é' (2 bytes) + 'Ā' (U+0100) — fails at offset 3.
        let input = "aéĀ".as_bytes();
        let err = destrip(input).unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.detail, "invalid encoding (Ā)");
        assert_eq!(err.to_string(), "at position 3, invalid encoding (Ā)");
    }

    #[test]
    fn malformed_utf8_reports_decode_offset() {
        let err = destrip(&[0x41, 0x42, 0xC3]).unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn stray_continuation_byte_is_rejected() {
        let err = destrip(&[0x80]).unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(destrip(b"").unwrap(), Vec::<u8>::new());
    }
}

//! Header sniffing — read the leading NUL-terminated header string of a
//! container file without opening the whole container.
//!
//! Every container starts with its header text encoded as UTF-8 and
//! terminated by a single 0x00 byte.  The header identifies the container's
//! shape, so callers sniff it before deciding how to open the file.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Malformed header: file ended before the NUL terminator")]
    MissingTerminator,
    #[error("Malformed header: leading bytes are not valid UTF-8")]
    InvalidUtf8,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Read bytes from `reader` until a NUL byte and decode them as UTF-8.
/// The NUL terminator is consumed but excluded from the result.
pub fn read_header<R: Read>(reader: &mut R) -> Result<String, HeaderError> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(HeaderError::MissingTerminator);
        }
        if byte[0] == 0 {
            break;
        }
        bytes.push(byte[0]);
    }
    String::from_utf8(bytes).map_err(|_| HeaderError::InvalidUtf8)
}

/// Extract the header string from the file at `path`.
pub fn sniff_header<P: AsRef<Path>>(path: P) -> Result<String, HeaderError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_header(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_up_to_the_nul() {
        let mut cursor = Cursor::new(b"Indexed file v1\0trailing garbage".to_vec());
        assert_eq!(read_header(&mut cursor).unwrap(), "Indexed file v1");
    }

    #[test]
    fn missing_terminator_is_an_error() {
        let mut cursor = Cursor::new(b"no terminator here".to_vec());
        assert!(matches!(
            read_header(&mut cursor),
            Err(HeaderError::MissingTerminator)
        ));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut cursor = Cursor::new(vec![0xFF, 0xFE, 0x00]);
        assert!(matches!(
            read_header(&mut cursor),
            Err(HeaderError::InvalidUtf8)
        ));
    }
}

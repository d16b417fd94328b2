use std::io;
use thiserror::Error;

use crate::container::ContainerError;
use crate::destrip::TranscodeError;
use crate::header::HeaderError;

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.  All variants are terminal to the current action;
/// nothing is retried internally.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    /// A record failed UTF-8 destripping outside of any container context.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// A record failed UTF-8 destripping during a patch run, annotated with
    /// the offending record index.
    #[error("In record {record}, {source}")]
    RecordTranscode {
        record: u64,
        #[source]
        source: TranscodeError,
    },

    /// An implode directory listing violated the expected shape.
    #[error("{0}")]
    Validation(String),

    /// An output path that must not exist already exists.
    #[error("{0}")]
    Precondition(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_transcode_message_carries_index_and_offset() {
        let err = Error::RecordTranscode {
            record: 3,
            source: TranscodeError {
                offset: 5,
                detail: "invalid encoding (Ā)".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "In record 3, at position 5, invalid encoding (Ā)"
        );
    }
}

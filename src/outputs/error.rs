//! Errors raised while recording or reading action outputs.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures around the `GITHUB_OUTPUT` log.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Neither an explicit path nor `GITHUB_OUTPUT` was available.
    #[error("output file location is unknown: pass a path or set GITHUB_OUTPUT")]
    MissingLocation,

    /// The log could not be read or appended to.
    #[error("failed to access output file '{path}'")]
    Io {
        /// Path of the output log.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The generated delimiter occurs inside the record.
    #[error("output `{key}` contains the record delimiter {delimiter}")]
    DelimiterCollision {
        /// Output name being written.
        key: String,
        /// Delimiter that collided.
        delimiter: String,
    },
}

//! Error type shared by the ensemble, the snapshot codec and the run driver

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the two external boundaries of the ensemble:
/// the injected acceleration function and the snapshot sink.
#[derive(Debug, Error)]
pub enum Error {
    /// The acceleration function returned the wrong number of vectors
    #[error("acceleration function returned {actual} vectors for {expected} particles")]
    AccelLength { expected: usize, actual: usize },

    /// Construction inputs disagree on the particle count
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Snapshot sink could not be written or read
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes do not form a valid snapshot
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Particle count does not fit the 4-byte count field
    #[error("{0} particles do not fit in a snapshot count field")]
    TooManyParticles(usize),

    /// Stock acceleration law built from inconsistent parameters
    #[error("invalid acceleration law: {0}")]
    InvalidLaw(String),

    /// Run driver configuration rejected
    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

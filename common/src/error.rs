use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a socket or TUN operation.
///
/// Partial transfers are never reported here; they come back as plain byte counts.
#[derive(Debug, Error)]
pub enum Error {
    /// The native call returned a failure code; `source` carries the OS error.
    #[error("{op} failed: {source}")]
    Os {
        op: &'static str,
        #[source]
        source: io::Error,
    },
    /// `offset + length` does not fit the caller's buffer. Raised before any native call.
    #[error("range {offset}+{length} exceeds buffer of {capacity} bytes")]
    OutOfBounds {
        offset: usize,
        length: usize,
        capacity: usize,
    },
    /// A destination string that is neither an IP address nor a MAC address.
    #[error("invalid destination address '{0}'")]
    InvalidAddress(String),
    /// A whole-packet write that the OS accepted only partially.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

impl Error {
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Os { source, .. } => source.kind(),
            Error::OutOfBounds { .. } | Error::InvalidAddress(_) => io::ErrorKind::InvalidInput,
            Error::ShortWrite { .. } => io::ErrorKind::WriteZero,
        }
    }

    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Os { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Os { source, .. } => source,
            other => io::Error::new(other.kind(), other),
        }
    }
}

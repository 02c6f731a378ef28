//! Unified error type for the ringmote-lib crate.
//!
//! [`RingmoteError`] covers the contract violations surfaced synchronously
//! to callers (`OutOfRange`, `SizeMismatch`, `NotConnected`) and the
//! environmental failures the publish channel reports through its
//! diagnostics events (`Connection`, `Publish`). `From` impls allow `?`
//! to propagate across module boundaries seamlessly.

use std::fmt;

/// Unified error type for ringmote-lib operations.
#[derive(Debug)]
pub enum RingmoteError {
    /// LED index outside `[0, count)` passed to an addressed operation.
    OutOfRange { index: usize, count: usize },
    /// Palette length does not match the ring size.
    SizeMismatch { expected: usize, actual: usize },
    /// Transport-level connection failure (network, TLS, authentication).
    Connection(String),
    /// Transport rejected or could not deliver a message while connected.
    Publish(String),
    /// Publish attempted on a channel that is not connected.
    NotConnected,
    /// Configuration parsing or validation error.
    Config(String),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
}

impl fmt::Display for RingmoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingmoteError::OutOfRange { index, count } => {
                write!(f, "LED index {index} out of range (ring size {count})")
            }
            RingmoteError::SizeMismatch { expected, actual } => {
                write!(f, "Palette size mismatch: expected {expected} entries, got {actual}")
            }
            RingmoteError::Connection(e) => write!(f, "Connection failed: {e}"),
            RingmoteError::Publish(e) => write!(f, "Publish failed: {e}"),
            RingmoteError::NotConnected => write!(f, "Channel is not connected"),
            RingmoteError::Config(e) => write!(f, "Config error: {e}"),
            RingmoteError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for RingmoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RingmoteError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RingmoteError {
    fn from(e: std::io::Error) -> Self {
        RingmoteError::Io(e)
    }
}

/// Crate-level Result alias using [`RingmoteError`].
pub type Result<T> = std::result::Result<T, RingmoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_range() {
        let e = RingmoteError::OutOfRange { index: 24, count: 24 };
        assert_eq!(e.to_string(), "LED index 24 out of range (ring size 24)");
    }

    #[test]
    fn display_size_mismatch() {
        let e = RingmoteError::SizeMismatch { expected: 24, actual: 10 };
        assert_eq!(
            e.to_string(),
            "Palette size mismatch: expected 24 entries, got 10"
        );
    }

    #[test]
    fn display_not_connected() {
        assert_eq!(
            RingmoteError::NotConnected.to_string(),
            "Channel is not connected"
        );
    }

    #[test]
    fn display_connection_error() {
        let e = RingmoteError::Connection("broker unreachable".into());
        assert_eq!(e.to_string(), "Connection failed: broker unreachable");
    }

    #[test]
    fn display_config_error() {
        let e = RingmoteError::Config("bad scheme".into());
        assert_eq!(e.to_string(), "Config error: bad scheme");
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: RingmoteError = io_err.into();
        assert!(matches!(e, RingmoteError::Io(_)));
    }

    #[test]
    fn source_chains_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = RingmoteError::Io(io_err);
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn source_none_for_domain_variants() {
        let e = RingmoteError::NotConnected;
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_io() {
        fn inner() -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "nope"))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        let err = outer().unwrap_err();
        assert!(matches!(err, RingmoteError::Io(_)));
    }
}

//! Error types for the IEC 60870-5 protocol stack.

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// IEC 60870-5 protocol error kinds.
///
/// Encode-time errors (`CmdCause`, `NotAnyObjInfo`, `LengthOutOfRange`, ...)
/// are returned to the caller and never affect a running connection. Frame
/// and sequence errors are fatal to the connection that produced them.
///
/// Uses `Cow<'static, str>` to avoid allocations for static error messages.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown or unsupported type identification
    #[error("Unknown type identification: {0}")]
    TypeIdentifier(u8),

    /// Cause of transmission not admitted for the type/direction
    #[error("Cause of transmission not admitted for this type")]
    CmdCause,

    /// Build called with zero information objects
    #[error("No information objects")]
    NotAnyObjInfo,

    /// Encoded ASDU exceeds the 249-byte maximum
    #[error("ASDU length out of range")]
    LengthOutOfRange,

    /// Information object address does not fit the configured width
    #[error("Information object address exceeds address width")]
    InfoObjAddrFit,

    /// A build or parse routine was driven with a foreign type identification
    #[error("Type identification does not match this operation")]
    TypeIdNotMatch,

    /// Invalid system parameter widths
    #[error("Invalid params")]
    Param,

    /// Malformed ASDU (short payload, cursor overrun)
    #[error("Malformed ASDU: {0}")]
    Asdu(Cow<'static, str>),

    /// Malformed APCI frame; fatal, closes the connection
    #[error("Malformed frame: {0}")]
    Frame(Cow<'static, str>),

    /// I-frame send sequence number mismatch; fatal, closes the connection
    #[error("Sequence error: expected {expected}, got {actual}")]
    SeqError { expected: u16, actual: u16 },

    /// t1 fired on an outstanding acknowledgment; fatal, closes the connection
    #[error("Acknowledge timeout (t1)")]
    AckTimeout,

    /// t0 fired while establishing the TCP connection
    #[error("Connect timeout (t0)")]
    ConnectTimeout,

    /// k-window exhausted or send queue full; retry after the peer acknowledges
    #[error("Send window busy")]
    SendBusy,

    /// Submit attempted on a connection that is shutting down
    #[error("Connection closed")]
    ConnectionClosed,

    /// I/O error from the transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed-ASDU error with a static message (zero allocation).
    #[inline]
    pub const fn asdu_static(msg: &'static str) -> Self {
        Self::Asdu(Cow::Borrowed(msg))
    }

    /// Create a malformed-ASDU error with a dynamic message.
    #[inline]
    pub fn asdu(msg: impl Into<String>) -> Self {
        Self::Asdu(Cow::Owned(msg.into()))
    }

    /// Create a malformed-frame error with a static message (zero allocation).
    #[inline]
    pub const fn frame_static(msg: &'static str) -> Self {
        Self::Frame(Cow::Borrowed(msg))
    }

    /// Create a malformed-frame error with a dynamic message.
    #[inline]
    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame(Cow::Owned(msg.into()))
    }

    /// Check whether this error must close the connection that raised it.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Frame(_) | Self::SeqError { .. } | Self::AckTimeout | Self::Io(_)
        )
    }

    /// Check whether the operation may be retried after the peer acknowledges.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SendBusy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TypeIdentifier(255);
        assert_eq!(err.to_string(), "Unknown type identification: 255");

        let err = Error::SeqError {
            expected: 10,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Sequence error: expected 10, got 5");

        let err = Error::SendBusy;
        assert_eq!(err.to_string(), "Send window busy");
    }

    #[test]
    fn test_helper_constructors() {
        let err = Error::asdu("cursor overrun");
        assert!(err.to_string().contains("cursor overrun"));

        let err = Error::frame_static("bad start byte");
        assert!(err.to_string().contains("bad start byte"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::frame_static("x").is_fatal());
        assert!(Error::SeqError { expected: 0, actual: 1 }.is_fatal());
        assert!(Error::AckTimeout.is_fatal());

        // Encode-time errors never close a connection
        assert!(!Error::CmdCause.is_fatal());
        assert!(!Error::NotAnyObjInfo.is_fatal());
        assert!(!Error::LengthOutOfRange.is_fatal());
        assert!(!Error::InfoObjAddrFit.is_fatal());
        assert!(!Error::SendBusy.is_fatal());
        assert!(!Error::asdu_static("short").is_fatal());
    }

    #[test]
    fn test_retryable() {
        assert!(Error::SendBusy.is_retryable());
        assert!(!Error::CmdCause.is_retryable());
        assert!(!Error::ConnectionClosed.is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io::{Error as IoError, ErrorKind};
        let io_err = IoError::new(ErrorKind::ConnectionRefused, "refused");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_fatal());
    }
}

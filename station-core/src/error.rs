//! Error kinds for the observation pipeline (spec.md §7).
//!
//! Mirrors the teacher's `apc1-core::Error`: a flat `thiserror` enum per
//! component boundary, `Display` messages that read as operator-facing
//! diagnostics rather than Rust-internal detail.

/// Errors raised while encoding or decoding a framed-transport message (C1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The two `0x7E` delimiters were not found, or were found in the wrong order.
    #[error("frame delimiters not found")]
    Framing,
    /// A `0x7D` escape byte was the last byte of the frame, with nothing to escape.
    #[error("dangling escape byte at end of frame")]
    Stuffing,
    /// The checksum byte did not match the computed checksum.
    #[error("checksum mismatch")]
    Checksum,
    /// The device reported a nonzero status byte.
    #[error("device reported error status {0}")]
    Status(u8),
    /// The payload was shorter than the caller required.
    #[error("payload too short: need {need} bytes, got {got}")]
    PayloadTooShort { need: usize, got: usize },
}

/// Errors raised by the particulate sensor driver (C2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DriverError<TxError, RxError> {
    /// The underlying transport failed to write the request.
    #[error("transport write failed")]
    Write(TxError),
    /// The underlying transport failed to produce a complete response before its timeout.
    #[error("transport read timed out")]
    Timeout(RxError),
    /// A framed-transport codec error occurred while decoding the response.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    /// The measurement interval has not yet elapsed since `start_measurement`.
    #[error("measurement not yet ready")]
    NotReady,
    /// The serial number response was not valid ASCII.
    #[error("serial number was not valid ASCII")]
    InvalidSerial,
}

/// Errors raised while reading the external battery-backed clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("clock did not respond")]
    Unavailable,
}

/// Errors raised while reading an ambient temperature/humidity device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmbientError {
    #[error("ambient sensor hardware fault")]
    Hardware,
}

/// Errors surfaced by the persistence sink (§6.2). Always logged, never fatal:
/// the state machine treats every variant identically (§7, `PersistenceFailure`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to create directory")]
    Mkdir,
    #[error("failed to append to file")]
    Append,
}

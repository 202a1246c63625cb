//! The `error` module defines the [`ConvertError`] enum that describes the errors that
//! can occur when converting binary data into Intel HEX or Motorola S-Record files.
//! It contains two pieces of information:
//! 1. When the error occurs, i.e., while validating the configuration, while opening the
//!    output file or while writing records.
//! 2. What kind of error was encountered (via [`ConvertErrorKind`] enum).

use crate::record::RecordType;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Invalid conversion options. Detected before any I/O, no output is produced.
    ConfigurationError(ConvertErrorKind),
    /// Output file could not be opened. Nothing has been written.
    OutputError(ConvertErrorKind),
    /// Failure while building or writing records. The output file may be truncated.
    WriteError(ConvertErrorKind),
}

impl ConvertError {
    /// Returns the underlying cause of the error.
    #[must_use]
    pub const fn kind(&self) -> &ConvertErrorKind {
        match self {
            Self::ConfigurationError(kind) | Self::OutputError(kind) | Self::WriteError(kind) => {
                kind
            }
        }
    }

    pub(crate) fn write(err: &io::Error) -> Self {
        Self::WriteError(ConvertErrorKind::FailedToWrite(err.kind()))
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationError(base_err) => {
                write!(f, "Invalid conversion options: {base_err}")
            }
            Self::OutputError(base_err) => {
                write!(f, "Failed to open output: {base_err}")
            }
            Self::WriteError(base_err) => {
                write!(f, "Error encountered during conversion: {base_err}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertErrorKind {
    /// S-Record address width is not 16, 24 or 32 bits
    InvalidAddressWidth(u8),
    /// S-Record header does not fit into a single S0 record
    HeaderTooLong(usize),
    /// Data starting at the address does not fit into the address space
    AddressOverflow(u32, usize),
    /// Output file could not be created or truncated
    FailedToOpen(PathBuf, io::ErrorKind),
    /// Writing to the output failed
    FailedToWrite(io::ErrorKind),
    /// Record payload does not fit into the one byte length field
    RecordTooLong(usize),
    /// Record's payload length does not match the record type
    RecordLengthInvalidForType(RecordType, usize, usize),
}

impl fmt::Display for ConvertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddressWidth(bits) => {
                write!(
                    f,
                    "Invalid address size {bits}. Must be 16, 24, or 32 bits"
                )
            }
            Self::HeaderTooLong(len) => {
                write!(
                    f,
                    "Header of {len} bytes is too long, at most 252 bytes fit into a S0 record"
                )
            }
            Self::AddressOverflow(start, len) => {
                write!(
                    f,
                    "{len} bytes starting at 0x{start:08X} exceed the available address space"
                )
            }
            Self::FailedToOpen(path, kind) => {
                write!(f, "Failed to open output file {}: {kind}", path.display())
            }
            Self::FailedToWrite(kind) => {
                write!(f, "Failed to write output: {kind}")
            }
            Self::RecordTooLong(len) => {
                write!(f, "Record payload of {len} bytes exceeds 255 bytes")
            }
            Self::RecordLengthInvalidForType(rtype, expected, actual) => {
                write!(
                    f,
                    "For record type {rtype:?} expected data length is {expected} bytes, found {actual}"
                )
            }
        }
    }
}

impl Error for ConvertError {}
impl Error for ConvertErrorKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_returns_inner_error() {
        // Arrange
        let err = ConvertError::ConfigurationError(ConvertErrorKind::InvalidAddressWidth(20));

        // Act
        let kind = err.kind();

        // Assert
        assert_eq!(kind, &ConvertErrorKind::InvalidAddressWidth(20));
    }

    #[test]
    fn test_display_mentions_cause() {
        // Arrange
        let err = ConvertError::OutputError(ConvertErrorKind::FailedToOpen(
            PathBuf::from("missing/dir/out.hex"),
            io::ErrorKind::NotFound,
        ));

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.starts_with("Failed to open output"));
        assert!(msg.contains("missing/dir/out.hex"));
    }
}

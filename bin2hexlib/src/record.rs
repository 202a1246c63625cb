//! The `record` module defines the Intel HEX [`RecordType`] and the functions used to
//! generate Intel HEX record lines.

use crate::error::{ConvertError, ConvertErrorKind};
use crate::hexfmt;

/// Largest payload that fits into the one byte length field.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordType {
    Data = 0x0,
    EndOfFile = 0x1,
    ExtendedLinearAddress = 0x4,
}

impl RecordType {
    /// Payload length required by the record type, `None` if any length is allowed.
    const fn required_length(self) -> Option<usize> {
        match self {
            Self::Data => None,
            Self::EndOfFile => Some(0),
            Self::ExtendedLinearAddress => Some(2),
        }
    }
}

/// Calculate checksum from u8 array (two's complement of the truncated sum).
pub(crate) fn calculate_checksum(data: &[u8]) -> u8 {
    let mut sum: u8 = 0;
    for b in data {
        sum = sum.wrapping_add(*b);
    }
    (!sum).wrapping_add(1) // two's complement
}

/// Create the record string from address, type and data slice.
///
/// # Errors
/// - Returns an error if the payload does not fit into a record
/// - Returns an error if the payload length is invalid for the record type
///
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn create(address: u16, rtype: RecordType, data: &[u8]) -> Result<String, ConvertError> {
    let length = data.len();

    if length > MAX_PAYLOAD_SIZE {
        return Err(ConvertError::WriteError(ConvertErrorKind::RecordTooLong(
            length,
        )));
    }
    if let Some(expected) = rtype.required_length()
        && expected != length
    {
        return Err(ConvertError::WriteError(
            ConvertErrorKind::RecordLengthInvalidForType(rtype, expected, length),
        ));
    }

    // Header bytes: length, address (big endian), record type
    let [addr_high, addr_low] = address.to_be_bytes();
    let header = [length as u8, addr_high, addr_low, rtype as u8];

    let mut v = Vec::with_capacity(header.len() + length);
    v.extend_from_slice(&header);
    v.extend_from_slice(data);
    let checksum = calculate_checksum(&v);

    // ':' + (4 header bytes + payload + checksum) * 2 chars
    let mut record = String::with_capacity(1 + (header.len() + length + 1) * 2);
    record.push(':');
    hexfmt::push_bytes_hex(&mut record, &header);
    hexfmt::push_bytes_hex(&mut record, data);
    hexfmt::push_byte_hex(&mut record, checksum);

    Ok(record)
}

/// Create the Extended Linear Address record for the upper 16 bits of `address`.
pub(crate) fn create_extended_linear_address(address: u32) -> Result<String, ConvertError> {
    let [page_high, page_low, _, _] = address.to_be_bytes();
    create(0, RecordType::ExtendedLinearAddress, &[page_high, page_low])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse the hex digits of a record (without ':') into bytes
    fn record_bytes(record: &str) -> Vec<u8> {
        let digits = &record[1..];
        (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_calculate_checksum() {
        // Each tuple = (record line, expected checksum)
        let cases = [
            (":10010000214601360121470136007EFE09D2190140", 0x40),
            (":100110002146017E17C20001FF5F16002148011928", 0x28),
            (":00000001FF", 0xFF),
            (":020000040003F7", 0xF7),
        ];

        for (record, expected_checksum) in cases {
            // Strip information not used for checksum calculation
            let trimmed_record = &record[1..record.len() - 2];

            // Convert to byte Vec
            let bytes: Vec<u8> = (0..trimmed_record.len())
                .step_by(2)
                .map(|i| u8::from_str_radix(&trimmed_record[i..i + 2], 16).unwrap())
                .collect();

            assert_eq!(expected_checksum, calculate_checksum(&bytes));
        }
    }

    #[test]
    fn test_create_valid_records() {
        let data = [
            0x21, 0x46, 0x01, 0x36, 0x01, 0x21, 0x47, 0x01, 0x36, 0x00, 0x7E, 0xFE, 0x09, 0xD2,
            0x19, 0x01,
        ];
        assert_eq!(
            create(0x0100, RecordType::Data, &data).unwrap(),
            ":10010000214601360121470136007EFE09D2190140"
        );
        assert_eq!(
            create(0x0000, RecordType::Data, &[0x01, 0x02, 0x03, 0x04]).unwrap(),
            ":0400000001020304F2"
        );
        assert_eq!(
            create(0, RecordType::EndOfFile, &[]).unwrap(),
            ":00000001FF"
        );
        assert_eq!(
            create(0, RecordType::ExtendedLinearAddress, &[0x00, 0x03]).unwrap(),
            ":020000040003F7"
        );
    }

    #[test]
    fn test_create_checksum_sums_to_zero() {
        // Arrange
        let data: Vec<u8> = (0..=254).collect();

        // Act
        let record = create(0xFFFF, RecordType::Data, &data).unwrap();

        // Assert
        let sum = record_bytes(&record)
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_create_extended_linear_address() {
        assert_eq!(
            create_extended_linear_address(0x0001_0000).unwrap(),
            ":020000040001F9"
        );
        assert_eq!(
            create_extended_linear_address(0xFFFF_1234).unwrap(),
            ":02000004FFFFFC"
        );
    }

    #[test]
    fn test_create_invalid_records() {
        assert_eq!(
            create(0, RecordType::Data, &[0; 256]),
            Err(ConvertError::WriteError(ConvertErrorKind::RecordTooLong(256)))
        );
        assert_eq!(
            create(0, RecordType::EndOfFile, &[0x00]),
            Err(ConvertError::WriteError(
                ConvertErrorKind::RecordLengthInvalidForType(RecordType::EndOfFile, 0, 1)
            ))
        );
        assert_eq!(
            create(0, RecordType::ExtendedLinearAddress, &[0x00]),
            Err(ConvertError::WriteError(
                ConvertErrorKind::RecordLengthInvalidForType(
                    RecordType::ExtendedLinearAddress,
                    2,
                    1
                )
            ))
        );
    }
}

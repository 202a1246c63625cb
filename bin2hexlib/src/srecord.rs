//! The `srecord` module provides the [`SRecordEncoder`] struct, which segments a binary
//! buffer into Motorola S-Records.
//!
//! The output consists of:
//! 1. An optional S0 header record.
//! 2. Data records (S1, S2 or S3 depending on the address width).
//! 3. An S5 record count, if the count fits into 16 bits.
//! 4. An end record (S9, S8 or S7) carrying the start address.

use crate::error::{ConvertError, ConvertErrorKind};
use crate::hexfmt;
use crate::output;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest value of the one byte record length field.
const MAX_BYTE_COUNT: usize = u8::MAX as usize;

/// Largest payload of a record with a 16-bit address (255 - 2 address bytes - 1 checksum).
pub const MAX_PAYLOAD_SIZE: usize = MAX_BYTE_COUNT - 2 - 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    Bits16,
    Bits24,
    Bits32,
}

impl AddressWidth {
    /// Number of bytes in the address field.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits16 => 2,
            Self::Bits24 => 3,
            Self::Bits32 => 4,
        }
    }

    /// Highest address that fits into the address field.
    #[must_use]
    pub const fn max_address(self) -> u32 {
        match self {
            Self::Bits16 => 0xFFFF,
            Self::Bits24 => 0x00FF_FFFF,
            Self::Bits32 => u32::MAX,
        }
    }
}

impl TryFrom<u8> for AddressWidth {
    type Error = ConvertError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(Self::Bits16),
            24 => Ok(Self::Bits24),
            32 => Ok(Self::Bits32),
            _ => Err(ConvertError::ConfigurationError(
                ConvertErrorKind::InvalidAddressWidth(bits),
            )),
        }
    }
}

/// S-Record types. Each variant knows its address width.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SRecordType {
    /// S0
    Header,
    /// S1, S2 or S3
    Data(AddressWidth),
    /// S5
    Count16,
    /// S9, S8 or S7 (the width order is reversed compared to data records)
    End(AddressWidth),
}

impl SRecordType {
    /// The type digit following the 'S'.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::Header => 0,
            Self::Data(AddressWidth::Bits16) => 1,
            Self::Data(AddressWidth::Bits24) => 2,
            Self::Data(AddressWidth::Bits32) => 3,
            Self::Count16 => 5,
            Self::End(AddressWidth::Bits32) => 7,
            Self::End(AddressWidth::Bits24) => 8,
            Self::End(AddressWidth::Bits16) => 9,
        }
    }

    /// Width of the record's address field.
    #[must_use]
    pub const fn address_width(self) -> AddressWidth {
        match self {
            Self::Header | Self::Count16 => AddressWidth::Bits16,
            Self::Data(width) | Self::End(width) => width,
        }
    }

    /// Largest payload that keeps the byte count within one byte.
    #[must_use]
    pub const fn max_payload_size(self) -> usize {
        MAX_BYTE_COUNT - self.address_width().bytes() - 1
    }
}

/// Calculate checksum from u8 array (one's complement of the truncated sum).
pub(crate) fn calculate_checksum(data: &[u8]) -> u8 {
    let mut sum: u8 = 0;
    for b in data {
        sum = sum.wrapping_add(*b);
    }
    !sum
}

/// Create the record string from type, address and data slice.
/// Only as many low address bytes as the record type requires are emitted, big endian.
///
/// # Errors
/// Returns an error if the record's byte count would not fit into one byte.
///
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn create(rtype: SRecordType, address: u32, data: &[u8]) -> Result<String, ConvertError> {
    if data.len() > rtype.max_payload_size() {
        return Err(ConvertError::WriteError(ConvertErrorKind::RecordTooLong(
            data.len(),
        )));
    }

    let addr_len = rtype.address_width().bytes();
    let addr_bytes = &address.to_be_bytes()[4 - addr_len..];

    // Byte count covers address, data and checksum
    let byte_count = (addr_len + data.len() + 1) as u8;

    let mut v = Vec::with_capacity(1 + addr_len + data.len());
    v.push(byte_count);
    v.extend_from_slice(addr_bytes);
    v.extend_from_slice(data);
    let checksum = calculate_checksum(&v);

    // 'S' + digit + (byte count + address + payload + checksum) * 2 chars
    let mut record = String::with_capacity(2 + (v.len() + 1) * 2);
    record.push('S');
    record.push(char::from(b'0' + rtype.digit()));
    hexfmt::push_bytes_hex(&mut record, &v);
    hexfmt::push_byte_hex(&mut record, checksum);

    Ok(record)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SRecordEncoder {
    /// Maximum payload size for data records
    bytes_per_line: usize,
}

impl Default for SRecordEncoder {
    fn default() -> Self {
        Self::new(32)
    }
}

impl SRecordEncoder {
    /// Creates an encoder writing up to `bytes_per_line` data bytes per record.
    /// The value is clamped into `1..=252`.
    ///
    /// # Examples
    /// ```
    /// use bin2hexlib::SRecordEncoder;
    ///
    /// assert_eq!(SRecordEncoder::new(0).bytes_per_line(), 1);
    /// assert_eq!(SRecordEncoder::new(255).bytes_per_line(), 252);
    /// ```
    #[must_use]
    pub fn new(bytes_per_line: usize) -> Self {
        Self {
            bytes_per_line: bytes_per_line.clamp(1, MAX_PAYLOAD_SIZE),
        }
    }

    /// Maximum number of data bytes per record.
    #[must_use]
    pub const fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// Update the max payload size per record, clamped into `1..=252`.
    pub fn set_bytes_per_line(&mut self, bytes_per_line: usize) {
        self.bytes_per_line = bytes_per_line.clamp(1, MAX_PAYLOAD_SIZE);
    }

    /// Generates a Motorola S-Record file at the specified path and returns that path.
    ///
    /// `address_bits` selects the data record type (16 -> S1, 24 -> S2, 32 -> S3).
    /// A non-empty `header` is written as an S0 record.
    ///
    /// # Errors
    /// - Returns [`ConvertError::ConfigurationError`] for an address width other than 16, 24
    ///   or 32, a header longer than 252 bytes, or data not fitting the address width.
    ///   The output file is not touched.
    /// - Returns [`ConvertError::OutputError`] if the file cannot be opened, nothing is written
    /// - Returns [`ConvertError::WriteError`] if writing fails, the file may be left truncated
    ///
    /// # Example
    /// ```no_run
    /// use bin2hexlib::SRecordEncoder;
    ///
    /// let encoder = SRecordEncoder::new(16);
    /// let path = encoder
    ///     .convert(&[0x01, 0x02, 0x03], 0x8000, "build/fw.s19", 16, "fw")
    ///     .unwrap();
    ///
    /// assert!(path.exists());
    /// ```
    pub fn convert<P: AsRef<Path>>(
        &self,
        data: &[u8],
        start_address: u32,
        filepath: P,
        address_bits: u8,
        header: &str,
    ) -> Result<PathBuf, ConvertError> {
        let filepath = filepath.as_ref();

        // Reject before the output file is touched
        let width = AddressWidth::try_from(address_bits)?;
        check_options(data, start_address, width, header)?;

        output::write_file(filepath, |writer| {
            self.write_records(data, start_address, width, header, writer)
        })?;

        Ok(filepath.to_path_buf())
    }

    #[allow(clippy::cast_possible_truncation)]
    /// Writes all S-Records for `data` into `writer`, one record per line.
    ///
    /// # Errors
    /// Returns an error if the header or data do not fit, or if the writer fails.
    ///
    /// # Example
    /// ```
    /// use bin2hexlib::{AddressWidth, SRecordEncoder};
    ///
    /// let mut out = Vec::new();
    /// SRecordEncoder::new(4)
    ///     .write_records(&[0x01, 0x02, 0x03, 0x04], 0x0000, AddressWidth::Bits16, "", &mut out)
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "S107000001020304EE\nS50500010001F8\nS9030000FC\n"
    /// );
    /// ```
    pub fn write_records<W: Write>(
        &self,
        data: &[u8],
        start_address: u32,
        width: AddressWidth,
        header: &str,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        check_options(data, start_address, width, header)?;

        if !header.is_empty() {
            let record = create(SRecordType::Header, 0, header.as_bytes())?;
            output::write_line(writer, &record)?;
        }

        let data_type = SRecordType::Data(width);
        let chunk_max = self.bytes_per_line.min(data_type.max_payload_size());

        let mut current_address = start_address;
        let mut record_count: usize = 0;

        for chunk in data.chunks(chunk_max) {
            let record = create(data_type, current_address, chunk)?;
            output::write_line(writer, &record)?;

            current_address = current_address.wrapping_add(chunk.len() as u32);
            record_count += 1;
        }

        // Count goes into both the address field and the payload
        if let Ok(count) = u16::try_from(record_count) {
            let record = create(SRecordType::Count16, u32::from(count), &count.to_be_bytes())?;
            output::write_line(writer, &record)?;
        }

        let record = create(SRecordType::End(width), start_address, &[])?;
        output::write_line(writer, &record)
    }
}

/// Validates the header length and that all data is addressable with `width`.
fn check_options(
    data: &[u8],
    start_address: u32,
    width: AddressWidth,
    header: &str,
) -> Result<(), ConvertError> {
    if header.len() > SRecordType::Header.max_payload_size() {
        return Err(ConvertError::ConfigurationError(
            ConvertErrorKind::HeaderTooLong(header.len()),
        ));
    }

    let limit = u64::from(width.max_address()) + 1;
    let end = u64::from(start_address) + data.len() as u64;
    if start_address > width.max_address() || end > limit {
        return Err(ConvertError::ConfigurationError(
            ConvertErrorKind::AddressOverflow(start_address, data.len()),
        ));
    }
    Ok(())
}

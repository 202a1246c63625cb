//! The `intelhex` module provides the [`IntelHexEncoder`] struct, which segments a binary
//! buffer into Intel HEX data records.
//!
//! Data records never cross a 64KB page, since their address field is only 16 bits wide.
//! With extended linear addressing enabled, an Extended Linear Address record is emitted
//! before the first data record of every page. The output is terminated by an End Of File
//! record.

use crate::error::{ConvertError, ConvertErrorKind};
use crate::output;
use crate::record::{self, MAX_PAYLOAD_SIZE, RecordType};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Size of the address range covered by a single 16-bit data record address.
const PAGE_SIZE: usize = 0x1_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntelHexEncoder {
    /// Maximum payload size for data records
    bytes_per_line: usize,
}

impl Default for IntelHexEncoder {
    fn default() -> Self {
        Self::new(32)
    }
}

impl IntelHexEncoder {
    /// Creates an encoder writing up to `bytes_per_line` data bytes per record.
    /// The value is clamped into `1..=255`.
    ///
    /// # Examples
    /// ```
    /// use bin2hexlib::IntelHexEncoder;
    ///
    /// assert_eq!(IntelHexEncoder::new(0).bytes_per_line(), 1);
    /// assert_eq!(IntelHexEncoder::new(1000).bytes_per_line(), 255);
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

    /// Update the max payload size per record, clamped into `1..=255`.
    pub fn set_bytes_per_line(&mut self, bytes_per_line: usize) {
        self.bytes_per_line = bytes_per_line.clamp(1, MAX_PAYLOAD_SIZE);
    }

    /// Generates an Intel HEX file at the specified path and returns that path.
    ///
    /// # Errors
    /// - Returns [`ConvertError::ConfigurationError`] if the data does not fit below 4 GB
    /// - Returns [`ConvertError::OutputError`] if the file cannot be opened, nothing is written
    /// - Returns [`ConvertError::WriteError`] if writing fails, the file may be left truncated
    ///
    /// # Example
    /// ```no_run
    /// use bin2hexlib::IntelHexEncoder;
    ///
    /// let encoder = IntelHexEncoder::new(16);
    /// let path = encoder.convert(&[0x01, 0x02, 0x03], 0x8000, "build/fw.hex", true).unwrap();
    ///
    /// assert!(path.exists());
    /// ```
    pub fn convert<P: AsRef<Path>>(
        &self,
        data: &[u8],
        start_address: u32,
        filepath: P,
        use_extended_addressing: bool,
    ) -> Result<PathBuf, ConvertError> {
        let filepath = filepath.as_ref();

        // Reject before the output file is touched
        check_address_space(data, start_address)?;

        output::write_file(filepath, |writer| {
            self.write_records(data, start_address, use_extended_addressing, writer)
        })?;

        Ok(filepath.to_path_buf())
    }

    #[allow(clippy::cast_possible_truncation)]
    /// Writes all Intel HEX records for `data` into `writer`, one record per line.
    ///
    /// # Errors
    /// Returns an error if the data does not fit below 4 GB or if the writer fails.
    ///
    /// # Example
    /// ```
    /// use bin2hexlib::IntelHexEncoder;
    ///
    /// let mut out = Vec::new();
    /// IntelHexEncoder::new(4)
    ///     .write_records(&[0x01, 0x02, 0x03, 0x04], 0x0000, true, &mut out)
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     ":020000040000FA\n:0400000001020304F2\n:00000001FF\n"
    /// );
    /// ```
    pub fn write_records<W: Write>(
        &self,
        data: &[u8],
        start_address: u32,
        use_extended_addressing: bool,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        check_address_space(data, start_address)?;

        let mut current_address = start_address;
        let mut active_page: Option<u16> = None;
        let mut offset = 0;

        while offset < data.len() {
            let page = (current_address >> 16) as u16;
            let low_addr = (current_address & 0xFFFF) as u16;

            // Entered a new 64KB page -> emit ELA
            if use_extended_addressing && active_page != Some(page) {
                let record = record::create_extended_linear_address(current_address)?;
                output::write_line(writer, &record)?;
                active_page = Some(page);
            }

            // Record must not wrap past 0xFFFF
            let to_boundary = PAGE_SIZE - usize::from(low_addr);
            let chunk_len = self
                .bytes_per_line
                .min(data.len() - offset)
                .min(to_boundary);

            let record = record::create(
                low_addr,
                RecordType::Data,
                &data[offset..offset + chunk_len],
            )?;
            output::write_line(writer, &record)?;

            offset += chunk_len;
            current_address = current_address.wrapping_add(chunk_len as u32);
        }

        let record = record::create(0, RecordType::EndOfFile, &[])?;
        output::write_line(writer, &record)
    }
}

/// Checks that the last data byte is addressable with 32 bits.
fn check_address_space(data: &[u8], start_address: u32) -> Result<(), ConvertError> {
    let end = u64::from(start_address) + data.len() as u64;
    if end > 1 << 32 {
        return Err(ConvertError::ConfigurationError(
            ConvertErrorKind::AddressOverflow(start_address, data.len()),
        ));
    }
    Ok(())
}

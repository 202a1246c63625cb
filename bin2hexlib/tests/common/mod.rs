//! Minimal independent decoders used to verify the generated files.

#![allow(dead_code)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Returns a fresh output path under the cargo test tmp directory.
pub fn out_path(dir: &str, name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(dir);
    std::fs::create_dir_all(&dir).expect("Failed to create test output directory");
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

/// Converts the hex digits of a record into bytes.
pub fn hex_bytes(digits: &str) -> Vec<u8> {
    assert_eq!(digits.len() % 2, 0, "odd number of hex digits: {digits}");
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).expect("invalid hex digit"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IhexRecord {
    pub address: u16,
    pub rtype: u8,
    pub data: Vec<u8>,
}

/// Parses one Intel HEX line and validates its length and checksum.
pub fn parse_ihex_record(line: &str) -> IhexRecord {
    let digits = line.strip_prefix(':').expect("missing start code");
    let bytes = hex_bytes(digits);
    assert!(bytes.len() >= 5, "record too short: {line}");

    let length = bytes[0] as usize;
    assert_eq!(bytes.len(), length + 5, "length mismatch: {line}");

    let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    assert_eq!(sum, 0, "checksum mismatch: {line}");

    IhexRecord {
        address: u16::from_be_bytes([bytes[1], bytes[2]]),
        rtype: bytes[3],
        data: bytes[4..4 + length].to_vec(),
    }
}

/// Decodes an Intel HEX file into an address -> byte map.
pub fn decode_ihex(text: &str) -> BTreeMap<u32, u8> {
    let mut map = BTreeMap::new();
    let mut offset: u32 = 0;
    let mut seen_eof = false;

    for line in text.lines() {
        assert!(!seen_eof, "record after EOF: {line}");
        let record = parse_ihex_record(line);
        match record.rtype {
            0x00 => {
                for (i, byte) in record.data.iter().enumerate() {
                    let addr = offset + u32::from(record.address) + i as u32;
                    assert!(map.insert(addr, *byte).is_none(), "overlap at {addr:#X}");
                }
            }
            0x01 => seen_eof = true,
            0x04 => {
                offset = u32::from(u16::from_be_bytes([record.data[0], record.data[1]])) << 16;
            }
            other => panic!("unexpected record type {other:#04X}"),
        }
    }
    assert!(seen_eof, "missing EOF record");
    map
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SRecord {
    pub digit: u8,
    pub address: u32,
    pub data: Vec<u8>,
}

/// Parses one S-Record line and validates its byte count and checksum.
pub fn parse_srecord(line: &str) -> SRecord {
    let rest = line.strip_prefix('S').expect("missing 'S'");
    let digit = rest[..1].parse::<u8>().expect("invalid type digit");
    let bytes = hex_bytes(&rest[1..]);

    let byte_count = bytes[0] as usize;
    assert_eq!(bytes.len(), byte_count + 1, "byte count mismatch: {line}");

    let sum = bytes[..bytes.len() - 1]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    assert_eq!(!sum, bytes[bytes.len() - 1], "checksum mismatch: {line}");

    let addr_len = match digit {
        0 | 1 | 5 | 9 => 2,
        2 | 8 => 3,
        3 | 7 => 4,
        other => panic!("unexpected record type S{other}"),
    };
    let address = bytes[1..=addr_len]
        .iter()
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));

    SRecord {
        digit,
        address,
        data: bytes[1 + addr_len..bytes.len() - 1].to_vec(),
    }
}

/// Decodes the data records of an S-Record file into an address -> byte map.
pub fn decode_srec(text: &str) -> BTreeMap<u32, u8> {
    let mut map = BTreeMap::new();
    for record in text.lines().map(parse_srecord) {
        if (1..=3).contains(&record.digit) {
            for (i, byte) in record.data.iter().enumerate() {
                let addr = record.address + i as u32;
                assert!(map.insert(addr, *byte).is_none(), "overlap at {addr:#X}");
            }
        }
    }
    map
}

/// Builds the expected address -> byte map for `data` placed at `start`.
pub fn expected_map(data: &[u8], start: u32) -> BTreeMap<u32, u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| (start + i as u32, *b))
        .collect()
}

//! # `bin2hexlib`
//!
//! `bin2hexlib` is a Rust library for converting raw binary data into the textual record
//! formats used to program embedded devices.
//!
//! The library provides:
//! - Intel HEX generation (via [`IntelHexEncoder`] struct).
//! - Motorola S-Record generation (via [`SRecordEncoder`] struct).
//! - Error handling with [`ConvertError`].
//! - Fixed-width uppercase hex formatting helpers (via [`hexfmt`] module).
//!
//! ## Example
//!
//! ```no_run
//! use bin2hexlib::{IntelHexEncoder, SRecordEncoder};
//!
//! let data = std::fs::read("firmware.bin").unwrap();
//!
//! IntelHexEncoder::new(16).convert(&data, 0x0800_0000, "firmware.hex", true).unwrap();
//! SRecordEncoder::new(32).convert(&data, 0x0800_0000, "firmware.s37", 32, "firmware").unwrap();
//! ```

mod error;
pub mod hexfmt;
mod intelhex;
mod output;
mod record;
mod srecord;

// Public APIs
pub use error::{ConvertError, ConvertErrorKind};
pub use intelhex::IntelHexEncoder;
pub use record::RecordType;
pub use srecord::{AddressWidth, SRecordEncoder, SRecordType};

//! The `hexfmt` module turns bytes, words and double words into fixed-width uppercase
//! hexadecimal text, most significant byte first.

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Converts a byte into two uppercase hex characters.
///
/// # Example
/// ```
/// use bin2hexlib::hexfmt;
///
/// assert_eq!(hexfmt::byte_to_hex(0x0A), "0A");
/// ```
#[must_use]
pub fn byte_to_hex(value: u8) -> String {
    let mut s = String::with_capacity(2);
    push_byte_hex(&mut s, value);
    s
}

/// Converts a 16-bit word into four uppercase hex characters.
///
/// # Example
/// ```
/// use bin2hexlib::hexfmt;
///
/// assert_eq!(hexfmt::word_to_hex(0x00FF), "00FF");
/// ```
#[must_use]
pub fn word_to_hex(value: u16) -> String {
    let mut s = String::with_capacity(4);
    push_bytes_hex(&mut s, &value.to_be_bytes());
    s
}

/// Converts a 32-bit value into eight uppercase hex characters.
///
/// # Example
/// ```
/// use bin2hexlib::hexfmt;
///
/// assert_eq!(hexfmt::dword_to_hex(0x0001_C23F), "0001C23F");
/// ```
#[must_use]
pub fn dword_to_hex(value: u32) -> String {
    let mut s = String::with_capacity(8);
    push_bytes_hex(&mut s, &value.to_be_bytes());
    s
}

/// Appends two hex characters for `value` to `out`.
pub fn push_byte_hex(out: &mut String, value: u8) {
    out.push(char::from(HEX_DIGITS[usize::from(value >> 4)]));
    out.push(char::from(HEX_DIGITS[usize::from(value & 0x0F)]));
}

/// Appends two hex characters per byte of `bytes` to `out`.
pub fn push_bytes_hex(out: &mut String, bytes: &[u8]) {
    out.reserve(bytes.len() * 2);
    for b in bytes {
        push_byte_hex(out, *b);
    }
}

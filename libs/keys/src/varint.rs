//! Unsigned LEB128 varint encoding for 32-bit integers.
//!
//! Seven data bits per byte, MSB is the continuation bit, least-significant
//! group first. The 32-bit big-endian integer feeding the encoder and the
//! little-endian group order of the varint itself are easy to conflate;
//! they are different and both deliberate.

use crate::error::KeyError;

/// Maximum encoded length of a u32 varint.
pub const MAX_VARINT32_LEN: usize = 5;

/// Encodes `value` into `buf`, returning the number of bytes written.
pub fn encode_u32(mut value: u32, buf: &mut [u8; MAX_VARINT32_LEN]) -> usize {
    let mut i = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf[i] = byte;
            return i + 1;
        }
        buf[i] = byte | 0x80;
        i += 1;
    }
}

/// Encodes `value` into a fresh vector.
#[must_use]
pub fn encode_u32_vec(value: u32) -> Vec<u8> {
    let mut buf = [0u8; MAX_VARINT32_LEN];
    let n = encode_u32(value, &mut buf);
    buf[..n].to_vec()
}

/// Decodes a u32 varint from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed. Truncated input and
/// encodings that overflow 32 bits are [`KeyError::InvalidEncoding`].
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize), KeyError> {
    let mut value: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT32_LEN) {
        let group = u32::from(byte & 0x7f);
        // The fifth byte may only carry the top 4 bits of a u32.
        if i == MAX_VARINT32_LEN - 1 && byte & 0xf0 != 0 {
            return Err(KeyError::invalid_encoding("varint overflows 32 bits"));
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(KeyError::invalid_encoding("truncated varint"))
}

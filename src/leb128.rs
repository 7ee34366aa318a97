//! ULEB128 / SLEB128 variable-length integer codec.
//!
//! See: <https://source.android.com/docs/core/runtime/dex-format#leb128>

use winnow::binary::u8;
use winnow::error::ErrMode;
use winnow::prelude::*;

/// Read an unsigned LEB128 value from the front of `input`, advancing it past
/// the bytes consumed.
pub fn read_uleb128(input: &mut &[u8]) -> ModalResult<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;

    loop {
        let byte = u8.parse_next(input)?;
        let group = (byte & 0x7f) as u64;

        value |= group
            .checked_shl(shift)
            .ok_or_else(|| ErrMode::Cut(winnow::error::ContextError::new()))?;

        if byte & 0x80 == 0 {
            break;
        }

        shift += 7;
    }

    Ok(value)
}

/// Read a signed LEB128 value from the front of `input`, advancing it past
/// the bytes consumed.
pub fn read_sleb128(input: &mut &[u8]) -> ModalResult<i64> {
    let mut value = 0i64;
    let mut shift = 0u32;
    let mut byte;

    loop {
        byte = u8.parse_next(input)?;
        let group = (byte & 0x7f) as i64;

        value |= group
            .checked_shl(shift)
            .ok_or_else(|| ErrMode::Cut(winnow::error::ContextError::new()))?;
        shift += 7;

        if byte & 0x80 == 0 {
            break;
        }
    }

    // sign-extend from the last group read
    if shift < 64 && (byte & 0x40) != 0 {
        value |= -1i64 << shift;
    }

    Ok(value)
}

/// Number of bytes `write_uleb128` would emit for `value`.
pub fn sizeof_uleb128(value: u64) -> usize {
    let mut value = value;
    let mut size = 0usize;

    loop {
        size += 1;
        value >>= 7;

        if value == 0 {
            break;
        }
    }

    size
}

/// Number of bytes `write_sleb128` would emit for `value`.
pub fn sizeof_sleb128(value: i64) -> usize {
    let mut size = 0usize;

    if value >= 0 {
        let mut value = value;

        while value > 0x3f {
            size += 1;
            value >>= 7;
        }

        size + 1
    } else {
        let mut value = value;

        while value < -0x40 {
            size += 1;
            value >>= 7;
        }

        size + 1
    }
}

/// Append `value` to `out` as an unsigned LEB128 value, returning the number
/// of bytes written.
pub fn write_uleb128(out: &mut Vec<u8>, value: u64) -> usize {
    let mut value = value;
    let start = out.len();

    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80;
        }

        out.push(byte);

        if value == 0 {
            break;
        }
    }

    out.len() - start
}

/// Append `value` to `out` as a signed LEB128 value, returning the number of
/// bytes written.
pub fn write_sleb128(out: &mut Vec<u8>, value: i64) -> usize {
    let mut value = value;
    let start = out.len();
    let mut more = true;

    while more {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;

        let sign_bit_set = byte & 0x40 != 0;
        if (value == 0 && !sign_bit_set) || (value == -1 && sign_bit_set) {
            more = false;
        } else {
            byte |= 0x80;
        }

        out.push(byte);
    }

    out.len() - start
}

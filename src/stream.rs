//! A cursor over an immutable byte slice with typed, byte-order-aware reads.
//!
//! The pool resolution engine (`crate::pool`) needs to jump around a DEX
//! file by absolute offset — seek to `string_ids_off + i*4`, read an entry,
//! seek somewhere else entirely for the next pool — which doesn't fit
//! `winnow`'s usual "consume the front of a `&mut &[u8]`" style of parsing.
//! `ByteStream` is a thin, stateful wrapper that still delegates each typed
//! read to the same `winnow` binary parsers the rest of this codebase's
//! readers use, just re-sliced from an absolute position every time.

use winnow::binary::{be_f32, be_f64, be_i16, be_i32, be_i64, be_u16, be_u32, be_u64};
use winnow::binary::{le_f32, le_f64, le_i16, le_i32, le_i64, le_u16, le_u32, le_u64};
use winnow::binary::{i8 as winnow_i8, u8 as winnow_u8};
use winnow::prelude::*;
use winnow::token::take;

use crate::errors::DexError;
use crate::leb128;

/// Byte order a [`ByteStream`] uses for its multi-byte reads.
///
/// DEX files default to little-endian; a header whose `endian_tag` is
/// `0x12345678` flips every subsequent multi-byte read to big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// A cursor over a borrowed byte slice.
///
/// Cloning a `ByteStream` is a cheap copy of `(pos, order)` — the
/// underlying slice is shared, never duplicated — which is what lets the
/// pool engine snapshot a cursor before a speculative read and restore it
/// afterwards without disturbing the caller's own position.
#[derive(Debug, Clone, Copy)]
pub struct ByteStream<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

macro_rules! read_uint {
    ($name:ident, $ty:ty, $le:expr, $be:expr) => {
        pub fn $name(&mut self) -> Result<$ty, DexError> {
            let order = self.order;
            self.read_with(|input| match order {
                ByteOrder::Little => $le.parse_next(input),
                ByteOrder::Big => $be.parse_next(input),
            })
        }
    };
}

impl<'a> ByteStream<'a> {
    /// Build a stream over `data` starting at offset 0, little-endian.
    pub fn new(data: &'a [u8]) -> Self {
        ByteStream {
            data,
            pos: 0,
            order: ByteOrder::Little,
        }
    }

    /// Current byte order used for multi-byte reads.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Switch the byte order used for subsequent multi-byte reads.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Current absolute position.
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute position. Does not validate that the
    /// position is in bounds; the next read will fail with
    /// [`DexError::EndOfStream`] if it is not.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn read_with<T>(
        &mut self,
        f: impl FnOnce(&mut &'a [u8]) -> ModalResult<T>,
    ) -> Result<T, DexError> {
        let mut slice = self.data.get(self.pos..).ok_or(DexError::EndOfStream)?;
        let before = slice.len();

        let value = f(&mut slice).map_err(|_| DexError::EndOfStream)?;

        let consumed = before - slice.len();
        self.pos += consumed;

        Ok(value)
    }

    /// Read `n` raw bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DexError> {
        self.read_with(|input| take(n).parse_next(input))
    }

    pub fn read_u8(&mut self) -> Result<u8, DexError> {
        self.read_with(|input| winnow_u8.parse_next(input))
    }

    pub fn read_i8(&mut self) -> Result<i8, DexError> {
        self.read_with(|input| winnow_i8.parse_next(input))
    }

    read_uint!(read_u16, u16, le_u16, be_u16);
    read_uint!(read_u32, u32, le_u32, be_u32);
    read_uint!(read_u64, u64, le_u64, be_u64);
    read_uint!(read_i16, i16, le_i16, be_i16);
    read_uint!(read_i32, i32, le_i32, be_i32);
    read_uint!(read_i64, i64, le_i64, be_i64);

    pub fn read_float32(&mut self) -> Result<f32, DexError> {
        let order = self.order;
        self.read_with(|input| match order {
            ByteOrder::Little => le_f32.parse_next(input),
            ByteOrder::Big => be_f32.parse_next(input),
        })
    }

    pub fn read_float64(&mut self) -> Result<f64, DexError> {
        let order = self.order;
        self.read_with(|input| match order {
            ByteOrder::Little => le_f64.parse_next(input),
            ByteOrder::Big => be_f64.parse_next(input),
        })
    }

    /// Read an unsigned LEB128 value, advancing the cursor past it.
    pub fn read_uleb128(&mut self) -> Result<u64, DexError> {
        self.read_with(|input| leb128::read_uleb128(input))
    }

    /// Read a signed LEB128 value, advancing the cursor past it.
    pub fn read_sleb128(&mut self) -> Result<i64, DexError> {
        self.read_with(|input| leb128::read_sleb128(input))
    }

    /// Read `n` bytes at an absolute offset without moving the cursor.
    pub fn peek_at(&self, offset: usize, n: usize) -> Result<&'a [u8], DexError> {
        let start = self.data.get(offset..).ok_or(DexError::EndOfStream)?;
        start.get(..n).ok_or(DexError::EndOfStream)
    }

    /// Read a little-endian `u32` at an absolute offset without moving the
    /// cursor. Used by the header parser to sniff the endian tag before
    /// committing to a byte order for the rest of the header.
    pub fn peek_u32_le_at(&self, offset: usize) -> Result<u32, DexError> {
        let bytes = self.peek_at(offset, 4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }
}

//! Errors returned by this crate.
//!
//! This module contains the definitions for all error types returned by this crate.

use thiserror::Error;

/// Errors that may occur while reading a dex file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DexError {
    /// First four magic bytes aren't `"dex\n"`, or the trailing NUL is missing.
    #[error("invalid magic bytes")]
    InvalidMagic,

    /// `adler32(file[12..])` didn't match the stored `checksum`.
    #[error("invalid checksum")]
    InvalidChecksum,

    /// `endian_tag` is neither `0x12345678` nor `0x78563412`.
    #[error("invalid endian tag")]
    InvalidEndianTag,

    /// `header_size` isn't `0x70`.
    #[error("invalid header size")]
    InvalidHeaderSize,

    /// `type_ids_size >= 0xFFFF`.
    #[error("invalid type_ids size")]
    InvalidTypesSize,

    /// `proto_ids_size >= 0xFFFF`.
    #[error("invalid proto_ids size")]
    InvalidProtosSize,

    /// `data_size` isn't a multiple of 4.
    #[error("invalid data size")]
    InvalidDataSize,

    /// MUTF-8 lead byte didn't match any known encoding, or a surrogate half went unpaired.
    #[error("invalid MUTF-8 sequence")]
    InvalidMUTF8,

    /// A raw code point was out of the valid Unicode scalar range, or was a bare surrogate.
    #[error("invalid unicode code point: {0:#x}")]
    InvalidCodepoint(u32),

    /// A pool cross-reference (e.g. a `type_idx`) pointed past the end of its target pool.
    #[error("index {index} out of range for a pool of size {size}")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The size of the pool it was requested against.
        size: usize,
    },

    /// Attempted to read past the end of the underlying buffer.
    #[error("unexpected end of stream")]
    EndOfStream,
}

impl DexError {
    /// A stable numeric discriminator for this error, independent of the
    /// human-readable message. Callers that need to pattern-match across an
    /// FFI boundary, a log line, or a test assertion should match on this
    /// instead of the `Display` text.
    pub fn code(&self) -> u16 {
        match self {
            DexError::InvalidMagic => 1,
            DexError::InvalidChecksum => 2,
            DexError::InvalidEndianTag => 3,
            DexError::InvalidHeaderSize => 4,
            DexError::InvalidTypesSize => 5,
            DexError::InvalidProtosSize => 6,
            DexError::InvalidDataSize => 7,
            DexError::InvalidMUTF8 => 8,
            DexError::InvalidCodepoint(_) => 9,
            DexError::IndexOutOfRange { .. } => 10,
            DexError::EndOfStream => 11,
        }
    }
}

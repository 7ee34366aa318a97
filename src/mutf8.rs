//! MUTF-8 codec.
//!
//! DEX stores strings in a modified form of UTF-8: `U+0000` is encoded as the
//! two-byte overlong sequence `0xC0 0x80` rather than a single `0x00` byte,
//! and characters outside the Basic Multilingual Plane are encoded as a pair
//! of three-byte sequences, one per UTF-16 surrogate half, rather than the
//! four-byte form standard UTF-8 would use. [`simd_cesu8::mutf8`] implements
//! this exact codec (including the surrogate-pair handling for supplementary
//! code points); this module layers the crate's error/offset conventions
//! (`DexError`, `utf16_len`) on top of it.
//!
//! See: <https://source.android.com/docs/core/runtime/dex-format#mutf-8>

use crate::errors::DexError;

/// Decode a MUTF-8 byte buffer into a Rust string.
///
/// Supplementary-plane code points encoded as a surrogate pair (two adjacent
/// three-byte sequences) are recombined into a single `char` by the
/// underlying codec. A malformed sequence — an unrecognized lead byte, a
/// truncated multi-byte sequence, or an unpaired surrogate half — fails with
/// [`DexError::InvalidMUTF8`].
pub fn decode(bytes: &[u8]) -> Result<String, DexError> {
    simd_cesu8::mutf8::decode(bytes)
        .map(|s| s.into_owned())
        .map_err(|_| DexError::InvalidMUTF8)
}

/// Encode a Rust string to MUTF-8 bytes.
///
/// This is infallible: every `char` reachable through a `&str` is already a
/// valid Unicode scalar value, so the underlying codec never rejects it.
pub fn encode(s: &str) -> Vec<u8> {
    simd_cesu8::mutf8::encode(s).into_owned()
}

/// Encode a single raw code point, appending its MUTF-8 bytes to `out`.
///
/// Unlike [`encode`], this accepts a bare `u32` rather than a validated
/// `&str`, so it is the entry point that can actually observe
/// [`DexError::InvalidCodepoint`]: values above `0x10FFFF`, or bare surrogate
/// values that don't come paired through [`encode`]'s `char`-based
/// iteration.
pub fn encode_codepoint(codepoint: u32, out: &mut Vec<u8>) -> Result<(), DexError> {
    let ch = char::from_u32(codepoint).ok_or(DexError::InvalidCodepoint(codepoint))?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(&encode(ch.encode_utf8(&mut buf)));
    Ok(())
}

/// UTF-16 code unit count of `s`, i.e. the value DEX stores as
/// `utf16_size` for a string item.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

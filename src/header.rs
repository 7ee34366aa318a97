//! The `header_item` parser and validator.
//!
//! See: <https://source.android.com/docs/core/runtime/dex-format#header-item>

use simd_adler32::Adler32;

use crate::errors::DexError;
use crate::stream::{ByteOrder, ByteStream};

/// Little-endian sentinel for `endian_tag`.
pub const ENDIAN_CONSTANT: u32 = 0x12345678;
/// Big-endian sentinel for `endian_tag`.
pub const REVERSE_ENDIAN_CONSTANT: u32 = 0x78563412;

/// Fixed size of the DEX `header_item`, in bytes.
pub const HEADER_SIZE: u32 = 0x70;

/// The `(size, off)` pair every ID pool is described by in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolLocation {
    pub size: u32,
    pub off: u32,
}

/// The fully validated `header_item`, plus the derived fields (`version`,
/// `byte_order`) high-level callers actually want.
#[derive(Debug, Clone)]
pub struct Header {
    pub magic: [u8; 8],
    pub version: u32,
    pub checksum: u32,
    pub signature: [u8; 20],
    pub file_size: u32,
    pub header_size: u32,
    pub endian_tag: u32,
    pub byte_order: ByteOrder,
    pub link_size: u32,
    pub link_off: u32,
    pub map_off: u32,
    pub string_ids: PoolLocation,
    pub type_ids: PoolLocation,
    pub proto_ids: PoolLocation,
    pub field_ids: PoolLocation,
    pub method_ids: PoolLocation,
    pub class_defs: PoolLocation,
    pub data_size: u32,
    pub data_off: u32,
}

impl Header {
    /// Parse and validate the header at the start of `stream`, restoring the
    /// stream's byte order afterwards so callers get a consistent little-
    /// endian view unless they've opted into the header's own order.
    ///
    /// See §4.4 of the design for the exact validation sequence; each step
    /// below is numbered to match.
    pub fn parse(stream: &mut ByteStream) -> Result<Header, DexError> {
        // 1. Sniff the endian tag by peeking at offset 40, independent of
        //    cursor position, before committing to a byte order.
        let endian_probe = stream.peek_u32_le_at(40)?;
        let byte_order = match endian_probe {
            ENDIAN_CONSTANT => ByteOrder::Little,
            REVERSE_ENDIAN_CONSTANT => ByteOrder::Big,
            _ => return Err(DexError::InvalidEndianTag),
        };

        stream.seek(0);
        stream.set_order(byte_order);

        // 2. magic
        let magic_bytes = stream.read_bytes(8)?;
        let mut magic = [0u8; 8];
        magic.copy_from_slice(magic_bytes);

        if &magic[0..4] != b"dex\n" || magic[7] != 0 {
            return Err(DexError::InvalidMagic);
        }

        // 3. checksum, verified against adler32 of everything after it
        let checksum = stream.read_u32()?;
        let file_data = stream.peek_at(0, stream.len())?;
        let computed = adler32(&file_data[12..]);
        if computed != checksum {
            return Err(DexError::InvalidChecksum);
        }

        // 4. signature (read, not verified)
        let signature_bytes = stream.read_bytes(20)?;
        let mut signature = [0u8; 20];
        signature.copy_from_slice(signature_bytes);

        // 5. file_size, header_size
        let file_size = stream.read_u32()?;
        let header_size = stream.read_u32()?;
        if header_size != HEADER_SIZE {
            return Err(DexError::InvalidHeaderSize);
        }

        // 6. endian_tag, read again for the record
        let endian_tag = stream.read_u32()?;

        // 7. remaining (size, off) pairs
        let link_size = stream.read_u32()?;
        let link_off = stream.read_u32()?;
        let map_off = stream.read_u32()?;

        let string_ids = PoolLocation {
            size: stream.read_u32()?,
            off: stream.read_u32()?,
        };
        let type_ids = PoolLocation {
            size: stream.read_u32()?,
            off: stream.read_u32()?,
        };
        if type_ids.size >= 0xFFFF {
            return Err(DexError::InvalidTypesSize);
        }

        let proto_ids = PoolLocation {
            size: stream.read_u32()?,
            off: stream.read_u32()?,
        };
        if proto_ids.size >= 0xFFFF {
            return Err(DexError::InvalidProtosSize);
        }

        let field_ids = PoolLocation {
            size: stream.read_u32()?,
            off: stream.read_u32()?,
        };
        let method_ids = PoolLocation {
            size: stream.read_u32()?,
            off: stream.read_u32()?,
        };
        let class_defs = PoolLocation {
            size: stream.read_u32()?,
            off: stream.read_u32()?,
        };

        let data_size = stream.read_u32()?;
        if data_size % 4 != 0 {
            return Err(DexError::InvalidDataSize);
        }
        let data_off = stream.read_u32()?;

        // 8. version, parsed out of the magic bytes
        let version = parse_version(&magic)?;

        Ok(Header {
            magic,
            version,
            checksum,
            signature,
            file_size,
            header_size,
            endian_tag,
            byte_order,
            link_size,
            link_off,
            map_off,
            string_ids,
            type_ids,
            proto_ids,
            field_ids,
            method_ids,
            class_defs,
            data_size,
            data_off,
        })
    }
}

fn parse_version(magic: &[u8; 8]) -> Result<u32, DexError> {
    let digits = &magic[4..7];
    let mut version = 0u32;

    for &digit in digits {
        if !digit.is_ascii_digit() {
            return Err(DexError::InvalidMagic);
        }

        version = version * 10 + (digit - b'0') as u32;
    }

    Ok(version)
}

fn adler32(data: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.write(data);
    hasher.finish()
}

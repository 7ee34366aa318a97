//! `type_list` reader: a length-prefixed array of 16-bit type indices, used
//! by a `proto_id_item`'s parameter list.
//!
//! See: <https://source.android.com/docs/core/runtime/dex-format#type-list>

use crate::errors::DexError;
use crate::stream::ByteStream;

/// A resolved `type_list` block: the raw type indices plus the audit-trail
/// `offset`/`size` pair every pool element carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeList {
    pub offset: u32,
    pub size: u32,
    pub types: Vec<u32>,
}

impl TypeList {
    /// Read the `type_list` at `offset`, restoring the stream's prior
    /// position afterwards. A `length` of zero is valid and yields an empty
    /// list.
    pub fn parse(stream: &mut ByteStream, offset: u32) -> Result<TypeList, DexError> {
        let saved = stream.tell();
        stream.seek(offset as usize);

        let length = stream.read_u32()?;
        let mut types = Vec::with_capacity(length as usize);
        for _ in 0..length {
            types.push(stream.read_u16()? as u32);
        }

        let size = 4 + length * 2;
        stream.seek(saved);

        Ok(TypeList { offset, size, types })
    }
}

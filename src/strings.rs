//! String pool: the two-stage `string_id_item` → `string_data_item` →
//! decoded-text resolution described in §4.5.1.

use crate::errors::DexError;
use crate::leb128::sizeof_uleb128;
use crate::mutf8;
use crate::stream::ByteStream;

/// The 4-byte `string_id` record: an index into the pool and the file
/// offset of the `string_data_item` it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringId {
    pub id_number: u32,
    pub string_data_off: u32,
}

impl StringId {
    /// Decode the `string_data_item` this handle points at.
    ///
    /// A pure function of the handle and the stream: the stream's position
    /// is restored on return, so callers can `load` a single handle without
    /// disturbing whatever traversal they were in the middle of.
    pub fn load(&self, stream: &mut ByteStream) -> Result<StringItem, DexError> {
        let saved = stream.tell();
        stream.seek(self.string_data_off as usize);

        let data_start = stream.tell();
        let utf16_size = stream.read_uleb128()?;

        let mut raw = Vec::new();
        loop {
            let byte = stream.read_u8()?;
            if byte == 0x00 {
                break;
            }
            raw.push(byte);
        }

        let value = mutf8::decode(&raw)?;
        let size = sizeof_uleb128(utf16_size) as u32 + raw.len() as u32;

        stream.seek(saved);

        Ok(StringItem {
            id: *self,
            offset: data_start as u32,
            size,
            utf16_size: utf16_size as u32,
            bytes: raw,
            value,
        })
    }
}

/// A fully materialized `string_data_item`: decoded text plus the raw bytes
/// it was decoded from, so callers can mutate the value and re-derive the
/// on-disk form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringItem {
    pub id: StringId,
    pub offset: u32,
    pub size: u32,
    pub utf16_size: u32,
    bytes: Vec<u8>,
    value: String,
}

impl StringItem {
    /// The decoded Unicode value. Cheap: decoding happens once, at [`StringId::load`].
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The raw MUTF-8 bytes this value was (or, after [`StringItem::set_value`], would be) encoded as.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replace the decoded value, rewriting the cached MUTF-8 bytes and the
    /// `utf16_size`/`size` fields to match. Does not touch the underlying
    /// file buffer; callers that need to persist the change own that.
    pub fn set_value(&mut self, value: &str) {
        self.bytes = mutf8::encode(value);
        self.utf16_size = mutf8::utf16_len(value);
        self.size = sizeof_uleb128(self.utf16_size as u64) as u32 + self.bytes.len() as u32;
        self.value = value.to_string();
    }
}

/// Either a `string_id` not yet resolved to its text, or the fully loaded
/// item. See §9 "Polymorphism over string form".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringSlot {
    Unloaded(StringId),
    Loaded(StringItem),
}

impl StringSlot {
    pub fn id(&self) -> StringId {
        match self {
            StringSlot::Unloaded(id) => *id,
            StringSlot::Loaded(item) => item.id,
        }
    }

    /// Force this slot to its loaded form, returning the resolved text.
    /// A no-op decode if the slot is already loaded.
    pub fn force(&mut self, stream: &mut ByteStream) -> Result<&str, DexError> {
        if let StringSlot::Unloaded(id) = self {
            log::debug!("loading string_id {} at string_data_off {:#x}", id.id_number, id.string_data_off);
            let item = id.load(stream)?;
            *self = StringSlot::Loaded(item);
        }

        match self {
            StringSlot::Loaded(item) => Ok(item.value()),
            StringSlot::Unloaded(_) => unreachable!("just loaded above"),
        }
    }
}

/// Build the lazy handle table: one [`StringSlot::Unloaded`] per
/// `string_id_item`, none of them decoded yet.
pub fn build_string_ids(stream: &mut ByteStream, off: u32, count: u32) -> Result<Vec<StringSlot>, DexError> {
    let saved = stream.tell();
    stream.seek(off as usize);

    let mut ids = Vec::with_capacity(count as usize);
    for i in 0..count {
        let string_data_off = stream.read_u32()?;
        ids.push(StringSlot::Unloaded(StringId {
            id_number: i,
            string_data_off,
        }));
    }

    stream.seek(saved);
    Ok(ids)
}

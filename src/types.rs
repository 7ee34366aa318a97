//! Type pool: `type_id_item` → descriptor string (§4.5.2).

use crate::errors::DexError;
use crate::strings::StringSlot;
use crate::stream::ByteStream;

/// A `type_id_item`: an index into the string pool naming this type's
/// descriptor (e.g. `Ltest/klass;`, `I`, `[I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeId {
    pub id_number: u32,
    pub descriptor_idx: u32,
}

/// Read the `type_ids` table. Cheap and eager: each entry is a plain `u32`,
/// with no decoding of its own — the descriptor is resolved lazily or
/// eagerly through whichever form the string pool currently holds.
pub fn build_type_ids(stream: &mut ByteStream, off: u32, count: u32) -> Result<Vec<TypeId>, DexError> {
    let saved = stream.tell();
    stream.seek(off as usize);

    let mut ids = Vec::with_capacity(count as usize);
    for i in 0..count {
        let descriptor_idx = stream.read_u32()?;
        ids.push(TypeId {
            id_number: i,
            descriptor_idx,
        });
    }

    stream.seek(saved);
    Ok(ids)
}

/// Resolve `type_idx`'s descriptor, forcing the backing string slot if it
/// isn't loaded yet.
pub fn resolve_descriptor<'a>(
    types: &[TypeId],
    strings: &'a mut [StringSlot],
    stream: &mut ByteStream,
    type_idx: u32,
) -> Result<&'a str, DexError> {
    let type_id = types.get(type_idx as usize).ok_or_else(|| {
        log::warn!("type_idx {type_idx} out of range for a pool of {} types", types.len());
        DexError::IndexOutOfRange {
            index: type_idx as usize,
            size: types.len(),
        }
    })?;

    let slot = strings.get_mut(type_id.descriptor_idx as usize).ok_or_else(|| {
        log::warn!(
            "type {type_idx}'s descriptor_idx {} out of range for a pool of {} strings",
            type_id.descriptor_idx,
            strings.len()
        );
        DexError::IndexOutOfRange {
            index: type_id.descriptor_idx as usize,
            size: strings.len(),
        }
    })?;

    slot.force(stream)
}

/// Resolve a raw string index (used for e.g. a proto's `shorty_idx`, which
/// names a string directly rather than going through the type pool).
pub fn resolve_descriptor_by_string_idx<'a>(
    strings: &'a mut [StringSlot],
    stream: &mut ByteStream,
    string_idx: u32,
) -> Result<&'a str, DexError> {
    let slot = strings
        .get_mut(string_idx as usize)
        .ok_or(DexError::IndexOutOfRange {
            index: string_idx as usize,
            size: strings.len(),
        })?;

    slot.force(stream)
}

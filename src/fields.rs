//! Field pool: `field_id_item` → (defining type, field type, name), §4.5.4.

use crate::errors::DexError;
use crate::strings::StringSlot;
use crate::stream::ByteStream;
use crate::types::{self, TypeId};

/// A resolved `field_id_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldItem {
    pub id_number: u32,
    pub class_idx: u16,
    pub type_idx: u16,
    pub name_idx: u32,
    pub class: String,
    pub field_type: String,
    pub name: String,
}

impl FieldItem {
    /// `{class}->{name}:{type}`.
    pub fn render(&self) -> String {
        format!("{}->{}:{}", self.class, self.name, self.field_type)
    }
}

/// Build the field pool. Requires the string and type pools (only — fields
/// don't depend on protos).
pub fn build_fields(
    stream: &mut ByteStream,
    types: &[TypeId],
    strings: &mut [StringSlot],
    off: u32,
    count: u32,
) -> Result<Vec<FieldItem>, DexError> {
    let saved = stream.tell();
    stream.seek(off as usize);

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let class_idx = stream.read_u16()?;
        let type_idx = stream.read_u16()?;
        let name_idx = stream.read_u32()?;
        entries.push((i, class_idx, type_idx, name_idx));
    }
    stream.seek(saved);

    let mut fields = Vec::with_capacity(entries.len());
    for (id_number, class_idx, type_idx, name_idx) in entries {
        let class = types::resolve_descriptor(types, strings, stream, class_idx as u32)?.to_string();
        let field_type = types::resolve_descriptor(types, strings, stream, type_idx as u32)?.to_string();
        let name = types::resolve_descriptor_by_string_idx(strings, stream, name_idx)?.to_string();

        fields.push(FieldItem {
            id_number,
            class_idx,
            type_idx,
            name_idx,
            class,
            field_type,
            name,
        });
    }

    Ok(fields)
}

//! Method pool: `method_id_item` → (defining type, prototype, name), §4.5.5.

use crate::errors::DexError;
use crate::protos::ProtoItem;
use crate::strings::StringSlot;
use crate::stream::ByteStream;
use crate::types::{self, TypeId};

/// A resolved `method_id_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodItem {
    pub id_number: u32,
    pub class_idx: u16,
    pub proto_idx: u16,
    pub name_idx: u32,
    pub class: String,
    pub proto: String,
    pub name: String,
}

impl MethodItem {
    /// `{class}->{name}{proto}`, e.g. `Ltest/klass;->helloWorld(Ljava/lang/Object;)V`.
    pub fn render(&self) -> String {
        format!("{}->{}{}", self.class, self.name, self.proto)
    }
}

/// Build the method pool. Requires the string, type and proto pools.
pub fn build_methods(
    stream: &mut ByteStream,
    types: &[TypeId],
    protos: &[ProtoItem],
    strings: &mut [StringSlot],
    off: u32,
    count: u32,
) -> Result<Vec<MethodItem>, DexError> {
    let saved = stream.tell();
    stream.seek(off as usize);

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let class_idx = stream.read_u16()?;
        let proto_idx = stream.read_u16()?;
        let name_idx = stream.read_u32()?;
        entries.push((i, class_idx, proto_idx, name_idx));
    }
    stream.seek(saved);

    let mut methods = Vec::with_capacity(entries.len());
    for (id_number, class_idx, proto_idx, name_idx) in entries {
        let class = types::resolve_descriptor(types, strings, stream, class_idx as u32)?.to_string();
        let proto_item = protos
            .get(proto_idx as usize)
            .ok_or(DexError::IndexOutOfRange {
                index: proto_idx as usize,
                size: protos.len(),
            })?;
        let proto = proto_item.render();
        let name = types::resolve_descriptor_by_string_idx(strings, stream, name_idx)?.to_string();

        methods.push(MethodItem {
            id_number,
            class_idx,
            proto_idx,
            name_idx,
            class,
            proto,
            name,
        });
    }

    Ok(methods)
}

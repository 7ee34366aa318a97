//! Proto pool: `proto_id_item` → (shorty, return type, optional parameter
//! type-list), §4.5.3.

use crate::errors::DexError;
use crate::strings::StringSlot;
use crate::stream::ByteStream;
use crate::type_list::TypeList;
use crate::types::{self, TypeId};

/// A resolved `proto_id_item`: the raw indices plus every string they
/// resolve to, computed once at pool-build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoItem {
    pub id_number: u32,
    pub shorty_idx: u32,
    pub return_type_idx: u32,
    pub parameters_off: u32,
    pub shorty: String,
    pub return_type: String,
    pub parameter_list: Option<TypeList>,
    pub parameters: Vec<String>,
}

impl ProtoItem {
    /// The conventional `(param0param1…)returnType` rendering used when a
    /// method's full signature is rendered.
    pub fn render(&self) -> String {
        format!("({}){}", self.parameters.join(""), self.return_type)
    }
}

/// Build the proto pool. Requires the type and string pools to already be
/// present, per the `HEADER → STRINGS → TYPES → PROTOS` ordering.
pub fn build_protos(
    stream: &mut ByteStream,
    types: &[TypeId],
    strings: &mut [StringSlot],
    off: u32,
    count: u32,
) -> Result<Vec<ProtoItem>, DexError> {
    let saved = stream.tell();
    stream.seek(off as usize);

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let shorty_idx = stream.read_u32()?;
        let return_type_idx = stream.read_u32()?;
        let parameters_off = stream.read_u32()?;
        entries.push((i, shorty_idx, return_type_idx, parameters_off));
    }

    let mut protos = Vec::with_capacity(entries.len());
    for (id_number, shorty_idx, return_type_idx, parameters_off) in entries {
        let shorty = types::resolve_descriptor_by_string_idx(strings, stream, shorty_idx)?.to_string();
        let return_type = types::resolve_descriptor(types, strings, stream, return_type_idx)?.to_string();

        let (parameter_list, parameters) = if parameters_off != 0 {
            let list = TypeList::parse(stream, parameters_off)?;
            let mut rendered = Vec::with_capacity(list.types.len());
            for &type_idx in &list.types {
                rendered.push(types::resolve_descriptor(types, strings, stream, type_idx)?.to_string());
            }
            (Some(list), rendered)
        } else {
            (None, Vec::new())
        };

        protos.push(ProtoItem {
            id_number,
            shorty_idx,
            return_type_idx,
            parameters_off,
            shorty,
            return_type,
            parameter_list,
            parameters,
        });
    }

    stream.seek(saved);
    Ok(protos)
}

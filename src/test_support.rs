//! Synthetic DEX buffer construction for unit tests.
//!
//! No real `.dex` fixtures ship with this crate (the original corpus this
//! spec was distilled from didn't carry one either), so every module's test
//! suite builds its own minimal file in memory through [`DexBuilder`] rather
//! than reading one off disk.

use crate::header::{ENDIAN_CONSTANT, HEADER_SIZE};
use crate::leb128::write_uleb128;
use crate::mutf8;
use simd_adler32::Adler32;

/// One `proto_id_item`'s shape, as far as the builder is concerned: a shorty
/// string index, a return type index, and the list of parameter type indices
/// (empty means `parameters_off` is written as 0, matching a no-argument
/// prototype).
pub struct ProtoSpec {
    pub shorty_idx: u32,
    pub return_type_idx: u32,
    pub parameters: Vec<u32>,
}

/// Builds a well-formed, internally-consistent DEX byte buffer out of string,
/// type, proto, field and method pool entries, fixing up every offset and
/// the header checksum itself. Tests reach for this instead of hand-writing
/// byte arrays so that each one can focus on the one field it means to
/// corrupt afterwards.
#[derive(Default)]
pub struct DexBuilder {
    strings: Vec<String>,
    types: Vec<u32>,
    protos: Vec<ProtoSpec>,
    fields: Vec<(u16, u16, u32)>,
    methods: Vec<(u16, u16, u32)>,
    big_endian: bool,
}

impl DexBuilder {
    pub fn new() -> Self {
        DexBuilder::default()
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    /// Add a `string_data_item`, returning its index into `string_ids`.
    pub fn add_string(&mut self, s: &str) -> u32 {
        self.strings.push(s.to_string());
        (self.strings.len() - 1) as u32
    }

    /// Add a `type_id_item` pointing at `descriptor_idx`, returning its index.
    pub fn add_type(&mut self, descriptor_idx: u32) -> u32 {
        self.types.push(descriptor_idx);
        (self.types.len() - 1) as u32
    }

    /// Add a `proto_id_item`, returning its index.
    pub fn add_proto(&mut self, shorty_idx: u32, return_type_idx: u32, parameters: Vec<u32>) -> u32 {
        self.protos.push(ProtoSpec {
            shorty_idx,
            return_type_idx,
            parameters,
        });
        (self.protos.len() - 1) as u32
    }

    /// Add a `field_id_item`, returning its index.
    pub fn add_field(&mut self, class_idx: u16, type_idx: u16, name_idx: u32) -> u32 {
        self.fields.push((class_idx, type_idx, name_idx));
        (self.fields.len() - 1) as u32
    }

    /// Add a `method_id_item`, returning its index.
    pub fn add_method(&mut self, class_idx: u16, proto_idx: u16, name_idx: u32) -> u32 {
        self.methods.push((class_idx, proto_idx, name_idx));
        (self.methods.len() - 1) as u32
    }

    fn put_u16(&self, out: &mut Vec<u8>, v: u16) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn put_u32(&self, out: &mut Vec<u8>, v: u32) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Assemble the final buffer.
    pub fn build(&self) -> Vec<u8> {
        let n_str = self.strings.len() as u32;
        let n_type = self.types.len() as u32;
        let n_proto = self.protos.len() as u32;
        let n_field = self.fields.len() as u32;
        let n_method = self.methods.len() as u32;

        // Track a running cursor rather than deriving each offset from the
        // previous one's `off` field directly: a pool with zero entries
        // writes its `off` as 0 by convention, which must not shift every
        // later pool's position back to 0 as well.
        let mut cursor = HEADER_SIZE;

        let string_ids_off = if n_str > 0 {
            let off = cursor;
            cursor += n_str * 4;
            off
        } else {
            0
        };
        let type_ids_off = if n_type > 0 {
            let off = cursor;
            cursor += n_type * 4;
            off
        } else {
            0
        };
        let proto_ids_off = if n_proto > 0 {
            let off = cursor;
            cursor += n_proto * 12;
            off
        } else {
            0
        };
        let field_ids_off = if n_field > 0 {
            let off = cursor;
            cursor += n_field * 8;
            off
        } else {
            0
        };
        let method_ids_off = if n_method > 0 {
            let off = cursor;
            cursor += n_method * 8;
            off
        } else {
            0
        };
        let data_off = cursor;

        // Lay out the dynamic section: one type_list per non-empty proto,
        // each 4-byte aligned, followed by the string_data items.
        let mut dynamic = Vec::new();
        let mut parameters_off = vec![0u32; self.protos.len()];

        for (i, proto) in self.protos.iter().enumerate() {
            if proto.parameters.is_empty() {
                continue;
            }

            if dynamic.len() % 4 != 0 {
                dynamic.extend_from_slice(&[0, 0]);
            }

            parameters_off[i] = data_off + dynamic.len() as u32;
            self.put_u32(&mut dynamic, proto.parameters.len() as u32);
            for &idx in &proto.parameters {
                self.put_u16(&mut dynamic, idx as u16);
            }
        }

        let mut string_data_off = vec![0u32; self.strings.len()];
        for (i, s) in self.strings.iter().enumerate() {
            string_data_off[i] = data_off + dynamic.len() as u32;
            write_uleb128(&mut dynamic, mutf8::utf16_len(s) as u64);
            dynamic.extend_from_slice(&mutf8::encode(s));
            dynamic.push(0x00);
        }

        while dynamic.len() % 4 != 0 {
            dynamic.push(0x00);
        }
        let data_size = dynamic.len() as u32;

        let mut buf = vec![0u8; HEADER_SIZE as usize];

        for off in &string_data_off {
            self.put_u32(&mut buf, *off);
        }
        for &descriptor_idx in &self.types {
            self.put_u32(&mut buf, descriptor_idx);
        }
        for (i, proto) in self.protos.iter().enumerate() {
            self.put_u32(&mut buf, proto.shorty_idx);
            self.put_u32(&mut buf, proto.return_type_idx);
            self.put_u32(&mut buf, parameters_off[i]);
        }
        for &(class_idx, type_idx, name_idx) in &self.fields {
            self.put_u16(&mut buf, class_idx);
            self.put_u16(&mut buf, type_idx);
            self.put_u32(&mut buf, name_idx);
        }
        for &(class_idx, proto_idx, name_idx) in &self.methods {
            self.put_u16(&mut buf, class_idx);
            self.put_u16(&mut buf, proto_idx);
            self.put_u32(&mut buf, name_idx);
        }

        buf.extend_from_slice(&dynamic);

        let file_size = buf.len() as u32;

        // Now fill in the header fields in place.
        buf[0..8].copy_from_slice(b"dex\n035\0");
        // checksum (bytes 8..12) filled in after everything else.
        // signature (bytes 12..32) left zeroed.
        write_field(&mut buf, 32, file_size, self.big_endian);
        write_field(&mut buf, 36, HEADER_SIZE, self.big_endian);
        // The on-disk sentinel is always the logical `ENDIAN_CONSTANT`,
        // serialized in the file's own declared byte order; a reader that
        // always peeks it as little-endian sees `ENDIAN_CONSTANT` back for an
        // LE file and the byte-reversed `REVERSE_ENDIAN_CONSTANT` for a BE
        // one. Swapping which constant gets emitted (rather than which byte
        // order it's emitted in) produces identical wire bytes for both
        // fixtures and breaks the distinction entirely.
        write_field(&mut buf, 40, ENDIAN_CONSTANT, self.big_endian);
        write_field(&mut buf, 44, 0, self.big_endian); // link_size
        write_field(&mut buf, 48, 0, self.big_endian); // link_off
        write_field(&mut buf, 52, 0, self.big_endian); // map_off
        write_field(&mut buf, 56, n_str, self.big_endian);
        write_field(&mut buf, 60, string_ids_off, self.big_endian);
        write_field(&mut buf, 64, n_type, self.big_endian);
        write_field(&mut buf, 68, type_ids_off, self.big_endian);
        write_field(&mut buf, 72, n_proto, self.big_endian);
        write_field(&mut buf, 76, proto_ids_off, self.big_endian);
        write_field(&mut buf, 80, n_field, self.big_endian);
        write_field(&mut buf, 84, field_ids_off, self.big_endian);
        write_field(&mut buf, 88, n_method, self.big_endian);
        write_field(&mut buf, 92, method_ids_off, self.big_endian);
        write_field(&mut buf, 96, 0, self.big_endian); // class_defs_size
        write_field(&mut buf, 100, 0, self.big_endian); // class_defs_off
        write_field(&mut buf, 104, data_size, self.big_endian);
        write_field(&mut buf, 108, data_off, self.big_endian);

        let mut hasher = Adler32::new();
        hasher.write(&buf[12..]);
        let checksum = hasher.finish();
        self.put_u32_at(&mut buf, 8, checksum);

        buf
    }

    fn put_u32_at(&self, buf: &mut [u8], at: usize, value: u32) {
        let bytes = if self.big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
        buf[at..at + 4].copy_from_slice(&bytes);
    }
}

fn write_field(buf: &mut [u8], at: usize, value: u32, big_endian: bool) {
    let bytes = if big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
    buf[at..at + 4].copy_from_slice(&bytes);
}

/// Recompute `adler32(buf[12..])` and write it into the checksum field.
///
/// Tests that corrupt some other header field call this afterwards so the
/// checksum stays valid and the corruption surfaces its own specific error
/// instead of being masked by an incidental `InvalidChecksum`.
pub fn fix_checksum(buf: &mut [u8]) {
    let mut hasher = Adler32::new();
    hasher.write(&buf[12..]);
    let checksum = hasher.finish();
    buf[8..12].copy_from_slice(&checksum.to_le_bytes());
}

/// A minimal, header-only little-endian DEX buffer: no strings, types,
/// protos, fields or methods, just a valid `header_item`.
pub fn build_minimal_dex() -> Vec<u8> {
    DexBuilder::new().build()
}

/// The same minimal file, but with the header's `endian_tag` and every
/// multi-byte field written big-endian.
pub fn build_minimal_dex_big_endian() -> Vec<u8> {
    DexBuilder::new().big_endian().build()
}

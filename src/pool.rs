//! The pool resolution engine: a `Dex` view over a byte blob that lazily
//! resolves `string_ids`, `type_ids`, `proto_ids`, `field_ids` and
//! `method_ids`, tracking what's been resolved in a progress mask (§4.5).
//!
//! Ordering: `HEADER → STRINGS → TYPES → {PROTOS, FIELDS} → METHODS`. Each
//! `ensure_*` method transitively triggers its prerequisites and is a no-op
//! once its bit is already set, replacing the mask-and-decorator pattern
//! with plain calls (§9 "Progress mask").

use bitflags::bitflags;

use crate::errors::DexError;
use crate::fields::{self, FieldItem};
use crate::header::Header;
use crate::methods::{self, MethodItem};
use crate::protos::{self, ProtoItem};
use crate::strings::{self, StringItem, StringSlot};
use crate::stream::ByteStream;
use crate::types::{self, TypeId};

bitflags! {
    /// Which pools have been resolved so far.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Progress: u8 {
        const HEADER  = 0b0000_0001;
        const STRINGS = 0b0000_0010;
        const TYPES   = 0b0000_0100;
        const PROTOS  = 0b0000_1000;
        const FIELDS  = 0b0001_0000;
        const METHODS = 0b0010_0000;
    }
}

/// A DEX view: the validated header plus whichever pools have been
/// resolved so far.
#[derive(Debug)]
pub struct Dex {
    data: Vec<u8>,
    pub header: Header,
    progress: Progress,
    strings: Vec<StringSlot>,
    types: Vec<TypeId>,
    protos: Vec<ProtoItem>,
    fields: Vec<FieldItem>,
    methods: Vec<MethodItem>,
}

impl Dex {
    /// Parse and validate the header of `data`. Pools are resolved lazily
    /// through the `ensure_*`/`get_*` methods, or all at once via
    /// [`Dex::parse_dex`].
    pub fn new(data: Vec<u8>) -> Result<Dex, DexError> {
        let header = {
            let mut stream = ByteStream::new(&data);
            Header::parse(&mut stream)?
        };

        Ok(Dex {
            data,
            header,
            progress: Progress::HEADER,
            strings: Vec::new(),
            types: Vec::new(),
            protos: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        })
    }

    /// The raw file bytes this view was built over.
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Which pools have been resolved so far.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Fully materialize every pool. `no_lazy_load` additionally decodes
    /// every string up front rather than leaving handles unresolved.
    pub fn parse_dex(&mut self, no_lazy_load: bool) -> Result<(), DexError> {
        self.ensure_fields()?;
        self.ensure_methods()?;

        if no_lazy_load {
            self.load_all_strings()?;
        }

        Ok(())
    }

    /// Build (if not already built) the lazy string handle table, without
    /// decoding any of it.
    pub fn ensure_strings(&mut self) -> Result<&[StringSlot], DexError> {
        if !self.progress.contains(Progress::STRINGS) {
            log::debug!("building string_ids table ({} entries)", self.header.string_ids.size);
            let loc = self.header.string_ids;
            self.strings = if loc.size == 0 {
                Vec::new()
            } else {
                let mut stream = ByteStream::new(&self.data);
                strings::build_string_ids(&mut stream, loc.off, loc.size)?
            };
            self.progress.insert(Progress::STRINGS);
        }

        Ok(&self.strings)
    }

    /// Build (if not already built) the type pool. Forces [`Dex::ensure_strings`].
    pub fn ensure_types(&mut self) -> Result<&[TypeId], DexError> {
        self.ensure_strings()?;

        if !self.progress.contains(Progress::TYPES) {
            let loc = self.header.type_ids;
            self.types = if loc.size == 0 {
                Vec::new()
            } else {
                let mut stream = ByteStream::new(&self.data);
                types::build_type_ids(&mut stream, loc.off, loc.size)?
            };
            self.progress.insert(Progress::TYPES);
        }

        Ok(&self.types)
    }

    /// Build (if not already built) the proto pool. Forces [`Dex::ensure_types`].
    pub fn ensure_protos(&mut self) -> Result<&[ProtoItem], DexError> {
        self.ensure_types()?;

        if !self.progress.contains(Progress::PROTOS) {
            let loc = self.header.proto_ids;
            self.protos = if loc.size == 0 {
                Vec::new()
            } else {
                let mut stream = ByteStream::new(&self.data);
                protos::build_protos(&mut stream, &self.types, &mut self.strings, loc.off, loc.size)?
            };
            self.progress.insert(Progress::PROTOS);
        }

        Ok(&self.protos)
    }

    /// Build (if not already built) the field pool. Depends only on
    /// [`Dex::ensure_types`] (and transitively strings) — not on protos.
    pub fn ensure_fields(&mut self) -> Result<&[FieldItem], DexError> {
        self.ensure_types()?;

        if !self.progress.contains(Progress::FIELDS) {
            let loc = self.header.field_ids;
            self.fields = if loc.size == 0 {
                Vec::new()
            } else {
                let mut stream = ByteStream::new(&self.data);
                fields::build_fields(&mut stream, &self.types, &mut self.strings, loc.off, loc.size)?
            };
            self.progress.insert(Progress::FIELDS);
        }

        Ok(&self.fields)
    }

    /// Build (if not already built) the method pool. Forces [`Dex::ensure_protos`].
    pub fn ensure_methods(&mut self) -> Result<&[MethodItem], DexError> {
        self.ensure_protos()?;

        if !self.progress.contains(Progress::METHODS) {
            let loc = self.header.method_ids;
            self.methods = if loc.size == 0 {
                Vec::new()
            } else {
                let mut stream = ByteStream::new(&self.data);
                methods::build_methods(&mut stream, &self.types, &self.protos, &mut self.strings, loc.off, loc.size)?
            };
            self.progress.insert(Progress::METHODS);
        }

        Ok(&self.methods)
    }

    /// Resolve a single string by its pool index, forcing the string
    /// table (but no other pool) if it hasn't been built yet.
    pub fn get_string_by_id(&mut self, index: usize) -> Result<StringItem, DexError> {
        self.ensure_strings()?;

        let slot = self
            .strings
            .get(index)
            .ok_or(DexError::IndexOutOfRange { index, size: self.strings.len() })?;

        match slot {
            StringSlot::Loaded(item) => Ok(item.clone()),
            StringSlot::Unloaded(id) => {
                let mut stream = ByteStream::new(&self.data);
                id.load(&mut stream)
            }
        }
    }

    /// Decode every handle in the string pool, building it first if needed.
    pub fn load_all_strings(&mut self) -> Result<&[StringSlot], DexError> {
        self.ensure_strings()?;

        let mut stream = ByteStream::new(&self.data);
        for slot in self.strings.iter_mut() {
            slot.force(&mut stream)?;
        }

        Ok(&self.strings)
    }

    pub fn strings(&self) -> &[StringSlot] {
        &self.strings
    }

    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    pub fn protos(&self) -> &[ProtoItem] {
        &self.protos
    }

    pub fn fields(&self) -> &[FieldItem] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodItem] {
        &self.methods
    }
}

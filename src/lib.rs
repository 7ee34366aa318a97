//! A reader for Android Dalvik Executable (DEX) files: header validation,
//! lazy pool resolution (`string_ids`, `type_ids`, `proto_ids`, `field_ids`,
//! `method_ids`), MUTF-8 and LEB128 codecs, and the encoded-value reader.
//!
//! This crate reads the structural pools of a DEX file; it does not
//! execute bytecode, verify instruction semantics, or parse `class_defs`
//! bodies, `map_list`, annotations or debug-info sections. Extracting a
//! `.dex` blob out of a ZIP/APK/XAPK archive is a collaborator's job —
//! this crate starts from the raw bytes.
//!
//! ```no_run
//! use dalvik_dex::Dex;
//!
//! # fn main() -> Result<(), dalvik_dex::DexError> {
//! let bytes = std::fs::read("classes.dex").unwrap();
//! let mut dex = Dex::new(bytes)?;
//! dex.parse_dex(false)?;
//!
//! for method in dex.methods() {
//!     println!("{}", method.render());
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "async")]
pub mod asynchronous;
pub mod errors;
pub mod fields;
pub mod header;
pub mod leb128;
pub mod methods;
pub mod mutf8;
pub mod pool;
pub mod protos;
pub mod strings;
pub mod stream;
#[cfg(test)]
pub(crate) mod test_support;
pub mod type_list;
pub mod types;
pub mod value;

pub use errors::DexError;
pub use header::Header;
pub use pool::{Dex, Progress};

//! Encode and decode SMB2/3 wire records.
//!
//! # Overview
//!
//! Every SMB2/3 record is a fixed sequence of little-endian fields. Some fields are derived
//! from others: a length or count describes a sibling buffer or list, an offset locates a
//! buffer relative to the start of the SMB2 header, and zero padding aligns what follows.
//!
//! This crate provides the building blocks records are written with:
//! - [`Write`], [`EncodeSize`] and [`Read`]: pack, measure and unpack one field or record
//! - [`FieldReader`]: reads a record field by field, attributing failures to the field name
//!   and its byte offset
//! - [`symbols!`] and [`flags!`]: enumerated and bit-flag fields that keep unknown codes
//! - [`context`]: counted and linked chains of type-tagged context entries
//! - [`FileTime`] and [`uuid::Uuid`]: timestamps and GUIDs in their Windows layout
//!
//! Derived fields are never supplied by the caller. A record owns its content and computes
//! lengths, counts, offsets and padding while writing, so an encoded record is always
//! internally consistent. Decoding checks that every declared offset points exactly where the
//! data begins.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut, Bytes};
//! use smbwire_codec::{
//!     util::{fit, FieldReader},
//!     DecodeExt, Encode, EncodeSize, Error, Read, Write,
//! };
//!
//! // A record with a 2-byte length followed by the bytes it describes.
//! #[derive(Debug, PartialEq)]
//! struct Blob {
//!     data: Bytes,
//! }
//!
//! impl Write for Blob {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         fit::<u16>("length", self.data.len()).write(buf);
//!         self.data.write(buf);
//!     }
//! }
//!
//! impl EncodeSize for Blob {
//!     fn encode_size(&self) -> usize {
//!         2 + self.data.len()
//!     }
//! }
//!
//! impl Read for Blob {
//!     type Cfg = ();
//!
//!     fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
//!         let mut reader = FieldReader::new(buf);
//!         let length: u16 = reader.read("length")?;
//!         let data = reader.bytes("data", length as usize)?;
//!         Ok(Self { data })
//!     }
//! }
//!
//! let blob = Blob { data: Bytes::from_static(b"smb") };
//! let encoded = blob.encode();
//! assert_eq!(&encoded[..], &[0x03, 0x00, b's', b'm', b'b']);
//! assert_eq!(Blob::decode(encoded).unwrap(), blob);
//!
//! // A truncated record names the field that could not be read.
//! let err = Blob::decode(&[0x03, 0x00, b's'][..]).unwrap_err();
//! assert_eq!(err.to_string(), "data at byte 2: unexpected end of buffer");
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod symbol;
pub mod types;
pub mod util;

// Re-export main types and traits
pub use codec::{Codec, Decode, DecodeExt, Encode, EncodeSize, FixedSize, Read, ReadExt, Write};
pub use config::RangeCfg;
pub use error::Error;
pub use types::{primitives::BigEndian, time::FileTime};
pub use util::FieldReader;

// Used by the exported macros.
#[doc(hidden)]
pub use bitflags;
#[doc(hidden)]
pub use bytes;

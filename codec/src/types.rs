//! Codec implementations for the field types that make up SMB records.

pub mod bytes;
pub mod guid;
pub mod primitives;
pub mod time;
pub mod vec;

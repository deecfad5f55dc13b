//! SMB2/3 messages and the framing around them.
//!
//! # Overview
//!
//! A message on the wire is layered:
//! - [`transport::DirectTcp`]: a 4-byte big-endian length followed by one message
//! - [`Header`]: the 64-byte SMB2 header, or [`transform::TransformHeader`] for an encrypted
//!   message, or [`smb1::Smb1Header`] for the legacy negotiate that opens some connections
//! - [`Body`]: the command-specific record that follows an SMB2 header
//!
//! Offsets inside bodies are relative to the start of the SMB2 header, so every body is
//! written and read as though it starts at byte [`HEADER_SIZE`].
//!
//! Decoding never trusts a declared length, count or offset: each one is checked against the
//! bytes actually present and against the bounds in [`Limits`]. Errors name the field that
//! failed (see [`smbwire_codec::Error::path`]).
//!
//! # Example
//!
//! ```
//! use smbwire_messages::{
//!     constants::{Command, Dialect},
//!     negotiate::NegotiateRequest,
//!     transport::DirectTcp,
//!     Body, Header, HeaderForm, Limits,
//! };
//! use smbwire_codec::{Decode, Encode};
//!
//! let body = Body::NegotiateRequest(NegotiateRequest {
//!     dialects: vec![Dialect::Smb202, Dialect::Smb210],
//!     ..Default::default()
//! });
//! let frame = DirectTcp::new(Header::default().with_body(&body).encode());
//! let encoded = frame.encode();
//!
//! let limits = Limits::default();
//! let frame = DirectTcp::decode_cfg(encoded, &limits.frame).unwrap();
//! let header = Header::decode_cfg(frame.message, &HeaderForm::Status).unwrap();
//! assert_eq!(header.command, Command::Negotiate);
//! assert_eq!(Body::parse(&header, &limits).unwrap(), body);
//! ```

pub mod close;
pub mod config;
pub mod constants;
pub mod create;
pub mod error;
pub mod error_response;
pub mod header;
pub mod ioctl;
pub mod message;
pub mod negotiate;
pub mod session;
pub mod smb1;
pub mod transform;
pub mod transport;
pub mod tree;
mod utf16;

pub use config::{Direction, HeaderForm, Limits};
pub use error::Error;
pub use header::{Header, StatusField};
pub use message::Body;

/// Size of an SMB2 header. Offsets inside a body are measured from the start of the header.
pub const HEADER_SIZE: usize = 64;

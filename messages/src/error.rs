//! Error types for message decoding.

use crate::constants::Command;
use thiserror::Error;

/// Errors that can occur when decoding a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] smbwire_codec::Error),
    #[error("no body decoder for command {0}")]
    UnsupportedCommand(Command),
    #[error("invalid UTF-16 in {0}")]
    InvalidUtf16(&'static str),
}

//! Types for use as decode configuration.

use smbwire_codec::RangeCfg;

/// Largest message accepted inside a direct TCP frame.
///
/// The frame length is 24 bits wide on the wire (the top byte must be zero), so a peer can
/// never legitimately declare more.
pub const MAX_FRAME_SIZE: usize = 0x00FF_FFFF;

/// Largest number of entries accepted in one context list.
pub const MAX_CONTEXTS: usize = 64;

/// Bounds applied to counts and lengths declared by an untrusted peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Number of entries in a negotiate, create or error context list.
    pub contexts: RangeCfg,

    /// Length of a message inside a direct TCP frame.
    pub frame: RangeCfg,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            contexts: RangeCfg::from(..=MAX_CONTEXTS),
            frame: RangeCfg::from(..=MAX_FRAME_SIZE),
        }
    }
}

/// Which layout bytes 8 through 15 of an SMB2 header use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderForm {
    /// A 4-byte status. Used by servers, and by clients before an SMB 3.x dialect is
    /// negotiated.
    #[default]
    Status,

    /// A 2-byte channel sequence and 2 reserved bytes. Used by clients after negotiating an
    /// SMB 3.x dialect.
    ChannelSequence,
}

/// Which side of an exchange a message travels on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Client to server.
    Request,

    /// Server to client.
    Response,
}

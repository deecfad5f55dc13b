//! Direct TCP framing.

use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{
    util::fit, BigEndian, EncodeSize, Error, FieldReader, RangeCfg, Read, Write,
};

/// A message framed for direct TCP transport: a 4-byte big-endian length, then the message.
///
/// The length is always derived from the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectTcp {
    /// The framed message (an SMB1, SMB2 or transform header and what follows it).
    pub message: Bytes,
}

impl DirectTcp {
    /// Frames `message`.
    pub fn new(message: impl Into<Bytes>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Write for DirectTcp {
    fn write(&self, buf: &mut impl BufMut) {
        BigEndian(fit::<u32>("stream_protocol_length", self.message.len())).write(buf);
        self.message.write(buf);
    }
}

impl EncodeSize for DirectTcp {
    fn encode_size(&self) -> usize {
        4 + self.message.len()
    }
}

impl Read for DirectTcp {
    /// Bound on the declared message length.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, limit: &RangeCfg) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let BigEndian(length) = reader.read::<BigEndian<u32>>("stream_protocol_length")?;
        let length = length as usize;
        limit
            .check(length)
            .map_err(|err| err.at("stream_protocol_length", 0))?;
        let message = reader.bytes("message", length)?;
        Ok(Self { message })
    }
}

//! SMB1 negotiate, used to bootstrap dialect negotiation with servers that still expect it.

use crate::constants::{Smb1Flags, Smb1Flags2};
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{util::fit, EncodeSize, Error, FieldReader, FixedSize, Read, Write};

/// Protocol identifier of an SMB1 header.
pub const SMB1_MAGIC: [u8; 4] = [0xFF, b'S', b'M', b'B'];

/// `SMB_COM_NEGOTIATE`, the only SMB1 command in the catalog.
pub const SMB1_COM_NEGOTIATE: u8 = 0x72;

/// Size of an SMB1 header.
pub const SMB1_HEADER_SIZE: usize = 32;

/// Buffer format byte preceding every dialect string.
const DIALECT_BUFFER_FORMAT: u8 = 0x02;

/// SMB1 dialect string that advertises SMB 2.0.2.
pub const SMB2_002: &str = "SMB 2.002";

/// SMB1 dialect string that advertises any SMB2 dialect.
pub const SMB2_WILDCARD: &str = "SMB 2.???";

/// An SMB1 header carrying an `SMB_COM_NEGOTIATE` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Smb1Header {
    pub status: u32,
    pub flags: Smb1Flags,
    pub flags2: Smb1Flags2,
    pub pid_high: u16,
    pub security_features: u64,
    pub tid: u16,
    pub pid_low: u16,
    pub uid: u16,
    pub mid: u16,
    pub negotiate: Smb1NegotiateRequest,
}

impl Smb1Header {
    /// Wraps a negotiate request with the flags a client sends before any SMB2 dialect is known.
    pub fn negotiate(negotiate: Smb1NegotiateRequest) -> Self {
        Self {
            status: 0,
            flags: Smb1Flags::CASE_INSENSITIVE | Smb1Flags::CANONICALIZED_PATHS,
            flags2: Smb1Flags2::LONG_NAMES
                | Smb1Flags2::EXTENDED_SECURITY
                | Smb1Flags2::NT_STATUS
                | Smb1Flags2::UNICODE,
            pid_high: 0,
            security_features: 0,
            tid: 0,
            pid_low: 0,
            uid: 0,
            mid: 0,
            negotiate,
        }
    }
}

impl Write for Smb1Header {
    fn write(&self, buf: &mut impl BufMut) {
        SMB1_MAGIC.write(buf);
        SMB1_COM_NEGOTIATE.write(buf);
        self.status.write(buf);
        self.flags.write(buf);
        self.flags2.write(buf);
        self.pid_high.write(buf);
        self.security_features.write(buf);
        0u16.write(buf);
        self.tid.write(buf);
        self.pid_low.write(buf);
        self.uid.write(buf);
        self.mid.write(buf);
        self.negotiate.write(buf);
    }
}

impl EncodeSize for Smb1Header {
    fn encode_size(&self) -> usize {
        SMB1_HEADER_SIZE + self.negotiate.encode_size()
    }
}

impl Read for Smb1Header {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.magic("protocol", &SMB1_MAGIC)?;
        reader.constant("command", SMB1_COM_NEGOTIATE)?;
        let status = reader.read("status")?;
        let flags = reader.read("flags")?;
        let flags2 = reader.read("flags2")?;
        let pid_high = reader.read("pid_high")?;
        let security_features = reader.read("security_features")?;
        reader.skip("reserved", 2)?;
        let tid = reader.read("tid")?;
        let pid_low = reader.read("pid_low")?;
        let uid = reader.read("uid")?;
        let mid = reader.read("mid")?;
        let negotiate = reader.read("data")?;
        Ok(Self {
            status,
            flags,
            flags2,
            pid_high,
            security_features,
            tid,
            pid_low,
            uid,
            mid,
            negotiate,
        })
    }
}

/// `SMB_COM_NEGOTIATE` request: the list of dialect strings the client understands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Smb1NegotiateRequest {
    pub dialects: Vec<String>,
}

impl Smb1NegotiateRequest {
    /// The dialect list that asks an SMB2-capable server to answer with an SMB2 negotiate
    /// response.
    pub fn smb2() -> Self {
        Self {
            dialects: vec![SMB2_002.to_string(), SMB2_WILDCARD.to_string()],
        }
    }

    fn byte_count(&self) -> usize {
        self.dialects.iter().map(|dialect| dialect.len() + 2).sum()
    }
}

impl Write for Smb1NegotiateRequest {
    fn write(&self, buf: &mut impl BufMut) {
        0u8.write(buf);
        fit::<u16>("byte_count", self.byte_count()).write(buf);
        for dialect in &self.dialects {
            assert!(
                !dialect.as_bytes().contains(&0),
                "dialect cannot contain a NUL byte"
            );
            DIALECT_BUFFER_FORMAT.write(buf);
            buf.put_slice(dialect.as_bytes());
            0u8.write(buf);
        }
    }
}

impl EncodeSize for Smb1NegotiateRequest {
    fn encode_size(&self) -> usize {
        u8::SIZE + u16::SIZE + self.byte_count()
    }
}

impl Read for Smb1NegotiateRequest {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("word_count", 0u8)?;
        let byte_count: u16 = reader.read("byte_count")?;
        let dialects = reader.area("dialects", byte_count as usize, parse_dialects)?;
        Ok(Self { dialects })
    }
}

/// Splits `0x02 name 0x00` sequences.
fn parse_dialects(mut area: Bytes) -> Result<Vec<String>, Error> {
    let mut dialects = Vec::new();
    while area.has_remaining() {
        if area.get_u8() != DIALECT_BUFFER_FORMAT {
            return Err(Error::InvalidData("dialects", "missing buffer format"));
        }
        let end = area
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::InvalidData("dialects", "unterminated dialect"))?;
        let name = String::from_utf8(area.split_to(end).to_vec())
            .map_err(|_| Error::InvalidData("dialects", "dialect is not text"))?;
        area.advance(1);
        dialects.push(name);
    }
    Ok(dialects)
}

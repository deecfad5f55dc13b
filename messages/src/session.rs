//! Session setup and logoff.

use crate::{
    constants::{Capabilities, SessionFlags, SessionSetupFlags, SetupSecurityMode},
    HEADER_SIZE,
};
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{util::fit, EncodeSize, Error, FieldReader, FixedSize, Read, Write};

const REQUEST_STRUCTURE_SIZE: u16 = 25;
const RESPONSE_STRUCTURE_SIZE: u16 = 9;
const LOGOFF_STRUCTURE_SIZE: u16 = 4;

/// Header-relative offset of the security buffer in a session setup request.
const REQUEST_BUFFER_OFFSET: usize = HEADER_SIZE + 24;

/// Header-relative offset of the security buffer in a session setup response.
const RESPONSE_BUFFER_OFFSET: usize = HEADER_SIZE + 8;

/// `SMB2 SESSION_SETUP` request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSetupRequest {
    pub flags: SessionSetupFlags,
    pub security_mode: SetupSecurityMode,
    pub capabilities: Capabilities,
    pub channel: u32,
    pub previous_session_id: u64,
    /// Opaque GSS token.
    pub security_buffer: Bytes,
}

impl Write for SessionSetupRequest {
    fn write(&self, buf: &mut impl BufMut) {
        REQUEST_STRUCTURE_SIZE.write(buf);
        self.flags.write(buf);
        self.security_mode.write(buf);
        self.capabilities.write(buf);
        self.channel.write(buf);
        (REQUEST_BUFFER_OFFSET as u16).write(buf);
        fit::<u16>("security_buffer_length", self.security_buffer.len()).write(buf);
        self.previous_session_id.write(buf);
        self.security_buffer.write(buf);
    }
}

impl EncodeSize for SessionSetupRequest {
    fn encode_size(&self) -> usize {
        REQUEST_BUFFER_OFFSET - HEADER_SIZE + self.security_buffer.len()
    }
}

impl Read for SessionSetupRequest {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", REQUEST_STRUCTURE_SIZE)?;
        let flags = reader.read("flags")?;
        let security_mode = reader.read("security_mode")?;
        let capabilities = reader.read("capabilities")?;
        let channel = reader.read("channel")?;
        let buffer_offset: u16 = reader.read("security_buffer_offset")?;
        let buffer_length: u16 = reader.read("security_buffer_length")?;
        let previous_session_id = reader.read("previous_session_id")?;
        let security_buffer = reader.buffer(
            "buffer",
            "security_buffer_offset",
            buffer_offset as usize,
            buffer_length as usize,
            HEADER_SIZE,
        )?;
        Ok(Self {
            flags,
            security_mode,
            capabilities,
            channel,
            previous_session_id,
            security_buffer,
        })
    }
}

/// `SMB2 SESSION_SETUP` response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSetupResponse {
    pub session_flags: SessionFlags,
    /// Opaque GSS token.
    pub security_buffer: Bytes,
}

impl Write for SessionSetupResponse {
    fn write(&self, buf: &mut impl BufMut) {
        RESPONSE_STRUCTURE_SIZE.write(buf);
        self.session_flags.write(buf);
        (RESPONSE_BUFFER_OFFSET as u16).write(buf);
        fit::<u16>("security_buffer_length", self.security_buffer.len()).write(buf);
        self.security_buffer.write(buf);
    }
}

impl EncodeSize for SessionSetupResponse {
    fn encode_size(&self) -> usize {
        RESPONSE_BUFFER_OFFSET - HEADER_SIZE + self.security_buffer.len()
    }
}

impl Read for SessionSetupResponse {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", RESPONSE_STRUCTURE_SIZE)?;
        let session_flags = reader.read("session_flags")?;
        let buffer_offset: u16 = reader.read("security_buffer_offset")?;
        let buffer_length: u16 = reader.read("security_buffer_length")?;
        let security_buffer = reader.buffer(
            "buffer",
            "security_buffer_offset",
            buffer_offset as usize,
            buffer_length as usize,
            HEADER_SIZE,
        )?;
        Ok(Self {
            session_flags,
            security_buffer,
        })
    }
}

/// `SMB2 LOGOFF` request or response. Both carry only a structure size and a reserved field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Logoff;

impl Write for Logoff {
    fn write(&self, buf: &mut impl BufMut) {
        LOGOFF_STRUCTURE_SIZE.write(buf);
        0u16.write(buf);
    }
}

impl FixedSize for Logoff {
    const SIZE: usize = 4;
}

impl Read for Logoff {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", LOGOFF_STRUCTURE_SIZE)?;
        reader.skip("reserved", 2)?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbwire_codec::{DecodeExt, Encode};

    #[test]
    fn test_request_layout() {
        let req = SessionSetupRequest {
            flags: SessionSetupFlags::empty(),
            security_mode: SetupSecurityMode::SIGNING_ENABLED,
            capabilities: Capabilities::DFS,
            channel: 0,
            previous_session_id: 0,
            security_buffer: Bytes::from_static(b"NTLMSSP\x00\x01"),
        };
        let encoded = req.encode();
        assert_eq!(encoded.len(), 24 + 9);
        assert_eq!(&encoded[..4], &[25, 0, 0, 1]);
        assert_eq!(&encoded[12..16], &[88, 0, 9, 0]);
        assert_eq!(SessionSetupRequest::decode(encoded).unwrap(), req);
    }

    #[test]
    fn test_response_layout() {
        let resp = SessionSetupResponse {
            session_flags: SessionFlags::IS_GUEST,
            security_buffer: Bytes::from_static(&[0xA1, 0x07]),
        };
        let encoded = resp.encode();
        assert_eq!(&encoded[..], &[9, 0, 1, 0, 72, 0, 2, 0, 0xA1, 0x07]);
        assert_eq!(SessionSetupResponse::decode(encoded).unwrap(), resp);
    }

    #[test]
    fn test_response_buffer_past_end() {
        let raw = Bytes::from_static(&[9, 0, 0, 0, 72, 0, 4, 0, 0xA1]);
        let err = SessionSetupResponse::decode(raw).unwrap_err();
        assert_eq!(err.path(), "buffer");
        assert_eq!(err.root(), &Error::EndOfBuffer);
    }

    #[test]
    fn test_empty_buffer_offset_ignored() {
        let raw = Bytes::from_static(&[9, 0, 0, 0, 0, 0, 0, 0]);
        let resp = SessionSetupResponse::decode(raw).unwrap();
        assert!(resp.security_buffer.is_empty());
    }

    #[test]
    fn test_logoff() {
        assert_eq!(&Logoff.encode()[..], &[4, 0, 0, 0]);
        assert_eq!(Logoff::decode(&[4u8, 0, 0xFF, 0xFF][..]).unwrap(), Logoff);
        assert!(Logoff::decode(&[5u8, 0, 0, 0][..]).is_err());
    }
}

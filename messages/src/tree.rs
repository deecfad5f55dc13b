//! Tree connect and tree disconnect.

use crate::{
    constants::{ShareCapabilities, ShareFlags, ShareType, TreeFlags},
    utf16, HEADER_SIZE,
};
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{util::fit, EncodeSize, Error, FieldReader, FixedSize, Read, Write};

const REQUEST_STRUCTURE_SIZE: u16 = 9;
const RESPONSE_STRUCTURE_SIZE: u16 = 16;
const DISCONNECT_STRUCTURE_SIZE: u16 = 4;

/// Header-relative offset of the share path in a tree connect request.
const PATH_OFFSET: usize = HEADER_SIZE + 8;

/// `SMB2 TREE_CONNECT` request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeConnectRequest {
    pub flags: TreeFlags,
    /// UTF-16LE share path, such as `\\server\share`.
    pub path: Bytes,
}

impl TreeConnectRequest {
    /// Returns a request for the share at `path`.
    pub fn new(flags: TreeFlags, path: &str) -> Self {
        Self {
            flags,
            path: utf16::encode(path),
        }
    }

    /// Decodes the share path.
    pub fn path(&self) -> Result<String, crate::Error> {
        utf16::decode(&self.path).ok_or(crate::Error::InvalidUtf16("path"))
    }
}

impl Write for TreeConnectRequest {
    fn write(&self, buf: &mut impl BufMut) {
        REQUEST_STRUCTURE_SIZE.write(buf);
        self.flags.write(buf);
        (PATH_OFFSET as u16).write(buf);
        fit::<u16>("path_length", self.path.len()).write(buf);
        self.path.write(buf);
    }
}

impl EncodeSize for TreeConnectRequest {
    fn encode_size(&self) -> usize {
        PATH_OFFSET - HEADER_SIZE + self.path.len()
    }
}

impl Read for TreeConnectRequest {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", REQUEST_STRUCTURE_SIZE)?;
        let flags = reader.read("flags")?;
        let path_offset: u16 = reader.read("path_offset")?;
        let path_length: u16 = reader.read("path_length")?;
        let path = reader.buffer(
            "buffer",
            "path_offset",
            path_offset as usize,
            path_length as usize,
            HEADER_SIZE,
        )?;
        Ok(Self { flags, path })
    }
}

/// `SMB2 TREE_CONNECT` response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConnectResponse {
    pub share_type: ShareType,
    pub share_flags: ShareFlags,
    pub capabilities: ShareCapabilities,
    pub maximal_access: u32,
}

impl Write for TreeConnectResponse {
    fn write(&self, buf: &mut impl BufMut) {
        RESPONSE_STRUCTURE_SIZE.write(buf);
        self.share_type.write(buf);
        0u8.write(buf);
        self.share_flags.write(buf);
        self.capabilities.write(buf);
        self.maximal_access.write(buf);
    }
}

impl FixedSize for TreeConnectResponse {
    const SIZE: usize = 16;
}

impl Read for TreeConnectResponse {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", RESPONSE_STRUCTURE_SIZE)?;
        let share_type = reader.read("share_type")?;
        reader.skip("reserved", 1)?;
        let share_flags = reader.read("share_flags")?;
        let capabilities = reader.read("capabilities")?;
        let maximal_access = reader.read("maximal_access")?;
        Ok(Self {
            share_type,
            share_flags,
            capabilities,
            maximal_access,
        })
    }
}

/// `SMB2 TREE_DISCONNECT` request or response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeDisconnect;

impl Write for TreeDisconnect {
    fn write(&self, buf: &mut impl BufMut) {
        DISCONNECT_STRUCTURE_SIZE.write(buf);
        0u16.write(buf);
    }
}

impl FixedSize for TreeDisconnect {
    const SIZE: usize = 4;
}

impl Read for TreeDisconnect {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", DISCONNECT_STRUCTURE_SIZE)?;
        reader.skip("reserved", 2)?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbwire_codec::{DecodeExt, Encode};

    #[test]
    fn test_request() {
        let req = TreeConnectRequest::new(TreeFlags::empty(), "\\\\srv\\ipc$");
        let encoded = req.encode();
        assert_eq!(&encoded[..8], &[9, 0, 0, 0, 72, 0, 20, 0]);
        assert_eq!(&encoded[8..10], &[b'\\', 0]);

        let decoded = TreeConnectRequest::decode(encoded).unwrap();
        assert_eq!(decoded.path().unwrap(), "\\\\srv\\ipc$");
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_request_invalid_path() {
        let req = TreeConnectRequest {
            flags: TreeFlags::empty(),
            path: Bytes::from_static(&[0x00, 0xDC]),
        };
        assert_eq!(req.path(), Err(crate::Error::InvalidUtf16("path")));
    }

    #[test]
    fn test_response() {
        let resp = TreeConnectResponse {
            share_type: ShareType::Pipe,
            share_flags: ShareFlags::NO_CACHING,
            capabilities: ShareCapabilities::empty(),
            maximal_access: 0x001F_01FF,
        };
        let encoded = resp.encode();
        assert_eq!(encoded.len(), 16);
        assert_eq!(&encoded[..4], &[16, 0, 2, 0]);

        // The reserved byte is ignored.
        let mut raw = encoded.clone();
        raw[3] = 0xAA;
        assert_eq!(TreeConnectResponse::decode(raw).unwrap(), resp);
    }

    #[test]
    fn test_disconnect() {
        assert_eq!(&TreeDisconnect.encode()[..], &[4, 0, 0, 0]);
        let err = TreeDisconnect::decode(&[4u8, 0][..]).unwrap_err();
        assert_eq!(err.path(), "reserved");
    }
}

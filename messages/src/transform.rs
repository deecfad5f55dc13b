//! SMB 3.x transform header, the envelope around an encrypted message.

use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{util::fit, EncodeSize, Error, FieldReader, Read, Write};

/// Protocol identifier of a transform header.
pub const TRANSFORM_MAGIC: [u8; 4] = [0xFD, b'S', b'M', b'B'];

/// Size of a transform header.
pub const TRANSFORM_HEADER_SIZE: usize = 52;

/// The only flag value defined for a transform header: the body is encrypted.
const ENCRYPTED: u16 = 0x0001;

/// A transform header followed by the encrypted message.
///
/// The signature and nonce are computed elsewhere and carried as-is. The original message
/// size is derived from the encrypted body, which has the same length as the plaintext.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformHeader {
    pub signature: [u8; 16],
    pub nonce: [u8; 16],
    pub session_id: u64,
    pub data: Bytes,
}

impl Write for TransformHeader {
    fn write(&self, buf: &mut impl BufMut) {
        TRANSFORM_MAGIC.write(buf);
        self.signature.write(buf);
        self.nonce.write(buf);
        fit::<u32>("original_message_size", self.data.len()).write(buf);
        0u16.write(buf);
        ENCRYPTED.write(buf);
        self.session_id.write(buf);
        self.data.write(buf);
    }
}

impl EncodeSize for TransformHeader {
    fn encode_size(&self) -> usize {
        TRANSFORM_HEADER_SIZE + self.data.len()
    }
}

impl Read for TransformHeader {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.magic("protocol_id", &TRANSFORM_MAGIC)?;
        let signature = reader.read("signature")?;
        let nonce = reader.read("nonce")?;
        let original_message_size: u32 = reader.read("original_message_size")?;
        reader.skip("reserved", 2)?;
        reader.constant("flags", ENCRYPTED)?;
        let session_id = reader.read("session_id")?;
        let data = reader.bytes("data", original_message_size as usize)?;
        Ok(Self {
            signature,
            nonce,
            session_id,
            data,
        })
    }
}

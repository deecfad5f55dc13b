//! Codec implementation for GUID fields.
//!
//! GUIDs use the mixed-endian Windows layout: the first three groups are little-endian, the
//! last eight bytes are stored as-is.

use crate::{util::at_least, Error, FixedSize, Read, Write};
use bytes::{Buf, BufMut};
use uuid::Uuid;

impl Write for Uuid {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(&self.to_bytes_le());
    }
}

impl Read for Uuid {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        at_least(buf, Self::SIZE)?;
        let mut bytes = [0u8; 16];
        buf.copy_to_slice(&mut bytes);
        Ok(Uuid::from_bytes_le(bytes))
    }
}

impl FixedSize for Uuid {
    const SIZE: usize = 16;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeExt, Encode};

    #[test]
    fn test_guid_layout() {
        let guid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let encoded = guid.encode();
        assert_eq!(
            &encoded[..],
            &[
                0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
                0xdd, 0xee, 0xff
            ]
        );
        assert_eq!(Uuid::decode(encoded).unwrap(), guid);
    }

    #[test]
    fn test_nil_guid() {
        let encoded = Uuid::nil().encode();
        assert_eq!(&encoded[..], &[0u8; 16]);
    }
}

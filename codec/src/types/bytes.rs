//! Codec implementation for opaque byte buffers.
//!
//! A buffer carries no length prefix of its own: its size is declared by a sibling field and
//! passed in as the read configuration.

use crate::{util::at_least, EncodeSize, Error, Read, Write};
use bytes::{Buf, BufMut, Bytes};

impl Write for Bytes {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(self);
    }
}

impl EncodeSize for Bytes {
    #[inline]
    fn encode_size(&self) -> usize {
        self.len()
    }
}

impl Read for Bytes {
    /// Exact number of bytes to read.
    type Cfg = usize;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, len: &usize) -> Result<Self, Error> {
        at_least(buf, *len)?;
        Ok(buf.copy_to_bytes(*len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};

    #[test]
    fn test_bytes() {
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0; 300]),
        ];
        for value in values {
            let encoded = value.encode();
            assert_eq!(encoded.len(), value.len());

            let len = value.len();
            let decoded = Bytes::decode_cfg(encoded, &len).unwrap();
            assert_eq!(value, decoded);

            // Declared size larger than the buffer
            assert!(matches!(
                Bytes::decode_cfg(value.clone(), &(len + 1)),
                Err(Error::EndOfBuffer)
            ));
        }
    }

    #[test]
    fn test_bytes_leaves_remainder() {
        let mut buf = Bytes::from_static(&[1, 2, 3, 4]);
        let head = Bytes::read_cfg(&mut buf, &1).unwrap();
        assert_eq!(&head[..], &[1]);
        assert_eq!(&buf[..], &[2, 3, 4]);
    }
}

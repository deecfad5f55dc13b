//! Codec implementation for count-resolved lists (dialects, ciphers, hash algorithms, ...).
//!
//! Like [`bytes::Bytes`], a list has no prefix of its own: the element count is declared by a
//! sibling field and passed in as the read configuration.

use crate::{EncodeSize, Error, Read, Write};
use bytes::{Buf, BufMut};

impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        for item in self {
            item.write(buf);
        }
    }
}

impl<T: EncodeSize> EncodeSize for Vec<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        self.iter().map(EncodeSize::encode_size).sum()
    }
}

impl<T: Read> Read for Vec<T> {
    /// Element count and per-element configuration.
    type Cfg = (usize, T::Cfg);

    #[inline]
    fn read_cfg(buf: &mut impl Buf, (count, cfg): &(usize, T::Cfg)) -> Result<Self, Error> {
        // Every element occupies at least one byte, so the remaining input bounds the allocation.
        let mut vec = Vec::with_capacity((*count).min(buf.remaining()));
        for _ in 0..*count {
            vec.push(T::read_cfg(buf, cfg)?);
        }
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};
    use bytes::Bytes;

    #[test]
    fn test_vec() {
        let vec_values = [vec![], vec![1u16], vec![0x0202u16, 0x0210, 0x0311]];
        for value in vec_values {
            let encoded = value.encode();
            assert_eq!(encoded.len(), value.len() * 2);

            let len = value.len();
            let decoded = Vec::<u16>::decode_cfg(encoded, &(len, ())).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_vec_count_past_end() {
        let encoded = Bytes::from_static(&[0x02, 0x02, 0x10]);
        assert!(matches!(
            Vec::<u16>::decode_cfg(encoded, &(2, ())),
            Err(Error::EndOfBuffer)
        ));
    }

    #[test]
    fn test_vec_hostile_count() {
        // A huge declared count must fail on the first missing element, not allocate.
        let encoded = Bytes::from_static(&[0x01, 0x00]);
        assert!(matches!(
            Vec::<u16>::decode_cfg(encoded, &(usize::MAX, ())),
            Err(Error::EndOfBuffer)
        ));
    }
}

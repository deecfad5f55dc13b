//! Codec implementations for Rust primitive types.
//!
//! # Byte order
//!
//! Every integer on the SMB wire is little-endian, so the plain integer types encode
//! little-endian. The single big-endian field in the stack (the transport length prefix) is
//! spelled [`BigEndian<T>`] so the exception is visible at the use site.
//!
//! `usize` deliberately has no implementation: a length or count always has a declared wire
//! width, and the record narrows it with [`crate::util::fit`] when writing.

use crate::{util::at_least, Error, FixedSize, Read, Write};
use bytes::{Buf, BufMut};

// Numeric types implementation
macro_rules! impl_numeric {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Write for $type {
            #[inline]
            fn write(&self, buf: &mut impl BufMut) {
                buf.$write_method(*self);
            }
        }

        impl Read for $type {
            type Cfg = ();
            #[inline]
            fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                at_least(buf, std::mem::size_of::<$type>())?;
                Ok(buf.$read_method())
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = std::mem::size_of::<$type>();
        }
    };
}

impl_numeric!(u8, get_u8, put_u8);
impl_numeric!(u16, get_u16_le, put_u16_le);
impl_numeric!(u32, get_u32_le, put_u32_le);
impl_numeric!(u64, get_u64_le, put_u64_le);

/// A big-endian integer field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BigEndian<T>(pub T);

macro_rules! impl_big_endian {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Write for BigEndian<$type> {
            #[inline]
            fn write(&self, buf: &mut impl BufMut) {
                buf.$write_method(self.0);
            }
        }

        impl Read for BigEndian<$type> {
            type Cfg = ();
            #[inline]
            fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                at_least(buf, std::mem::size_of::<$type>())?;
                Ok(BigEndian(buf.$read_method()))
            }
        }

        impl FixedSize for BigEndian<$type> {
            const SIZE: usize = std::mem::size_of::<$type>();
        }
    };
}

impl_big_endian!(u16, get_u16, put_u16);
impl_big_endian!(u32, get_u32, put_u32);

// Constant-size array implementation
impl<const N: usize> Write for [u8; N] {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(&self[..]);
    }
}

impl<const N: usize> Read for [u8; N] {
    type Cfg = ();
    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        at_least(buf, N)?;
        let mut dst = [0; N];
        buf.copy_to_slice(&mut dst);
        Ok(dst)
    }
}

impl<const N: usize> FixedSize for [u8; N] {
    const SIZE: usize = N;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeExt, Encode, EncodeSize};
    use bytes::Bytes;
    use paste::paste;

    macro_rules! impl_num_test {
        ($type:ty) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let expected_len = std::mem::size_of::<$type>();
                    let values: [$type; 4] = [0, 1, 42, <$type>::MAX];
                    for value in values.iter() {
                        let encoded = value.encode();
                        assert_eq!(encoded.len(), expected_len);
                        assert_eq!(&encoded[..], &value.to_le_bytes()[..]);
                        let decoded = <$type>::decode(encoded).unwrap();
                        assert_eq!(*value, decoded);
                        assert_eq!(value.encode_size(), expected_len);
                    }
                }
            }
        };
    }

    impl_num_test!(u8);
    impl_num_test!(u16);
    impl_num_test!(u32);
    impl_num_test!(u64);

    #[test]
    fn test_big_endian() {
        let value = BigEndian(0x0000_0102u32);
        let encoded = value.encode();
        assert_eq!(&encoded[..], &[0x00, 0x00, 0x01, 0x02]);
        assert_eq!(BigEndian::<u32>::decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_array() {
        let magic = [0xFE, b'S', b'M', b'B'];
        let encoded = magic.encode();
        assert_eq!(&encoded[..], &magic[..]);
        assert_eq!(<[u8; 4]>::decode(encoded).unwrap(), magic);
        assert!(matches!(
            <[u8; 4]>::decode(Bytes::from_static(&[1, 2, 3])),
            Err(Error::EndOfBuffer)
        ));
    }
}

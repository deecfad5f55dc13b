//! Core codec traits and implementations

use crate::error::Error;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Trait for types that can be written (encoded) to a buffer.
///
/// This is a field's `pack` operation. Derived fields (lengths, counts, offsets, padding) are
/// computed from the value's content while writing, never taken from the caller.
pub trait Write {
    /// Encodes this value by writing to a buffer.
    ///
    /// Implementations panic if a derived value does not fit its declared width. That is an
    /// invariant violation on the caller's side and must never reach the wire.
    fn write(&self, buf: &mut impl BufMut);
}

/// Trait for types that know the exact number of bytes [`Write::write`] produces.
///
/// This is a field's `resolved_size` operation.
pub trait EncodeSize {
    /// Returns the encoded size of this value (in bytes).
    fn encode_size(&self) -> usize;
}

/// Trait for types with a known, fixed encoded size.
pub trait FixedSize {
    /// The encoded size of this type (in bytes).
    const SIZE: usize;
}

// Types with a fixed size resolve their encoded size without inspecting the value.
impl<T: FixedSize> EncodeSize for T {
    #[inline]
    fn encode_size(&self) -> usize {
        Self::SIZE
    }
}

/// Trait for types that can be read (decoded) from a buffer.
///
/// This is a field's `unpack` operation: it consumes exactly the bytes that belong to the value
/// from the front of `buf` and leaves the rest for the next field.
pub trait Read: Sized {
    /// Configuration needed to decode the value.
    ///
    /// Sizes resolved from sibling fields (a byte length or an element count) and bounds on
    /// untrusted input are passed here. Use `()` when no configuration is needed.
    type Cfg;

    /// Reads a value from the buffer using the provided configuration `cfg`.
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error>;
}

/// Trait combining [`Write`] and [`EncodeSize`] for types that can be fully encoded.
pub trait Encode: Write + EncodeSize {
    /// Encodes the value into a new buffer.
    ///
    /// Panics if [`Write::write`] does not produce exactly [`EncodeSize::encode_size`] bytes.
    fn encode(&self) -> BytesMut {
        let len = self.encode_size();
        let mut buffer = BytesMut::with_capacity(len);
        self.write(&mut buffer);
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        buffer
    }

    /// Encodes the value into an immutable [`Bytes`].
    fn encode_bytes(&self) -> Bytes {
        self.encode().freeze()
    }
}

impl<T: Write + EncodeSize> Encode for T {}

/// Trait for types that can be decoded from a buffer that holds exactly one value.
pub trait Decode: Read {
    /// Decodes a value from `buf`, failing if any bytes are left over.
    fn decode_cfg(mut buf: impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let result = Self::read_cfg(&mut buf, cfg)?;

        // Check that the buffer is fully consumed.
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(result)
    }
}

impl<T: Read> Decode for T {}

/// Trait for types that can be encoded and decoded.
pub trait Codec: Encode + Decode {}

impl<T: Encode + Decode> Codec for T {}

/// Extension trait providing an ergonomic read method for types requiring no configuration.
pub trait ReadExt: Read<Cfg = ()> {
    /// Reads a value using the default `()` config.
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        <Self as Read>::read_cfg(buf, &())
    }
}

impl<T: Read<Cfg = ()>> ReadExt for T {}

/// Extension trait providing an ergonomic decode method for types requiring no configuration.
pub trait DecodeExt: Read<Cfg = ()> {
    /// Decodes a value using the default `()` config.
    fn decode(buf: impl Buf) -> Result<Self, Error> {
        <Self as Decode>::decode_cfg(buf, &())
    }
}

impl<T: Read<Cfg = ()>> DecodeExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_insufficient_buffer() {
        let mut reader = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(u32::read(&mut reader), Err(Error::EndOfBuffer)));
    }

    #[test]
    fn test_extra_data() {
        let encoded = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(u8::decode(encoded), Err(Error::ExtraData(1))));
    }

    #[test]
    fn test_encode_size_matches() {
        let value = 0x0102_0304u32;
        let encoded = value.encode();
        assert_eq!(encoded.len(), value.encode_size());
        assert_eq!(&encoded[..], &[0x04, 0x03, 0x02, 0x01]);
    }

    struct Liar;

    impl Write for Liar {
        fn write(&self, buf: &mut impl BufMut) {
            buf.put_u8(0);
        }
    }

    impl EncodeSize for Liar {
        fn encode_size(&self) -> usize {
            2
        }
    }

    #[test]
    #[should_panic(expected = "write() did not write expected bytes")]
    fn test_encode_size_mismatch_panics() {
        Liar.encode();
    }
}

//! Buffer, alignment and field-attribution helpers shared by every record.

use crate::{Error, Read};
use bytes::{Buf, BufMut, Bytes};

/// Alignment (in bytes) required between consecutive context entries and before every context
/// area.
pub const ALIGNMENT: usize = 8;

/// Checks that at least `len` bytes remain in the buffer.
#[inline]
pub fn at_least<B: Buf>(buf: &B, len: usize) -> Result<(), Error> {
    if buf.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

/// Rounds `offset` up to the next multiple of `alignment`.
#[inline]
pub const fn align_up(offset: usize, alignment: usize) -> usize {
    offset.div_ceil(alignment) * alignment
}

/// Returns the number of zero bytes needed after `offset` to reach the next multiple of
/// `alignment` (zero if already aligned).
#[inline]
pub const fn padding(offset: usize, alignment: usize) -> usize {
    align_up(offset, alignment) - offset
}

/// Writes `len` zero bytes.
#[inline]
pub fn write_padding(buf: &mut impl BufMut, len: usize) {
    buf.put_bytes(0, len);
}

/// Narrows a measured size to the width of the field that declares it.
///
/// Panics with the field name if the value does not fit: a length field that cannot represent
/// its data is an invariant violation, never a runtime condition.
#[inline]
pub fn fit<T>(field: &'static str, value: usize) -> T
where
    T: TryFrom<usize>,
{
    match T::try_from(value) {
        Ok(v) => v,
        Err(_) => panic!("{field} cannot represent {value}"),
    }
}

/// Reads the fields of one record in wire order, attributing any failure to the field name
/// and its byte offset from the start of the record.
pub struct FieldReader<'a, B: Buf> {
    buf: &'a mut B,
    origin: usize,
}

impl<'a, B: Buf> FieldReader<'a, B> {
    /// Starts a record at the current position of `buf`.
    pub fn new(buf: &'a mut B) -> Self {
        let origin = buf.remaining();
        Self { buf, origin }
    }

    /// Number of bytes consumed since the start of the record.
    pub fn position(&self) -> usize {
        self.origin - self.buf.remaining()
    }

    /// Number of bytes left in the underlying buffer.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Reads a field that requires no configuration.
    pub fn read<T: Read<Cfg = ()>>(&mut self, field: &'static str) -> Result<T, Error> {
        self.read_cfg(field, &())
    }

    /// Reads a field whose shape is resolved by `cfg` (a sibling length, count or selector).
    pub fn read_cfg<T: Read>(&mut self, field: &'static str, cfg: &T::Cfg) -> Result<T, Error> {
        let offset = self.position();
        T::read_cfg(&mut *self.buf, cfg).map_err(|err| err.at(field, offset))
    }

    /// Runs a composite reader (a context area, a nested record) against the buffer,
    /// attributing any failure to `field`.
    pub fn with<T>(
        &mut self,
        field: &'static str,
        f: impl FnOnce(&mut B) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let offset = self.position();
        f(&mut *self.buf).map_err(|err| err.at(field, offset))
    }

    /// Reads the `len`-byte area declared for a nested run of entries and decodes it with `f`,
    /// attributing any failure to `field`.
    pub fn area<T>(
        &mut self,
        field: &'static str,
        len: usize,
        f: impl FnOnce(Bytes) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let offset = self.position();
        let area = self.bytes(field, len)?;
        f(area).map_err(|err| err.at(field, offset))
    }

    /// Reads exactly `len` bytes.
    pub fn bytes(&mut self, field: &'static str, len: usize) -> Result<Bytes, Error> {
        self.read_cfg::<Bytes>(field, &len)
    }

    /// Skips `len` reserved or padding bytes. Their content is ignored.
    pub fn skip(&mut self, field: &'static str, len: usize) -> Result<(), Error> {
        let offset = self.position();
        at_least(&*self.buf, len).map_err(|err| err.at(field, offset))?;
        self.buf.advance(len);
        Ok(())
    }

    /// Skips the zero padding that aligns the next field to `alignment`, measured from
    /// `base + position()` (the header-relative offset of the current position).
    pub fn align(
        &mut self,
        field: &'static str,
        base: usize,
        alignment: usize,
    ) -> Result<(), Error> {
        let pad = padding(base + self.position(), alignment);
        self.skip(field, pad)
    }

    /// Reads a field that must hold a fixed protocol constant.
    pub fn constant<T>(&mut self, field: &'static str, expected: T) -> Result<(), Error>
    where
        T: Read<Cfg = ()> + PartialEq + Into<u64> + Copy,
    {
        let offset = self.position();
        let found: T = self.read(field)?;
        if found != expected {
            return Err(Error::Mismatch {
                field,
                expected: expected.into(),
                found: found.into(),
            }
            .at(field, offset));
        }
        Ok(())
    }

    /// Reads a protocol identifier that must match `expected` byte for byte.
    pub fn magic<const N: usize>(
        &mut self,
        field: &'static str,
        expected: &[u8; N],
    ) -> Result<(), Error> {
        let offset = self.position();
        let found: [u8; N] = self.read(field)?;
        if &found != expected {
            let err = Error::InvalidData(field, "unexpected protocol identifier");
            return Err(err.at(field, offset));
        }
        Ok(())
    }

    /// Checks a declared header-relative offset against where the data actually begins.
    ///
    /// `declared` was decoded earlier in the record; `base` is the header-relative offset of
    /// the start of the record.
    pub fn offset(&self, field: &'static str, declared: usize, base: usize) -> Result<(), Error> {
        let expected = base + self.position();
        if declared != expected {
            return Err(Error::Mismatch {
                field,
                expected: expected as u64,
                found: declared as u64,
            });
        }
        Ok(())
    }

    /// Reads a `len`-byte buffer whose header-relative offset (`offset_field`) was decoded
    /// earlier in the record. The offset of an empty buffer is not checked.
    pub fn buffer(
        &mut self,
        field: &'static str,
        offset_field: &'static str,
        declared: usize,
        len: usize,
        base: usize,
    ) -> Result<Bytes, Error> {
        if len > 0 {
            let offset = self.position();
            self.offset(offset_field, declared, base)
                .map_err(|err| err.at(field, offset))?;
        }
        self.bytes(field, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use test_case::test_case;

    #[test_case(0, 0; "aligned zero")]
    #[test_case(1, 7; "one past")]
    #[test_case(6, 2; "six")]
    #[test_case(8, 0; "aligned eight")]
    #[test_case(106, 6; "negotiate dialects")]
    fn test_padding(offset: usize, expected: usize) {
        assert_eq!(padding(offset, ALIGNMENT), expected);
        assert_eq!(align_up(offset, ALIGNMENT) % ALIGNMENT, 0);
    }

    #[test]
    fn test_write_padding() {
        let mut buf = BytesMut::new();
        write_padding(&mut buf, 3);
        assert_eq!(&buf[..], &[0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "name_length cannot represent 70000")]
    fn test_fit_overflow() {
        let _: u16 = fit("name_length", 70_000);
    }

    #[test]
    fn test_reader_attribution() {
        let mut buf = Bytes::from_static(&[0x01, 0x00, 0x02]);
        let mut reader = FieldReader::new(&mut buf);
        let first: u16 = reader.read("first").unwrap();
        assert_eq!(first, 1);
        assert_eq!(reader.position(), 2);
        let err = reader.read::<u16>("second").unwrap_err();
        assert_eq!(
            err,
            Error::Field {
                field: "second",
                offset: 2,
                source: Box::new(Error::EndOfBuffer),
            }
        );
    }

    #[test]
    fn test_reader_constant() {
        let mut buf = Bytes::from_static(&[0x24, 0x00, 0x25, 0x00]);
        let mut reader = FieldReader::new(&mut buf);
        reader.constant("structure_size", 36u16).unwrap();
        let err = reader.constant("structure_size", 36u16).unwrap_err();
        assert_eq!(
            err.root(),
            &Error::Mismatch {
                field: "structure_size",
                expected: 36,
                found: 37,
            }
        );
    }

    #[test]
    fn test_reader_buffer() {
        let mut buf = Bytes::from_static(&[0x0A, 0x00, 0x02, 0x00, 0xAA, 0xBB]);
        let mut reader = FieldReader::new(&mut buf);
        let declared: u16 = reader.read("buffer_offset").unwrap();
        let len: u16 = reader.read("buffer_length").unwrap();
        let data = reader
            .buffer("buffer", "buffer_offset", declared as usize, len as usize, 6)
            .unwrap();
        assert_eq!(&data[..], &[0xAA, 0xBB]);

        let mut buf = Bytes::from_static(&[0x0B, 0x00, 0x02, 0x00, 0xAA, 0xBB]);
        let mut reader = FieldReader::new(&mut buf);
        let declared: u16 = reader.read("buffer_offset").unwrap();
        let len: u16 = reader.read("buffer_length").unwrap();
        let err = reader
            .buffer("buffer", "buffer_offset", declared as usize, len as usize, 6)
            .unwrap_err();
        assert_eq!(err.path(), "buffer");
        assert_eq!(
            err.root(),
            &Error::Mismatch {
                field: "buffer_offset",
                expected: 10,
                found: 11,
            }
        );
    }

    #[test]
    fn test_reader_empty_buffer_ignores_offset() {
        let mut buf = Bytes::from_static(&[0xFF, 0x00, 0x00, 0x00]);
        let mut reader = FieldReader::new(&mut buf);
        let declared: u16 = reader.read("buffer_offset").unwrap();
        let data = reader
            .buffer("buffer", "buffer_offset", declared as usize, 0, 64)
            .unwrap();
        assert!(data.is_empty());
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_reader_skip_past_end() {
        let mut buf = Bytes::from_static(&[0x00]);
        let mut reader = FieldReader::new(&mut buf);
        let err = reader.skip("padding", 2).unwrap_err();
        assert_eq!(err.root(), &Error::EndOfBuffer);
        assert_eq!(reader.remaining(), 1);
    }
}

//! Context chains: variable-length, type-tagged entries packed one after another.
//!
//! Two layouts occur on the wire:
//!
//! - **Counted**: the number of entries is declared by a sibling field. Every entry except the
//!   last is followed by zero padding up to the next multiple of [`ALIGNMENT`], measured from the
//!   start of the area. No padding follows the last entry.
//! - **Linked**: every entry is preceded by a 4-byte `next` word holding the distance from the
//!   start of this entry to the start of the following one, or zero for the last entry. The
//!   distance is always the entry size rounded up to [`ALIGNMENT`].
//!
//! Both layouts derive their padding (and, for linked chains, the `next` words) from the
//! entries themselves. Decoding rejects any declared `next` that disagrees with the entry it
//! links, and never reads past the end of the buffer to skip padding.
//!
//! Context areas always start on an aligned header-relative offset, so alignment measured from
//! the start of the area equals alignment measured from the start of the header.

use crate::{
    util::{align_up, at_least, fit, padding, write_padding, ALIGNMENT},
    Decode, EncodeSize, Error, RangeCfg, Read, ReadExt, Write,
};
use bytes::{Buf, BufMut, Bytes};
use tracing::trace;

/// Size of the `next` word preceding every entry of a linked chain.
pub const LINK_SIZE: usize = 4;

/// A context entry whose body is selected by a type tag.
///
/// Implementors decode the envelope (tag, lengths, offsets) themselves and hand the body bytes
/// to [`Dispatch::dispatch`], which picks the variant. Tags with no known body decode into an
/// opaque variant that keeps the raw bytes.
pub trait Dispatch: Sized {
    /// The type tag on the wire (a code or a name).
    type Tag;

    /// Configuration needed to select or decode a body (for example, the message direction).
    type Cfg;

    /// Returns the tag this entry is written with.
    fn tag(&self) -> Self::Tag;

    /// Decodes the body that follows `tag`. `data` holds exactly the declared body bytes.
    fn dispatch(tag: Self::Tag, data: Bytes, cfg: &Self::Cfg) -> Result<Self, Error>;
}

/// Decodes a body that must occupy all of `data`.
pub fn body<T: Read>(data: Bytes, cfg: &T::Cfg) -> Result<T, Error> {
    T::decode_cfg(data, cfg)
}

/// A layout for a repeated run of context entries.
pub trait Scheme {
    /// What the decoder needs to know about the run (a count, or a bound on the count).
    type Cfg;

    /// Returns the encoded size of `entries` laid out with this scheme.
    fn size<E: EncodeSize>(entries: &[E]) -> usize;

    /// Writes `entries`, deriving every padding run and link word.
    fn write<E: Write + EncodeSize>(entries: &[E], buf: &mut impl BufMut);

    /// Reads a run of entries, each decoded with `entry`.
    fn read<E: Read>(buf: &mut impl Buf, cfg: &Self::Cfg, entry: &E::Cfg)
        -> Result<Vec<E>, Error>;

    /// Decodes a run of entries that must occupy all of `area`.
    fn decode<E: Read>(
        mut area: Bytes,
        cfg: &Self::Cfg,
        entry: &E::Cfg,
    ) -> Result<Vec<E>, Error> {
        let entries = Self::read(&mut area, cfg, entry)?;
        if area.has_remaining() {
            return Err(Error::ExtraData(area.remaining()));
        }
        Ok(entries)
    }
}

/// Entries counted by a sibling field, aligned to [`ALIGNMENT`] from the start of the area.
#[derive(Clone, Copy, Debug)]
pub struct Counted;

impl Scheme for Counted {
    /// Exact number of entries. The caller bounds it before reading.
    type Cfg = usize;

    fn size<E: EncodeSize>(entries: &[E]) -> usize {
        let mut size = 0;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                size = align_up(size, ALIGNMENT);
            }
            size += entry.encode_size();
        }
        size
    }

    fn write<E: Write + EncodeSize>(entries: &[E], buf: &mut impl BufMut) {
        let mut written = 0;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                let pad = padding(written, ALIGNMENT);
                write_padding(buf, pad);
                written += pad;
            }
            entry.write(buf);
            written += entry.encode_size();
        }
    }

    fn read<E: Read>(buf: &mut impl Buf, count: &usize, cfg: &E::Cfg) -> Result<Vec<E>, Error> {
        let start = buf.remaining();
        let mut entries = Vec::with_capacity((*count).min(start));
        for i in 0..*count {
            let mut offset = start - buf.remaining();
            if i > 0 {
                let pad = padding(offset, ALIGNMENT);
                at_least(&*buf, pad).map_err(|err| err.at("padding", offset))?;
                buf.advance(pad);
                offset += pad;
            }
            let entry = E::read_cfg(buf, cfg).map_err(|err| err.at("entry", offset))?;
            entries.push(entry);
        }
        trace!(count = *count, size = start - buf.remaining(), "read counted contexts");
        Ok(entries)
    }
}

/// Entries chained by a leading `next` word, zero on the last entry.
#[derive(Clone, Copy, Debug)]
pub struct Linked;

impl Scheme for Linked {
    /// Bound on the number of entries in the chain.
    type Cfg = RangeCfg;

    fn size<E: EncodeSize>(entries: &[E]) -> usize {
        let Some((last, rest)) = entries.split_last() else {
            return 0;
        };
        let linked: usize = rest
            .iter()
            .map(|entry| align_up(LINK_SIZE + entry.encode_size(), ALIGNMENT))
            .sum();
        linked + LINK_SIZE + last.encode_size()
    }

    fn write<E: Write + EncodeSize>(entries: &[E], buf: &mut impl BufMut) {
        let count = entries.len();
        for (i, entry) in entries.iter().enumerate() {
            let size = LINK_SIZE + entry.encode_size();
            if i + 1 == count {
                0u32.write(buf);
                entry.write(buf);
            } else {
                let next = align_up(size, ALIGNMENT);
                fit::<u32>("next", next).write(buf);
                entry.write(buf);
                write_padding(buf, next - size);
            }
        }
    }

    /// Follows `next` words until one is zero, stopping as soon as the chain holds more entries
    /// than `limit` allows.
    ///
    /// Each linked entry must fit inside the distance its `next` word declares, and that
    /// distance must be the entry size rounded up to [`ALIGNMENT`].
    fn read<E: Read>(
        buf: &mut impl Buf,
        limit: &RangeCfg,
        cfg: &E::Cfg,
    ) -> Result<Vec<E>, Error> {
        let start = buf.remaining();
        let mut entries = Vec::new();
        loop {
            let count = entries.len() + 1;
            if limit.exceeds(count) {
                return Err(Error::InvalidLength(count));
            }
            let offset = start - buf.remaining();
            let next = u32::read(buf).map_err(|err| err.at("next", offset))? as usize;
            if next == 0 {
                let entry =
                    E::read_cfg(buf, cfg).map_err(|err| err.at("entry", offset + LINK_SIZE))?;
                entries.push(entry);
                break;
            }

            // The linked span holds the entry and its trailing padding.
            let span = next
                .checked_sub(LINK_SIZE)
                .ok_or(Error::InvalidLength(next))
                .and_then(|span| at_least(&*buf, span).map(|_| span))
                .map_err(|err| err.at("next", offset))?;
            let mut chunk: Bytes = buf.copy_to_bytes(span);
            let entry = E::read_cfg(&mut chunk, cfg)
                .map_err(|err| err.at("entry", offset + LINK_SIZE))?;
            let expected = align_up(LINK_SIZE + span - chunk.remaining(), ALIGNMENT);
            if next != expected {
                return Err(Error::Mismatch {
                    field: "next",
                    expected: expected as u64,
                    found: next as u64,
                }
                .at("next", offset));
            }
            entries.push(entry);
        }
        limit.check(entries.len())?;
        trace!(
            count = entries.len(),
            size = start - buf.remaining(),
            "read linked contexts"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{util::FieldReader, Encode};
    use bytes::BytesMut;

    /// Test entry: a u16 tag, a u16 length, then the data.
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Entry {
        tag: u16,
        data: Bytes,
    }

    impl Entry {
        fn new(tag: u16, data: &'static [u8]) -> Self {
            Self {
                tag,
                data: Bytes::from_static(data),
            }
        }
    }

    impl Write for Entry {
        fn write(&self, buf: &mut impl BufMut) {
            self.tag.write(buf);
            fit::<u16>("data_length", self.data.len()).write(buf);
            self.data.write(buf);
        }
    }

    impl EncodeSize for Entry {
        fn encode_size(&self) -> usize {
            4 + self.data.len()
        }
    }

    impl Read for Entry {
        type Cfg = ();

        fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
            let mut reader = FieldReader::new(buf);
            let tag = reader.read("tag")?;
            let len: u16 = reader.read("data_length")?;
            let data = reader.bytes("data", len as usize)?;
            Ok(Self { tag, data })
        }
    }

    struct Area(Vec<Entry>);

    impl Write for Area {
        fn write(&self, buf: &mut impl BufMut) {
            Counted::write(&self.0, buf);
        }
    }

    impl EncodeSize for Area {
        fn encode_size(&self) -> usize {
            Counted::size(&self.0)
        }
    }

    struct Chain(Vec<Entry>);

    impl Write for Chain {
        fn write(&self, buf: &mut impl BufMut) {
            Linked::write(&self.0, buf);
        }
    }

    impl EncodeSize for Chain {
        fn encode_size(&self) -> usize {
            Linked::size(&self.0)
        }
    }

    #[test]
    fn test_counted_padding_between_entries() {
        let entries = vec![Entry::new(1, &[0xaa]), Entry::new(2, &[0xbb, 0xcc])];
        let encoded = Area(entries.clone()).encode();
        assert_eq!(
            &encoded[..],
            &[
                0x01, 0x00, 0x01, 0x00, 0xaa, 0x00, 0x00, 0x00, // first, padded to 8
                0x02, 0x00, 0x02, 0x00, 0xbb, 0xcc, // last, no trailing padding
            ]
        );

        let mut buf = encoded.freeze();
        let decoded: Vec<Entry> = Counted::read(&mut buf, &2, &()).unwrap();
        assert_eq!(decoded, entries);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_counted_empty() {
        assert_eq!(Counted::size::<Entry>(&[]), 0);
        let mut buf = Bytes::from_static(&[0xff]);
        let decoded: Vec<Entry> = Counted::read(&mut buf, &0, &()).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn test_counted_aligned_entry_has_no_padding() {
        let entries = vec![Entry::new(1, &[1, 2, 3, 4]), Entry::new(2, &[])];
        assert_eq!(Counted::size(&entries), 12);
    }

    #[test]
    fn test_counted_truncated_padding() {
        // First entry ends at 5; padding to 8 is cut short.
        let mut buf = Bytes::from_static(&[0x01, 0x00, 0x01, 0x00, 0xaa, 0x00]);
        let err = Counted::read::<Entry>(&mut buf, &2, &()).unwrap_err();
        assert_eq!(err.path(), "padding");
        assert_eq!(err.root(), &Error::EndOfBuffer);
    }

    #[test]
    fn test_linked_chain() {
        let entries = vec![
            Entry::new(0x0a, &[1]),
            Entry::new(0x0b, &[1, 2, 3, 4]),
            Entry::new(0x0c, &[9, 9]),
        ];
        let encoded = Chain(entries.clone()).encode();

        // A: next 16 (4 + 5 = 9, aligned), B: next 16 (4 + 8 = 12, aligned), C: next 0.
        assert_eq!(&encoded[0..4], &16u32.to_le_bytes());
        assert_eq!(&encoded[16..20], &16u32.to_le_bytes());
        assert_eq!(&encoded[32..36], &0u32.to_le_bytes());
        assert_eq!(encoded.len(), 32 + 4 + 6);

        let mut buf = encoded.freeze();
        let decoded: Vec<Entry> = Linked::read(&mut buf, &RangeCfg::default(), &()).unwrap();
        assert_eq!(decoded, entries);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_linked_empty() {
        assert_eq!(Linked::size::<Entry>(&[]), 0);
        assert!(Chain(vec![]).encode().is_empty());
    }

    #[test]
    fn test_linked_next_outside_buffer() {
        let mut raw = BytesMut::new();
        64u32.write(&mut raw);
        Entry::new(1, &[1]).write(&mut raw);
        let mut buf = raw.freeze();
        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::default(), &()).unwrap_err();
        assert_eq!(err.path(), "next");
        assert_eq!(err.root(), &Error::EndOfBuffer);
    }

    #[test]
    fn test_linked_next_mismatch() {
        // Entry occupies 4 + 5 = 9 bytes, so next must be 16, not 24.
        let mut raw = BytesMut::new();
        24u32.write(&mut raw);
        Entry::new(1, &[1]).write(&mut raw);
        write_padding(&mut raw, 15);
        0u32.write(&mut raw);
        Entry::new(2, &[]).write(&mut raw);
        let mut buf = raw.freeze();
        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::default(), &()).unwrap_err();
        assert_eq!(
            err.root(),
            &Error::Mismatch {
                field: "next",
                expected: 16,
                found: 24,
            }
        );
    }

    #[test]
    fn test_linked_entry_overruns_span() {
        // next = 8 leaves 4 bytes for an entry that declares 8 bytes of data.
        let mut raw = BytesMut::new();
        8u32.write(&mut raw);
        1u16.write(&mut raw);
        8u16.write(&mut raw);
        write_padding(&mut raw, 16);
        let mut buf = raw.freeze();
        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::default(), &()).unwrap_err();
        assert_eq!(err.path(), "entry.data");
        assert_eq!(err.root(), &Error::EndOfBuffer);
    }

    #[test]
    fn test_linked_next_too_small() {
        let mut buf = Bytes::from_static(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::default(), &()).unwrap_err();
        assert_eq!(err.root(), &Error::InvalidLength(2));
    }

    #[test]
    fn test_counted_decode_rejects_trailing_bytes() {
        let mut raw = Area(vec![Entry::new(1, &[0xaa])]).encode();
        raw.extend_from_slice(&[0, 0]);
        let err = Counted::decode::<Entry>(raw.freeze(), &1, &()).unwrap_err();
        assert_eq!(err, Error::ExtraData(2));
    }

    #[test]
    fn test_linked_limit_stops_walk() {
        // Five valid entries, then one that declares more data than the buffer holds.
        let mut raw = Chain(vec![Entry::new(1, &[]); 5]).encode();
        raw[32..36].copy_from_slice(&8u32.to_le_bytes());
        let mut malformed = BytesMut::new();
        0u32.write(&mut malformed);
        6u16.write(&mut malformed);
        100u16.write(&mut malformed);
        raw.extend_from_slice(&malformed);
        let mut buf = raw.freeze();

        // The unbounded walk reaches the malformed entry.
        let err = Linked::read::<Entry>(&mut buf.clone(), &RangeCfg::default(), &()).unwrap_err();
        assert_eq!(err.path(), "entry.data");

        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::from(..=1), &()).unwrap_err();
        assert_eq!(err, Error::InvalidLength(2));
    }

    #[test]
    fn test_linked_lower_bound() {
        let mut buf = Chain(vec![Entry::new(1, &[])]).encode().freeze();
        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::from(2..), &()).unwrap_err();
        assert_eq!(err, Error::InvalidLength(1));
    }

    #[test]
    fn test_linked_limit() {
        let entries = vec![Entry::new(1, &[]), Entry::new(2, &[])];
        let mut buf = Chain(entries).encode().freeze();
        let err = Linked::read::<Entry>(&mut buf, &RangeCfg::from(..=1), &()).unwrap_err();
        assert_eq!(err, Error::InvalidLength(2));
    }
}

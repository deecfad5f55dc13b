//! SMB2/3 sync header.

use crate::{
    config::HeaderForm,
    constants::{Command, HeaderFlags, Status},
    HEADER_SIZE,
};
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{EncodeSize, Error, FieldReader, Read, Write};

/// Protocol identifier of an SMB2 header.
pub const SMB2_MAGIC: [u8; 4] = [0xFE, b'S', b'M', b'B'];

/// Bytes 8 through 15 of the header, which depend on who sends it and on the dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusField {
    /// Status of the response (or zero in a request).
    Status(Status),

    /// Channel sequence of a request on an SMB 3.x connection. The 2 bytes that follow are
    /// reserved.
    ChannelSequence(u16),
}

impl Default for StatusField {
    fn default() -> Self {
        Self::Status(Status::Success)
    }
}

impl StatusField {
    /// Returns the layout this field is written with.
    pub fn form(&self) -> HeaderForm {
        match self {
            Self::Status(_) => HeaderForm::Status,
            Self::ChannelSequence(_) => HeaderForm::ChannelSequence,
        }
    }
}

/// The 64-byte header that precedes every SMB2/3 message, and the body bytes after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub credit_charge: u16,
    pub status: StatusField,
    pub command: Command,
    pub credit: u16,
    pub flags: HeaderFlags,
    /// Offset from the start of this header to the next header of a compound, or zero.
    pub next_command: u32,
    pub message_id: u64,
    pub process_id: u32,
    pub tree_id: u32,
    pub session_id: u64,
    pub signature: [u8; 16],
    /// Everything after the header. Decode it with [`crate::Body::parse`].
    pub data: Bytes,
}

impl Header {
    /// Returns a header for `command` with every other field zeroed.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }

    /// Returns true if the header was sent by a server.
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::SERVER_TO_REDIR)
    }

    /// Returns the status, or `None` if the header carries a channel sequence.
    pub fn status(&self) -> Option<Status> {
        match self.status {
            StatusField::Status(status) => Some(status),
            StatusField::ChannelSequence(_) => None,
        }
    }

    /// Returns the bytes of this message's body, excluding any compounded messages that follow.
    pub fn body(&self) -> Bytes {
        let next = self.next_command as usize;
        if next > HEADER_SIZE && next - HEADER_SIZE < self.data.len() {
            return self.data.slice(..next - HEADER_SIZE);
        }
        self.data.clone()
    }
}

impl Write for Header {
    fn write(&self, buf: &mut impl BufMut) {
        SMB2_MAGIC.write(buf);
        (HEADER_SIZE as u16).write(buf);
        self.credit_charge.write(buf);
        match self.status {
            StatusField::Status(status) => status.write(buf),
            StatusField::ChannelSequence(sequence) => {
                sequence.write(buf);
                0u16.write(buf);
            }
        }
        self.command.write(buf);
        self.credit.write(buf);
        self.flags.write(buf);
        self.next_command.write(buf);
        self.message_id.write(buf);
        self.process_id.write(buf);
        self.tree_id.write(buf);
        self.session_id.write(buf);
        self.signature.write(buf);
        self.data.write(buf);
    }
}

impl EncodeSize for Header {
    fn encode_size(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }
}

impl Read for Header {
    /// Which layout bytes 8 through 15 use.
    type Cfg = HeaderForm;

    fn read_cfg(buf: &mut impl Buf, form: &HeaderForm) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.magic("protocol_id", &SMB2_MAGIC)?;
        reader.constant("structure_size", HEADER_SIZE as u16)?;
        let credit_charge = reader.read("credit_charge")?;
        let status = match form {
            HeaderForm::Status => StatusField::Status(reader.read("status")?),
            HeaderForm::ChannelSequence => {
                let sequence = reader.read("channel_sequence")?;
                reader.skip("reserved", 2)?;
                StatusField::ChannelSequence(sequence)
            }
        };
        let command = reader.read("command")?;
        let credit = reader.read("credit")?;
        let flags = reader.read("flags")?;
        let next_command = reader.read("next_command")?;
        let message_id = reader.read("message_id")?;
        let process_id = reader.read("process_id")?;
        let tree_id = reader.read("tree_id")?;
        let session_id = reader.read("session_id")?;
        let signature = reader.read("signature")?;
        let data = reader.bytes("data", reader.remaining())?;
        Ok(Self {
            credit_charge,
            status,
            command,
            credit,
            flags,
            next_command,
            message_id,
            process_id,
            tree_id,
            session_id,
            signature,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbwire_codec::{Decode, Encode};

    fn sample(status: StatusField) -> Header {
        Header {
            credit_charge: 1,
            status,
            command: Command::Create,
            credit: 31,
            flags: HeaderFlags::SIGNED,
            next_command: 0,
            message_id: 7,
            process_id: 0xFEFF,
            tree_id: 5,
            session_id: 0x1122_3344_5566_7788,
            signature: [0xAB; 16],
            data: Bytes::from_static(&[1, 2, 3]),
        }
    }

    #[test]
    fn test_status_form() {
        let header = sample(StatusField::Status(Status::AccessDenied));
        let encoded = header.encode();
        assert_eq!(encoded.len(), 67);
        assert_eq!(&encoded[..6], &[0xFE, b'S', b'M', b'B', 64, 0]);
        assert_eq!(&encoded[8..12], &[0x22, 0x00, 0x00, 0xC0]);
        assert_eq!(&encoded[12..14], &[0x05, 0x00]);
        let decoded = Header::decode_cfg(encoded, &HeaderForm::Status).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_channel_sequence_form() {
        let header = sample(StatusField::ChannelSequence(3));
        let mut encoded = header.encode();
        assert_eq!(&encoded[8..12], &[0x03, 0x00, 0x00, 0x00]);

        // Reserved bytes are ignored on read.
        encoded[10] = 0xFF;
        let decoded = Header::decode_cfg(encoded, &header.status.form()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_bad_structure_size() {
        let mut encoded = sample(StatusField::default()).encode();
        encoded[4] = 65;
        let err = Header::decode_cfg(encoded, &HeaderForm::Status).unwrap_err();
        assert_eq!(err.path(), "structure_size");
    }

    #[test]
    fn test_truncated() {
        let encoded = sample(StatusField::default()).encode();
        let err = Header::decode_cfg(encoded.freeze().slice(..30), &HeaderForm::Status)
            .unwrap_err();
        assert_eq!(err.path(), "message_id");
        assert_eq!(err.root(), &Error::EndOfBuffer);
    }

    #[test]
    fn test_compound_body() {
        let mut header = sample(StatusField::default());
        header.data = Bytes::from_static(&[0xAA; 16]);
        header.next_command = 72;
        assert_eq!(header.body().len(), 8);
        header.next_command = 0;
        assert_eq!(header.body().len(), 16);
    }
}

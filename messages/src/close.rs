//! Close request and response.

use crate::{
    constants::{CloseFlags, FileAttributes},
    create::FileId,
};
use bytes::{Buf, BufMut};
use smbwire_codec::{Error, FieldReader, FileTime, FixedSize, Read, Write};

const REQUEST_STRUCTURE_SIZE: u16 = 24;
const RESPONSE_STRUCTURE_SIZE: u16 = 60;

/// `SMB2 CLOSE` request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloseRequest {
    pub flags: CloseFlags,
    pub file_id: FileId,
}

impl Write for CloseRequest {
    fn write(&self, buf: &mut impl BufMut) {
        REQUEST_STRUCTURE_SIZE.write(buf);
        self.flags.write(buf);
        0u32.write(buf);
        self.file_id.write(buf);
    }
}

impl FixedSize for CloseRequest {
    const SIZE: usize = 24;
}

impl Read for CloseRequest {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", REQUEST_STRUCTURE_SIZE)?;
        let flags = reader.read("flags")?;
        reader.skip("reserved", 4)?;
        let file_id = reader.read("file_id")?;
        Ok(Self { flags, file_id })
    }
}

/// `SMB2 CLOSE` response.
///
/// The attributes are only set when the request asked for them with
/// [`CloseFlags::POSTQUERY_ATTRIB`]; otherwise they are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloseResponse {
    pub flags: CloseFlags,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub change_time: FileTime,
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub file_attributes: FileAttributes,
}

impl Write for CloseResponse {
    fn write(&self, buf: &mut impl BufMut) {
        RESPONSE_STRUCTURE_SIZE.write(buf);
        self.flags.write(buf);
        0u32.write(buf);
        self.creation_time.write(buf);
        self.last_access_time.write(buf);
        self.last_write_time.write(buf);
        self.change_time.write(buf);
        self.allocation_size.write(buf);
        self.end_of_file.write(buf);
        self.file_attributes.write(buf);
    }
}

impl FixedSize for CloseResponse {
    const SIZE: usize = 60;
}

impl Read for CloseResponse {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", RESPONSE_STRUCTURE_SIZE)?;
        let flags = reader.read("flags")?;
        reader.skip("reserved", 4)?;
        let creation_time = reader.read("creation_time")?;
        let last_access_time = reader.read("last_access_time")?;
        let last_write_time = reader.read("last_write_time")?;
        let change_time = reader.read("change_time")?;
        let allocation_size = reader.read("allocation_size")?;
        let end_of_file = reader.read("end_of_file")?;
        let file_attributes = reader.read("file_attributes")?;
        Ok(Self {
            flags,
            creation_time,
            last_access_time,
            last_write_time,
            change_time,
            allocation_size,
            end_of_file,
            file_attributes,
        })
    }
}

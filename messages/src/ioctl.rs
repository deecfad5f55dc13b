//! IOCTL request and response, and the `FSCTL_VALIDATE_NEGOTIATE_INFO` payloads.

use crate::{
    constants::{Capabilities, CtlCode, Dialect, IoctlFlags, SecurityMode},
    create::FileId,
    HEADER_SIZE,
};
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{
    util::{align_up, fit, padding, write_padding, ALIGNMENT},
    DecodeExt, Encode, EncodeSize, Error, FieldReader, FixedSize, Read, Write,
};
use uuid::Uuid;

const REQUEST_STRUCTURE_SIZE: u16 = 57;
const RESPONSE_STRUCTURE_SIZE: u16 = 49;

/// Header-relative offset of the input buffer in a request.
const REQUEST_BUFFER_OFFSET: usize = HEADER_SIZE + 56;

/// Header-relative offset of the input buffer in a response.
const RESPONSE_BUFFER_OFFSET: usize = HEADER_SIZE + 48;

/// `SMB2 IOCTL` request.
///
/// Requests never carry an output buffer: the output count is zero and the output offset
/// mirrors the input offset. Decoding rejects a request whose output count is not zero, so a
/// request that passes data to the server in its output buffer cannot be represented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IoctlRequest {
    pub ctl_code: CtlCode,
    pub file_id: FileId,
    pub max_input_response: u32,
    pub max_output_response: u32,
    pub flags: IoctlFlags,
    pub input: Bytes,
}

impl IoctlRequest {
    /// Wraps a `FSCTL_VALIDATE_NEGOTIATE_INFO` payload, which targets no open file.
    pub fn validate_negotiate_info(req: &ValidateNegotiateInfoRequest) -> Self {
        Self {
            ctl_code: CtlCode::ValidateNegotiateInfo,
            file_id: FileId::NONE,
            max_input_response: 0,
            max_output_response: ValidateNegotiateInfoResponse::SIZE as u32,
            flags: IoctlFlags::Fsctl,
            input: req.encode_bytes(),
        }
    }

    /// Header-relative offset of the input buffer, or zero if it is empty.
    pub fn input_offset(&self) -> usize {
        if self.input.is_empty() {
            return 0;
        }
        REQUEST_BUFFER_OFFSET
    }
}

impl Write for IoctlRequest {
    fn write(&self, buf: &mut impl BufMut) {
        let offset = fit::<u32>("input_offset", self.input_offset());
        REQUEST_STRUCTURE_SIZE.write(buf);
        0u16.write(buf);
        self.ctl_code.write(buf);
        self.file_id.write(buf);
        offset.write(buf);
        fit::<u32>("input_count", self.input.len()).write(buf);
        self.max_input_response.write(buf);
        offset.write(buf);
        0u32.write(buf);
        self.max_output_response.write(buf);
        self.flags.write(buf);
        0u32.write(buf);
        self.input.write(buf);
    }
}

impl EncodeSize for IoctlRequest {
    fn encode_size(&self) -> usize {
        REQUEST_BUFFER_OFFSET - HEADER_SIZE + self.input.len()
    }
}

impl Read for IoctlRequest {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", REQUEST_STRUCTURE_SIZE)?;
        reader.skip("reserved", 2)?;
        let ctl_code = reader.read("ctl_code")?;
        let file_id = reader.read("file_id")?;
        let input_offset: u32 = reader.read("input_offset")?;
        let input_count: u32 = reader.read("input_count")?;
        let max_input_response = reader.read("max_input_response")?;
        reader.skip("output_offset", 4)?;
        reader.constant("output_count", 0u32)?;
        let max_output_response = reader.read("max_output_response")?;
        let flags = reader.read("flags")?;
        reader.skip("reserved2", 4)?;
        let input = reader.buffer(
            "buffer",
            "input_offset",
            input_offset as usize,
            input_count as usize,
            HEADER_SIZE,
        )?;
        Ok(Self {
            ctl_code,
            file_id,
            max_input_response,
            max_output_response,
            flags,
            input,
        })
    }
}

/// `SMB2 IOCTL` response.
///
/// The output buffer starts on the first aligned offset after the input buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IoctlResponse {
    pub ctl_code: CtlCode,
    pub file_id: FileId,
    pub flags: u32,
    pub input: Bytes,
    pub output: Bytes,
}

impl IoctlResponse {
    /// Decodes the output of a `FSCTL_VALIDATE_NEGOTIATE_INFO` request.
    pub fn validate_negotiate_info(&self) -> Result<ValidateNegotiateInfoResponse, Error> {
        if self.ctl_code != CtlCode::ValidateNegotiateInfo {
            return Err(Error::Mismatch {
                field: "ctl_code",
                expected: CtlCode::ValidateNegotiateInfo.code().into(),
                found: self.ctl_code.code().into(),
            });
        }
        ValidateNegotiateInfoResponse::decode(self.output.clone())
    }

    /// Header-relative offset of the output buffer.
    pub fn output_offset(&self) -> usize {
        align_up(RESPONSE_BUFFER_OFFSET + self.input.len(), ALIGNMENT)
    }

    fn output_padding(&self) -> usize {
        if self.output.is_empty() {
            return 0;
        }
        padding(RESPONSE_BUFFER_OFFSET + self.input.len(), ALIGNMENT)
    }
}

impl Write for IoctlResponse {
    fn write(&self, buf: &mut impl BufMut) {
        RESPONSE_STRUCTURE_SIZE.write(buf);
        0u16.write(buf);
        self.ctl_code.write(buf);
        self.file_id.write(buf);
        (RESPONSE_BUFFER_OFFSET as u32).write(buf);
        fit::<u32>("input_count", self.input.len()).write(buf);
        fit::<u32>("output_offset", self.output_offset()).write(buf);
        fit::<u32>("output_count", self.output.len()).write(buf);
        self.flags.write(buf);
        0u32.write(buf);
        self.input.write(buf);
        write_padding(buf, self.output_padding());
        self.output.write(buf);
    }
}

impl EncodeSize for IoctlResponse {
    fn encode_size(&self) -> usize {
        RESPONSE_BUFFER_OFFSET - HEADER_SIZE
            + self.input.len()
            + self.output_padding()
            + self.output.len()
    }
}

impl Read for IoctlResponse {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", RESPONSE_STRUCTURE_SIZE)?;
        reader.skip("reserved", 2)?;
        let ctl_code = reader.read("ctl_code")?;
        let file_id = reader.read("file_id")?;
        let input_offset: u32 = reader.read("input_offset")?;
        let input_count: u32 = reader.read("input_count")?;
        let output_offset: u32 = reader.read("output_offset")?;
        let output_count: u32 = reader.read("output_count")?;
        let flags = reader.read("flags")?;
        reader.skip("reserved2", 4)?;
        let input = reader.buffer(
            "input_buffer",
            "input_offset",
            input_offset as usize,
            input_count as usize,
            HEADER_SIZE,
        )?;
        if output_count > 0 {
            reader.align("padding", HEADER_SIZE, ALIGNMENT)?;
        }
        let output = reader.buffer(
            "output_buffer",
            "output_offset",
            output_offset as usize,
            output_count as usize,
            HEADER_SIZE,
        )?;
        Ok(Self {
            ctl_code,
            file_id,
            flags,
            input,
            output,
        })
    }
}

/// `VALIDATE_NEGOTIATE_INFO` request: the values the client sent in its negotiate request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidateNegotiateInfoRequest {
    pub capabilities: Capabilities,
    pub guid: Uuid,
    pub security_mode: SecurityMode,
    pub dialects: Vec<Dialect>,
}

impl Write for ValidateNegotiateInfoRequest {
    fn write(&self, buf: &mut impl BufMut) {
        self.capabilities.write(buf);
        self.guid.write(buf);
        self.security_mode.write(buf);
        fit::<u16>("dialect_count", self.dialects.len()).write(buf);
        self.dialects.write(buf);
    }
}

impl EncodeSize for ValidateNegotiateInfoRequest {
    fn encode_size(&self) -> usize {
        24 + self.dialects.encode_size()
    }
}

impl Read for ValidateNegotiateInfoRequest {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let capabilities = reader.read("capabilities")?;
        let guid = reader.read("guid")?;
        let security_mode = reader.read("security_mode")?;
        let dialect_count: u16 = reader.read("dialect_count")?;
        let dialects = reader.read_cfg("dialects", &(dialect_count as usize, ()))?;
        Ok(Self {
            capabilities,
            guid,
            security_mode,
            dialects,
        })
    }
}

/// `VALIDATE_NEGOTIATE_INFO` response: the values the server selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidateNegotiateInfoResponse {
    pub capabilities: Capabilities,
    pub guid: Uuid,
    pub security_mode: SecurityMode,
    pub dialect: Dialect,
}

impl Write for ValidateNegotiateInfoResponse {
    fn write(&self, buf: &mut impl BufMut) {
        self.capabilities.write(buf);
        self.guid.write(buf);
        self.security_mode.write(buf);
        self.dialect.write(buf);
    }
}

impl FixedSize for ValidateNegotiateInfoResponse {
    const SIZE: usize = 24;
}

impl Read for ValidateNegotiateInfoResponse {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let capabilities = reader.read("capabilities")?;
        let guid = reader.read("guid")?;
        let security_mode = reader.read("security_mode")?;
        let dialect = reader.read("dialect")?;
        Ok(Self {
            capabilities,
            guid,
            security_mode,
            dialect,
        })
    }
}

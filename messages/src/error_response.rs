//! Error response and error contexts.

use crate::constants::ErrorId;
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{
    context::{Counted, Scheme},
    util::fit,
    EncodeSize, Error, FieldReader, RangeCfg, Read, Write,
};

const STRUCTURE_SIZE: u16 = 9;

/// Size of the fixed part of an error response.
const FIXED_SIZE: usize = 8;

/// `SMB2 ERROR Context Response`: one entry of an SMB 3.1.1 error context list.
///
/// The data is owned by whoever raised the error and is kept opaque.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub error_id: ErrorId,
    pub data: Bytes,
}

impl Write for ErrorContext {
    fn write(&self, buf: &mut impl BufMut) {
        fit::<u32>("error_data_length", self.data.len()).write(buf);
        self.error_id.write(buf);
        self.data.write(buf);
    }
}

impl EncodeSize for ErrorContext {
    fn encode_size(&self) -> usize {
        8 + self.data.len()
    }
}

impl Read for ErrorContext {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let length: u32 = reader.read("error_data_length")?;
        let error_id = reader.read("error_id")?;
        let data = reader.bytes("error_context_data", length as usize)?;
        Ok(Self { error_id, data })
    }
}

/// `SMB2 ERROR` response.
///
/// SMB 3.1.1 servers send a list of error contexts; earlier dialects send a single opaque
/// error data buffer. At most one of the two is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_contexts: Vec<ErrorContext>,
    pub error_data: Bytes,
}

impl ErrorResponse {
    /// Returns the size of everything after the fixed fields.
    pub fn byte_count(&self) -> usize {
        if self.error_contexts.is_empty() {
            return self.error_data.len();
        }
        Counted::size(&self.error_contexts)
    }
}

impl Write for ErrorResponse {
    fn write(&self, buf: &mut impl BufMut) {
        assert!(
            self.error_contexts.is_empty() || self.error_data.is_empty(),
            "error response cannot carry both error contexts and error data"
        );
        STRUCTURE_SIZE.write(buf);
        fit::<u8>("error_context_count", self.error_contexts.len()).write(buf);
        0u8.write(buf);
        fit::<u32>("byte_count", self.byte_count()).write(buf);
        if self.error_contexts.is_empty() {
            self.error_data.write(buf);
        } else {
            Counted::write(&self.error_contexts, buf);
        }
    }
}

impl EncodeSize for ErrorResponse {
    fn encode_size(&self) -> usize {
        FIXED_SIZE + self.byte_count()
    }
}

impl Read for ErrorResponse {
    /// Bound on the number of error contexts.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, limit: &RangeCfg) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", STRUCTURE_SIZE)?;
        let count: u8 = reader.read("error_context_count")?;
        reader.skip("reserved", 1)?;
        let byte_count: u32 = reader.read("byte_count")?;
        if count == 0 {
            let error_data = reader.bytes("error_data", byte_count as usize)?;
            return Ok(Self {
                error_contexts: Vec::new(),
                error_data,
            });
        }

        let count = count as usize;
        limit
            .check(count)
            .map_err(|err| err.at("error_context_count", 2))?;
        let error_contexts = reader.area("error_data", byte_count as usize, |area| {
            Counted::decode(area, &count, &())
        })?;
        Ok(Self {
            error_contexts,
            error_data: Bytes::new(),
        })
    }
}

//! Negotiate request and response, and the negotiate contexts carried by SMB 3.1.1.

use crate::{
    constants::{
        Capabilities, Cipher, CompressionAlgorithm, CompressionFlags, Dialect, HashAlgorithm,
        NegotiateContextType, SecurityMode, SigningAlgorithm,
    },
    utf16, HEADER_SIZE,
};
use bytes::{Buf, BufMut, Bytes};
use smbwire_codec::{
    context::{body, Counted, Dispatch, Scheme},
    util::{align_up, fit, padding, write_padding, ALIGNMENT},
    EncodeSize, Error, FieldReader, FileTime, FixedSize, RangeCfg, Read, Write,
};
use tracing::debug;
use uuid::Uuid;

/// Size of the fixed part of a negotiate request.
const REQUEST_STRUCTURE_SIZE: usize = 36;

/// Declared structure size of a negotiate response (the fixed part plus one buffer byte).
const RESPONSE_STRUCTURE_SIZE: u16 = 65;

/// Header-relative offset of the security buffer in a negotiate response.
pub const SECURITY_BUFFER_OFFSET: usize = HEADER_SIZE + 64;

/// Size of the type, length and reserved fields preceding every negotiate context body.
const CONTEXT_HEADER_SIZE: usize = 8;

/// `SMB2_PREAUTH_INTEGRITY_CAPABILITIES`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreauthIntegrityCapabilities {
    pub hash_algorithms: Vec<HashAlgorithm>,
    pub salt: Bytes,
}

impl Write for PreauthIntegrityCapabilities {
    fn write(&self, buf: &mut impl BufMut) {
        fit::<u16>("hash_algorithm_count", self.hash_algorithms.len()).write(buf);
        fit::<u16>("salt_length", self.salt.len()).write(buf);
        self.hash_algorithms.write(buf);
        self.salt.write(buf);
    }
}

impl EncodeSize for PreauthIntegrityCapabilities {
    fn encode_size(&self) -> usize {
        4 + self.hash_algorithms.encode_size() + self.salt.len()
    }
}

impl Read for PreauthIntegrityCapabilities {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let count: u16 = reader.read("hash_algorithm_count")?;
        let salt_length: u16 = reader.read("salt_length")?;
        let hash_algorithms = reader.read_cfg("hash_algorithms", &(count as usize, ()))?;
        let salt = reader.bytes("salt", salt_length as usize)?;
        Ok(Self {
            hash_algorithms,
            salt,
        })
    }
}

/// `SMB2_ENCRYPTION_CAPABILITIES`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncryptionCapabilities {
    pub ciphers: Vec<Cipher>,
}

impl Write for EncryptionCapabilities {
    fn write(&self, buf: &mut impl BufMut) {
        fit::<u16>("cipher_count", self.ciphers.len()).write(buf);
        self.ciphers.write(buf);
    }
}

impl EncodeSize for EncryptionCapabilities {
    fn encode_size(&self) -> usize {
        u16::SIZE + self.ciphers.encode_size()
    }
}

impl Read for EncryptionCapabilities {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let count: u16 = reader.read("cipher_count")?;
        let ciphers = reader.read_cfg("ciphers", &(count as usize, ()))?;
        Ok(Self { ciphers })
    }
}

/// `SMB2_COMPRESSION_CAPABILITIES`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressionCapabilities {
    pub flags: CompressionFlags,
    pub algorithms: Vec<CompressionAlgorithm>,
}

impl Write for CompressionCapabilities {
    fn write(&self, buf: &mut impl BufMut) {
        fit::<u16>("compression_algorithm_count", self.algorithms.len()).write(buf);
        0u16.write(buf);
        self.flags.write(buf);
        self.algorithms.write(buf);
    }
}

impl EncodeSize for CompressionCapabilities {
    fn encode_size(&self) -> usize {
        8 + self.algorithms.encode_size()
    }
}

impl Read for CompressionCapabilities {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let count: u16 = reader.read("compression_algorithm_count")?;
        reader.skip("padding", 2)?;
        let flags = reader.read("flags")?;
        let algorithms = reader.read_cfg("compression_algorithms", &(count as usize, ()))?;
        Ok(Self { flags, algorithms })
    }
}

/// `SMB2_NETNAME_NEGOTIATE_CONTEXT_ID`: the server name the client connects to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetnameContextId {
    pub net_name: String,
}

impl Write for NetnameContextId {
    fn write(&self, buf: &mut impl BufMut) {
        utf16::encode(&self.net_name).write(buf);
    }
}

impl EncodeSize for NetnameContextId {
    fn encode_size(&self) -> usize {
        self.net_name.encode_utf16().count() * 2
    }
}

impl Read for NetnameContextId {
    type Cfg = ();

    /// Consumes the rest of the buffer.
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let raw = buf.copy_to_bytes(buf.remaining());
        let net_name =
            utf16::decode(&raw).ok_or(Error::InvalidData("net_name", "invalid UTF-16"))?;
        Ok(Self { net_name })
    }
}

/// `SMB2_SIGNING_CAPABILITIES`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SigningCapabilities {
    pub algorithms: Vec<SigningAlgorithm>,
}

impl Write for SigningCapabilities {
    fn write(&self, buf: &mut impl BufMut) {
        fit::<u16>("signing_algorithm_count", self.algorithms.len()).write(buf);
        self.algorithms.write(buf);
    }
}

impl EncodeSize for SigningCapabilities {
    fn encode_size(&self) -> usize {
        u16::SIZE + self.algorithms.encode_size()
    }
}

impl Read for SigningCapabilities {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let count: u16 = reader.read("signing_algorithm_count")?;
        let algorithms = reader.read_cfg("signing_algorithms", &(count as usize, ()))?;
        Ok(Self { algorithms })
    }
}

/// One entry of a negotiate context list, selected by its context type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NegotiateContext {
    PreauthIntegrity(PreauthIntegrityCapabilities),
    Encryption(EncryptionCapabilities),
    Compression(CompressionCapabilities),
    Netname(NetnameContextId),
    Signing(SigningCapabilities),
    /// A context type with no body decoder. The body is kept verbatim.
    ///
    /// Writing a kind that has a typed variant panics; use [`NegotiateContext::from_raw`] to
    /// build a context from a kind and its raw body.
    Opaque {
        kind: NegotiateContextType,
        data: Bytes,
    },
}

/// Returns true if contexts of `kind` decode into a typed variant.
const fn has_body(kind: NegotiateContextType) -> bool {
    matches!(
        kind,
        NegotiateContextType::PreauthIntegrityCapabilities
            | NegotiateContextType::EncryptionCapabilities
            | NegotiateContextType::CompressionCapabilities
            | NegotiateContextType::NetnameNegotiateContextId
            | NegotiateContextType::SigningCapabilities
    )
}

impl NegotiateContext {
    /// Builds the context that `kind` and `data` decode to.
    pub fn from_raw(kind: NegotiateContextType, data: Bytes) -> Result<Self, Error> {
        Self::dispatch(kind, data, &())
    }

    fn data_length(&self) -> usize {
        match self {
            Self::PreauthIntegrity(body) => body.encode_size(),
            Self::Encryption(body) => body.encode_size(),
            Self::Compression(body) => body.encode_size(),
            Self::Netname(body) => body.encode_size(),
            Self::Signing(body) => body.encode_size(),
            Self::Opaque { data, .. } => data.len(),
        }
    }
}

impl Dispatch for NegotiateContext {
    type Tag = NegotiateContextType;
    type Cfg = ();

    fn tag(&self) -> NegotiateContextType {
        match self {
            Self::PreauthIntegrity(_) => NegotiateContextType::PreauthIntegrityCapabilities,
            Self::Encryption(_) => NegotiateContextType::EncryptionCapabilities,
            Self::Compression(_) => NegotiateContextType::CompressionCapabilities,
            Self::Netname(_) => NegotiateContextType::NetnameNegotiateContextId,
            Self::Signing(_) => NegotiateContextType::SigningCapabilities,
            Self::Opaque { kind, .. } => *kind,
        }
    }

    fn dispatch(kind: NegotiateContextType, data: Bytes, _: &()) -> Result<Self, Error> {
        Ok(match kind {
            NegotiateContextType::PreauthIntegrityCapabilities => {
                Self::PreauthIntegrity(body(data, &())?)
            }
            NegotiateContextType::EncryptionCapabilities => Self::Encryption(body(data, &())?),
            NegotiateContextType::CompressionCapabilities => Self::Compression(body(data, &())?),
            NegotiateContextType::NetnameNegotiateContextId => Self::Netname(body(data, &())?),
            NegotiateContextType::SigningCapabilities => Self::Signing(body(data, &())?),
            kind => {
                debug!(%kind, len = data.len(), "keeping opaque negotiate context");
                Self::Opaque { kind, data }
            }
        })
    }
}

impl Write for NegotiateContext {
    fn write(&self, buf: &mut impl BufMut) {
        if let Self::Opaque { kind, .. } = self {
            assert!(!has_body(*kind), "{kind} context must use its typed variant");
        }
        self.tag().write(buf);
        fit::<u16>("data_length", self.data_length()).write(buf);
        0u32.write(buf);
        match self {
            Self::PreauthIntegrity(body) => body.write(buf),
            Self::Encryption(body) => body.write(buf),
            Self::Compression(body) => body.write(buf),
            Self::Netname(body) => body.write(buf),
            Self::Signing(body) => body.write(buf),
            Self::Opaque { data, .. } => data.write(buf),
        }
    }
}

impl EncodeSize for NegotiateContext {
    fn encode_size(&self) -> usize {
        CONTEXT_HEADER_SIZE + self.data_length()
    }
}

impl Read for NegotiateContext {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let kind = reader.read("context_type")?;
        let data_length: u16 = reader.read("data_length")?;
        reader.skip("reserved", 4)?;
        let data = reader.bytes("data", data_length as usize)?;
        Self::dispatch(kind, data, &()).map_err(|err| err.at("data", CONTEXT_HEADER_SIZE))
    }
}

/// Reads a negotiate context list whose declared offset and count were decoded earlier in the
/// record, after checking the count against `limit`.
fn read_contexts<B: Buf>(
    reader: &mut FieldReader<'_, B>,
    declared_offset: usize,
    count: usize,
    limit: &RangeCfg,
) -> Result<Vec<NegotiateContext>, Error> {
    limit
        .check(count)
        .map_err(|err| err.at("negotiate_context_count", reader.position()))?;
    reader.align("padding", HEADER_SIZE, ALIGNMENT)?;
    reader
        .offset("negotiate_context_offset", declared_offset, HEADER_SIZE)
        .map_err(|err| err.at("negotiate_context_offset", reader.position()))?;
    reader.with("negotiate_context_list", |buf| {
        Counted::read::<NegotiateContext>(buf, &count, &())
    })
}

/// `SMB2 NEGOTIATE` request.
///
/// When the dialect list includes SMB 3.1.1, the 8 bytes after the client GUID hold the offset
/// and count of the negotiate context list, which follows the dialects on the next aligned
/// offset. Otherwise they are the reserved client start time and no contexts follow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NegotiateRequest {
    pub security_mode: SecurityMode,
    pub capabilities: Capabilities,
    pub client_guid: Uuid,
    pub dialects: Vec<Dialect>,
    /// Must be empty unless `dialects` includes [`Dialect::TOP`].
    pub contexts: Vec<NegotiateContext>,
}

impl NegotiateRequest {
    /// Returns true if the request uses the context-carrying layout.
    pub fn is_extended(&self) -> bool {
        self.dialects.contains(&Dialect::TOP)
    }

    fn dialects_end(&self) -> usize {
        HEADER_SIZE + REQUEST_STRUCTURE_SIZE + self.dialects.encode_size()
    }

    /// Header-relative offset of the first negotiate context.
    pub fn context_offset(&self) -> usize {
        align_up(self.dialects_end(), ALIGNMENT)
    }
}

impl Write for NegotiateRequest {
    fn write(&self, buf: &mut impl BufMut) {
        (REQUEST_STRUCTURE_SIZE as u16).write(buf);
        fit::<u16>("dialect_count", self.dialects.len()).write(buf);
        self.security_mode.write(buf);
        0u16.write(buf);
        self.capabilities.write(buf);
        self.client_guid.write(buf);
        if self.contexts.is_empty() {
            0u64.write(buf);
            self.dialects.write(buf);
            return;
        }

        assert!(
            self.is_extended(),
            "negotiate contexts require dialect {}",
            Dialect::TOP
        );
        fit::<u32>("negotiate_context_offset", self.context_offset()).write(buf);
        fit::<u16>("negotiate_context_count", self.contexts.len()).write(buf);
        0u16.write(buf);
        self.dialects.write(buf);
        write_padding(buf, padding(self.dialects_end(), ALIGNMENT));
        Counted::write(&self.contexts, buf);
    }
}

impl EncodeSize for NegotiateRequest {
    fn encode_size(&self) -> usize {
        let fixed = REQUEST_STRUCTURE_SIZE + self.dialects.encode_size();
        if self.contexts.is_empty() {
            return fixed;
        }
        fixed + padding(self.dialects_end(), ALIGNMENT) + Counted::size(&self.contexts)
    }
}

impl Read for NegotiateRequest {
    /// Bound on the number of negotiate contexts.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, limit: &RangeCfg) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", REQUEST_STRUCTURE_SIZE as u16)?;
        let dialect_count: u16 = reader.read("dialect_count")?;
        let security_mode = reader.read("security_mode")?;
        reader.skip("reserved", 2)?;
        let capabilities = reader.read("capabilities")?;
        let client_guid = reader.read("client_guid")?;
        let context_offset: u32 = reader.read("negotiate_context_offset")?;
        let context_count: u16 = reader.read("negotiate_context_count")?;
        reader.skip("reserved2", 2)?;
        let dialects: Vec<Dialect> = reader.read_cfg("dialects", &(dialect_count as usize, ()))?;

        let mut contexts = Vec::new();
        if dialects.contains(&Dialect::TOP) && context_count > 0 {
            contexts = read_contexts(
                &mut reader,
                context_offset as usize,
                context_count as usize,
                limit,
            )?;
        }
        Ok(Self {
            security_mode,
            capabilities,
            client_guid,
            dialects,
            contexts,
        })
    }
}

/// `SMB2 NEGOTIATE` response.
///
/// The negotiate context count and offset are only meaningful when the selected dialect is
/// [`Dialect::TOP`]; for every other dialect both are written as zero and ignored on read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegotiateResponse {
    pub security_mode: SecurityMode,
    pub dialect: Dialect,
    pub server_guid: Uuid,
    pub capabilities: Capabilities,
    pub max_transact_size: u32,
    pub max_read_size: u32,
    pub max_write_size: u32,
    pub system_time: FileTime,
    pub server_start_time: FileTime,
    /// Opaque GSS token.
    pub security_buffer: Bytes,
    /// Must be empty unless `dialect` is [`Dialect::TOP`].
    pub contexts: Vec<NegotiateContext>,
}

impl NegotiateResponse {
    /// Returns true if the response uses the context-carrying layout.
    pub fn is_extended(&self) -> bool {
        self.dialect == Dialect::TOP
    }

    fn buffer_end(&self) -> usize {
        SECURITY_BUFFER_OFFSET + self.security_buffer.len()
    }

    fn context_padding(&self) -> usize {
        if self.contexts.is_empty() {
            return 0;
        }
        padding(self.buffer_end(), ALIGNMENT)
    }

    /// Header-relative offset of the first negotiate context, or zero if the dialect carries
    /// none.
    pub fn context_offset(&self) -> usize {
        if !self.is_extended() {
            return 0;
        }
        self.buffer_end() + self.context_padding()
    }
}

impl Write for NegotiateResponse {
    fn write(&self, buf: &mut impl BufMut) {
        assert!(
            self.is_extended() || self.contexts.is_empty(),
            "negotiate contexts require dialect {}",
            Dialect::TOP
        );
        RESPONSE_STRUCTURE_SIZE.write(buf);
        self.security_mode.write(buf);
        self.dialect.write(buf);
        fit::<u16>("negotiate_context_count", self.contexts.len()).write(buf);
        self.server_guid.write(buf);
        self.capabilities.write(buf);
        self.max_transact_size.write(buf);
        self.max_read_size.write(buf);
        self.max_write_size.write(buf);
        self.system_time.write(buf);
        self.server_start_time.write(buf);
        (SECURITY_BUFFER_OFFSET as u16).write(buf);
        fit::<u16>("security_buffer_length", self.security_buffer.len()).write(buf);
        fit::<u32>("negotiate_context_offset", self.context_offset()).write(buf);
        self.security_buffer.write(buf);
        write_padding(buf, self.context_padding());
        Counted::write(&self.contexts, buf);
    }
}

impl EncodeSize for NegotiateResponse {
    fn encode_size(&self) -> usize {
        SECURITY_BUFFER_OFFSET - HEADER_SIZE
            + self.security_buffer.len()
            + self.context_padding()
            + Counted::size(&self.contexts)
    }
}

impl Read for NegotiateResponse {
    /// Bound on the number of negotiate contexts.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, limit: &RangeCfg) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", RESPONSE_STRUCTURE_SIZE)?;
        let security_mode = reader.read("security_mode")?;
        let dialect: Dialect = reader.read("dialect_revision")?;
        let context_count: u16 = reader.read("negotiate_context_count")?;
        let server_guid = reader.read("server_guid")?;
        let capabilities = reader.read("capabilities")?;
        let max_transact_size = reader.read("max_transact_size")?;
        let max_read_size = reader.read("max_read_size")?;
        let max_write_size = reader.read("max_write_size")?;
        let system_time = reader.read("system_time")?;
        let server_start_time = reader.read("server_start_time")?;
        let buffer_offset: u16 = reader.read("security_buffer_offset")?;
        let buffer_length: u16 = reader.read("security_buffer_length")?;
        let context_offset: u32 = reader.read("negotiate_context_offset")?;
        let security_buffer = reader.buffer(
            "buffer",
            "security_buffer_offset",
            buffer_offset as usize,
            buffer_length as usize,
            HEADER_SIZE,
        )?;

        let mut contexts = Vec::new();
        if dialect == Dialect::TOP && context_count > 0 {
            contexts = read_contexts(
                &mut reader,
                context_offset as usize,
                context_count as usize,
                limit,
            )?;
        }
        Ok(Self {
            security_mode,
            dialect,
            server_guid,
            capabilities,
            max_transact_size,
            max_read_size,
            max_write_size,
            system_time,
            server_start_time,
            security_buffer,
            contexts,
        })
    }
}

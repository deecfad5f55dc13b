//! Create request and response, and the create contexts chained onto them.

use crate::{
    config::Direction,
    constants::{
        CreateAction, CreateDisposition, CreateFlags, CreateOptions, FileAttributes,
        ImpersonationLevel, OplockLevel, ShareAccess, Status,
    },
    utf16, HEADER_SIZE,
};
use bytes::{Buf, BufMut, Bytes};
use core::fmt;
use smbwire_codec::{
    context::{body, Dispatch, Linked, Scheme, LINK_SIZE},
    util::{align_up, fit, padding, write_padding, ALIGNMENT},
    EncodeSize, Error, FieldReader, FileTime, FixedSize, RangeCfg, Read, Write,
};
use tracing::debug;

const REQUEST_STRUCTURE_SIZE: u16 = 57;
const RESPONSE_STRUCTURE_SIZE: u16 = 89;

/// Header-relative offset of the file name in a create request.
const NAME_OFFSET: usize = HEADER_SIZE + 56;

/// Header-relative offset of the create contexts in a create response.
const RESPONSE_CONTEXTS_OFFSET: usize = HEADER_SIZE + 88;

/// Entry-relative offset of a create context name (just past the fixed fields).
const CONTEXT_NAME_OFFSET: u16 = 16;

/// `SMB2_FILEID`: the handle to an open file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileId {
    pub persistent: u64,
    pub volatile: u64,
}

impl FileId {
    /// The file id used by requests that do not target an open (all bits set).
    pub const NONE: FileId = FileId {
        persistent: u64::MAX,
        volatile: u64::MAX,
    };
}

impl Write for FileId {
    fn write(&self, buf: &mut impl BufMut) {
        self.persistent.write(buf);
        self.volatile.write(buf);
    }
}

impl FixedSize for FileId {
    const SIZE: usize = 16;
}

impl Read for FileId {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let persistent = reader.read("persistent")?;
        let volatile = reader.read("volatile")?;
        Ok(Self {
            persistent,
            volatile,
        })
    }
}

const APP_INSTANCE_ID: &[u8] = &[
    0x45, 0xBC, 0xA6, 0x6A, 0xEF, 0xA7, 0xF7, 0x4A, 0x90, 0x08, 0xFA, 0x46, 0x2E, 0x14, 0x4D,
    0x74,
];
const APP_INSTANCE_VERSION: &[u8] = &[
    0xB9, 0x82, 0xD0, 0xB7, 0x3B, 0x56, 0x07, 0x4F, 0xA0, 0x7B, 0x52, 0x4A, 0x81, 0x16, 0xA0,
    0x10,
];
const SVHDX_OPEN_DEVICE: &[u8] = &[
    0x9C, 0xCB, 0xCF, 0x9E, 0x04, 0xC1, 0xE6, 0x43, 0x98, 0x0E, 0x15, 0x8D, 0xA1, 0xF6, 0xEC,
    0x83,
];

/// Name tag of a create context: four ASCII bytes, or a 16-byte GUID.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CreateContextName {
    /// `ExtA`
    ExtendedAttributes,
    /// `SecD`
    SecurityDescriptor,
    /// `DHnQ`
    DurableHandleRequest,
    /// `DHnC`
    DurableHandleReconnect,
    /// `AlSi`
    AllocationSize,
    /// `MxAc`
    QueryMaximalAccess,
    /// `TWrp`
    Timewarp,
    /// `QFid`
    QueryOnDiskId,
    /// `RqLs`
    RequestLease,
    /// `DH2Q`
    DurableHandleRequestV2,
    /// `DH2C`
    DurableHandleReconnectV2,
    AppInstanceId,
    AppInstanceVersion,
    SvhdxOpenDevice,
    /// A name with no symbol in this table, kept verbatim.
    Unknown(Bytes),
}

impl CreateContextName {
    /// Maps a wire name to its symbol.
    pub fn from_bytes(raw: Bytes) -> Self {
        match &raw[..] {
            b"ExtA" => Self::ExtendedAttributes,
            b"SecD" => Self::SecurityDescriptor,
            b"DHnQ" => Self::DurableHandleRequest,
            b"DHnC" => Self::DurableHandleReconnect,
            b"AlSi" => Self::AllocationSize,
            b"MxAc" => Self::QueryMaximalAccess,
            b"TWrp" => Self::Timewarp,
            b"QFid" => Self::QueryOnDiskId,
            b"RqLs" => Self::RequestLease,
            b"DH2Q" => Self::DurableHandleRequestV2,
            b"DH2C" => Self::DurableHandleReconnectV2,
            APP_INSTANCE_ID => Self::AppInstanceId,
            APP_INSTANCE_VERSION => Self::AppInstanceVersion,
            SVHDX_OPEN_DEVICE => Self::SvhdxOpenDevice,
            _ => Self::Unknown(raw),
        }
    }

    /// Returns the wire name.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::ExtendedAttributes => b"ExtA",
            Self::SecurityDescriptor => b"SecD",
            Self::DurableHandleRequest => b"DHnQ",
            Self::DurableHandleReconnect => b"DHnC",
            Self::AllocationSize => b"AlSi",
            Self::QueryMaximalAccess => b"MxAc",
            Self::Timewarp => b"TWrp",
            Self::QueryOnDiskId => b"QFid",
            Self::RequestLease => b"RqLs",
            Self::DurableHandleRequestV2 => b"DH2Q",
            Self::DurableHandleReconnectV2 => b"DH2C",
            Self::AppInstanceId => APP_INSTANCE_ID,
            Self::AppInstanceVersion => APP_INSTANCE_VERSION,
            Self::SvhdxOpenDevice => SVHDX_OPEN_DEVICE,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for CreateContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(f, "CreateContextName({:02x?})", &raw[..]),
            Self::AppInstanceId | Self::AppInstanceVersion | Self::SvhdxOpenDevice => {
                write!(f, "{self:?}")
            }
            known => f.write_str(&String::from_utf8_lossy(known.as_bytes())),
        }
    }
}

/// `SMB2_CREATE_QUERY_MAXIMAL_ACCESS_RESPONSE`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaximalAccess {
    pub query_status: Status,
    pub maximal_access: u32,
}

impl Write for MaximalAccess {
    fn write(&self, buf: &mut impl BufMut) {
        self.query_status.write(buf);
        self.maximal_access.write(buf);
    }
}

impl FixedSize for MaximalAccess {
    const SIZE: usize = 8;
}

impl Read for MaximalAccess {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let query_status = reader.read("query_status")?;
        let maximal_access = reader.read("maximal_access")?;
        Ok(Self {
            query_status,
            maximal_access,
        })
    }
}

/// `SMB2_CREATE_QUERY_ON_DISK_ID` response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnDiskId {
    pub disk_file_id: u64,
    pub volume_id: u64,
}

impl Write for OnDiskId {
    fn write(&self, buf: &mut impl BufMut) {
        self.disk_file_id.write(buf);
        self.volume_id.write(buf);
        write_padding(buf, 16);
    }
}

impl FixedSize for OnDiskId {
    const SIZE: usize = 32;
}

impl Read for OnDiskId {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let disk_file_id = reader.read("disk_file_id")?;
        let volume_id = reader.read("volume_id")?;
        reader.skip("reserved", 16)?;
        Ok(Self {
            disk_file_id,
            volume_id,
        })
    }
}

/// A body made only of reserved bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Reserved<const N: usize>;

impl<const N: usize> Write for Reserved<N> {
    fn write(&self, buf: &mut impl BufMut) {
        write_padding(buf, N);
    }
}

impl<const N: usize> FixedSize for Reserved<N> {
    const SIZE: usize = N;
}

impl<const N: usize> Read for Reserved<N> {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        FieldReader::new(buf).skip("reserved", N)?;
        Ok(Self)
    }
}

/// One entry of a create context chain, selected by its name and the message direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateContext {
    /// `MxAc` request, optionally limited to access granted as of a timestamp.
    QueryMaximalAccessRequest(Option<FileTime>),
    /// `MxAc` response.
    MaximalAccess(MaximalAccess),
    /// `AlSi` request.
    AllocationSize(u64),
    /// `TWrp` request.
    Timewarp(FileTime),
    /// `QFid` request.
    QueryOnDiskId,
    /// `QFid` response.
    OnDiskId(OnDiskId),
    /// `DHnQ` request.
    DurableHandleRequest,
    /// `DHnQ` response.
    DurableHandleResponse,
    /// A context with no body decoder in the direction it travels. The data is kept verbatim.
    Opaque(OpaqueContext),
}

/// Name and data of a create context kept verbatim.
///
/// Only decoding and [`CreateContext::from_raw`] build one, so a name with a typed body in the
/// same direction never ends up here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueContext {
    name: CreateContextName,
    data: Bytes,
}

impl OpaqueContext {
    pub fn name(&self) -> &CreateContextName {
        &self.name
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl CreateContext {
    /// Builds the context that `name` and `data` decode to when travelling in `direction`.
    ///
    /// Names with a body decoder in that direction yield their typed variant, and everything
    /// else is kept opaque.
    pub fn from_raw(
        name: CreateContextName,
        data: Bytes,
        direction: Direction,
    ) -> Result<Self, Error> {
        Self::dispatch(name, data, &direction)
    }

    fn data_length(&self) -> usize {
        match self {
            Self::QueryMaximalAccessRequest(timestamp) => timestamp.map_or(0, |_| FileTime::SIZE),
            Self::MaximalAccess(_) => MaximalAccess::SIZE,
            Self::AllocationSize(_) => u64::SIZE,
            Self::Timewarp(_) => FileTime::SIZE,
            Self::QueryOnDiskId => 0,
            Self::OnDiskId(_) => OnDiskId::SIZE,
            Self::DurableHandleRequest => Reserved::<16>::SIZE,
            Self::DurableHandleResponse => Reserved::<8>::SIZE,
            Self::Opaque(opaque) => opaque.data.len(),
        }
    }

    fn write_data(&self, buf: &mut impl BufMut) {
        match self {
            Self::QueryMaximalAccessRequest(timestamp) => {
                if let Some(timestamp) = timestamp {
                    timestamp.write(buf);
                }
            }
            Self::MaximalAccess(body) => body.write(buf),
            Self::AllocationSize(size) => size.write(buf),
            Self::Timewarp(timestamp) => timestamp.write(buf),
            Self::QueryOnDiskId => {}
            Self::OnDiskId(body) => body.write(buf),
            Self::DurableHandleRequest => Reserved::<16>.write(buf),
            Self::DurableHandleResponse => Reserved::<8>.write(buf),
            Self::Opaque(opaque) => opaque.data.write(buf),
        }
    }

    fn name_length(&self) -> usize {
        match self {
            Self::Opaque(opaque) => opaque.name.as_bytes().len(),
            _ => 4,
        }
    }

    /// Entry-relative offset of the data, or zero if there is none.
    fn data_offset(&self) -> usize {
        if self.data_length() == 0 {
            return 0;
        }
        align_up(CONTEXT_NAME_OFFSET as usize + self.name_length(), ALIGNMENT)
    }
}

impl Dispatch for CreateContext {
    type Tag = CreateContextName;
    type Cfg = Direction;

    fn tag(&self) -> CreateContextName {
        match self {
            Self::QueryMaximalAccessRequest(_) | Self::MaximalAccess(_) => {
                CreateContextName::QueryMaximalAccess
            }
            Self::AllocationSize(_) => CreateContextName::AllocationSize,
            Self::Timewarp(_) => CreateContextName::Timewarp,
            Self::QueryOnDiskId | Self::OnDiskId(_) => CreateContextName::QueryOnDiskId,
            Self::DurableHandleRequest | Self::DurableHandleResponse => {
                CreateContextName::DurableHandleRequest
            }
            Self::Opaque(opaque) => opaque.name.clone(),
        }
    }

    fn dispatch(name: CreateContextName, data: Bytes, direction: &Direction) -> Result<Self, Error> {
        use CreateContextName as Name;
        Ok(match (name, *direction) {
            (Name::QueryMaximalAccess, Direction::Request) if data.is_empty() => {
                Self::QueryMaximalAccessRequest(None)
            }
            (Name::QueryMaximalAccess, Direction::Request) => {
                Self::QueryMaximalAccessRequest(Some(body(data, &())?))
            }
            (Name::QueryMaximalAccess, Direction::Response) => {
                Self::MaximalAccess(body(data, &())?)
            }
            (Name::AllocationSize, Direction::Request) => Self::AllocationSize(body(data, &())?),
            (Name::Timewarp, Direction::Request) => Self::Timewarp(body(data, &())?),
            (Name::QueryOnDiskId, Direction::Request) => {
                if !data.is_empty() {
                    return Err(Error::ExtraData(data.len()));
                }
                Self::QueryOnDiskId
            }
            (Name::QueryOnDiskId, Direction::Response) => Self::OnDiskId(body(data, &())?),
            (Name::DurableHandleRequest, Direction::Request) => {
                body::<Reserved<16>>(data, &())?;
                Self::DurableHandleRequest
            }
            (Name::DurableHandleRequest, Direction::Response) => {
                body::<Reserved<8>>(data, &())?;
                Self::DurableHandleResponse
            }
            (name, direction) => {
                debug!(%name, ?direction, len = data.len(), "keeping opaque create context");
                Self::Opaque(OpaqueContext { name, data })
            }
        })
    }
}

impl Write for CreateContext {
    /// Writes the entry after its `next` word.
    fn write(&self, buf: &mut impl BufMut) {
        let name = self.tag();
        let name = name.as_bytes();
        let data_length = self.data_length();
        CONTEXT_NAME_OFFSET.write(buf);
        fit::<u16>("name_length", name.len()).write(buf);
        0u16.write(buf);
        fit::<u16>("data_offset", self.data_offset()).write(buf);
        fit::<u32>("data_length", data_length).write(buf);
        buf.put_slice(name);
        if data_length > 0 {
            write_padding(buf, padding(CONTEXT_NAME_OFFSET as usize + name.len(), ALIGNMENT));
            self.write_data(buf);
        }
    }
}

impl EncodeSize for CreateContext {
    fn encode_size(&self) -> usize {
        let named = CONTEXT_NAME_OFFSET as usize + self.name_length();
        let data_length = self.data_length();
        if data_length == 0 {
            return named - LINK_SIZE;
        }
        align_up(named, ALIGNMENT) + data_length - LINK_SIZE
    }
}

impl Read for CreateContext {
    /// Direction of the message carrying the chain, which selects the body shapes.
    type Cfg = Direction;

    fn read_cfg(buf: &mut impl Buf, direction: &Direction) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        let name_offset: u16 = reader.read("name_offset")?;
        let name_length: u16 = reader.read("name_length")?;
        reader.skip("reserved", 2)?;
        let data_offset: u16 = reader.read("data_offset")?;
        let data_length: u32 = reader.read("data_length")?;
        let name = reader.buffer(
            "buffer_name",
            "name_offset",
            name_offset as usize,
            name_length as usize,
            LINK_SIZE,
        )?;
        if data_length > 0 {
            reader.align("padding", LINK_SIZE, ALIGNMENT)?;
        }
        let position = reader.position();
        let data = reader.buffer(
            "buffer_data",
            "data_offset",
            data_offset as usize,
            data_length as usize,
            LINK_SIZE,
        )?;
        Self::dispatch(CreateContextName::from_bytes(name), data, direction)
            .map_err(|err| err.at("buffer_data", position))
    }
}

/// Reads a create context chain whose offset and length were decoded earlier in the record.
fn read_chain<B: Buf>(
    reader: &mut FieldReader<'_, B>,
    declared_offset: usize,
    length: usize,
    limit: &RangeCfg,
    direction: Direction,
) -> Result<Vec<CreateContext>, Error> {
    if length == 0 {
        return Ok(Vec::new());
    }
    reader.align("padding", HEADER_SIZE, ALIGNMENT)?;
    reader
        .offset("create_contexts_offset", declared_offset, HEADER_SIZE)
        .map_err(|err| err.at("buffer_contexts", reader.position()))?;
    reader.area("buffer_contexts", length, |area| {
        Linked::decode(area, limit, &direction)
    })
}

/// `SMB2 CREATE` request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateRequest {
    pub security_flags: u8,
    pub requested_oplock_level: OplockLevel,
    pub impersonation_level: ImpersonationLevel,
    pub smb_create_flags: u64,
    pub desired_access: u32,
    pub file_attributes: FileAttributes,
    pub share_access: ShareAccess,
    pub create_disposition: CreateDisposition,
    pub create_options: CreateOptions,
    /// UTF-16LE path relative to the share root.
    pub name: Bytes,
    pub contexts: Vec<CreateContext>,
}

impl CreateRequest {
    /// Returns a request that opens `name` with every other field zeroed.
    pub fn new(name: &str) -> Self {
        Self {
            name: utf16::encode(name),
            ..Default::default()
        }
    }

    /// Decodes the file name.
    pub fn name(&self) -> Result<String, crate::Error> {
        utf16::decode(&self.name).ok_or(crate::Error::InvalidUtf16("name"))
    }

    fn context_padding(&self) -> usize {
        if self.contexts.is_empty() {
            return 0;
        }
        padding(NAME_OFFSET + self.name.len(), ALIGNMENT)
    }

    /// Header-relative offset of the first create context, or zero if there are none.
    pub fn contexts_offset(&self) -> usize {
        if self.contexts.is_empty() {
            return 0;
        }
        NAME_OFFSET + self.name.len() + self.context_padding()
    }
}

impl Write for CreateRequest {
    fn write(&self, buf: &mut impl BufMut) {
        REQUEST_STRUCTURE_SIZE.write(buf);
        self.security_flags.write(buf);
        self.requested_oplock_level.write(buf);
        self.impersonation_level.write(buf);
        self.smb_create_flags.write(buf);
        0u64.write(buf);
        self.desired_access.write(buf);
        self.file_attributes.write(buf);
        self.share_access.write(buf);
        self.create_disposition.write(buf);
        self.create_options.write(buf);
        (NAME_OFFSET as u16).write(buf);
        fit::<u16>("name_length", self.name.len()).write(buf);
        fit::<u32>("create_contexts_offset", self.contexts_offset()).write(buf);
        fit::<u32>("create_contexts_length", Linked::size(&self.contexts)).write(buf);
        self.name.write(buf);
        write_padding(buf, self.context_padding());
        Linked::write(&self.contexts, buf);
    }
}

impl EncodeSize for CreateRequest {
    fn encode_size(&self) -> usize {
        NAME_OFFSET - HEADER_SIZE
            + self.name.len()
            + self.context_padding()
            + Linked::size(&self.contexts)
    }
}

impl Read for CreateRequest {
    /// Bound on the number of create contexts.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, limit: &RangeCfg) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", REQUEST_STRUCTURE_SIZE)?;
        let security_flags = reader.read("security_flags")?;
        let requested_oplock_level = reader.read("requested_oplock_level")?;
        let impersonation_level = reader.read("impersonation_level")?;
        let smb_create_flags = reader.read("smb_create_flags")?;
        reader.skip("reserved", 8)?;
        let desired_access = reader.read("desired_access")?;
        let file_attributes = reader.read("file_attributes")?;
        let share_access = reader.read("share_access")?;
        let create_disposition = reader.read("create_disposition")?;
        let create_options = reader.read("create_options")?;
        let name_offset: u16 = reader.read("name_offset")?;
        let name_length: u16 = reader.read("name_length")?;
        let contexts_offset: u32 = reader.read("create_contexts_offset")?;
        let contexts_length: u32 = reader.read("create_contexts_length")?;
        let name = reader.buffer(
            "buffer_path",
            "name_offset",
            name_offset as usize,
            name_length as usize,
            HEADER_SIZE,
        )?;
        let contexts = read_chain(
            &mut reader,
            contexts_offset as usize,
            contexts_length as usize,
            limit,
            Direction::Request,
        )?;
        Ok(Self {
            security_flags,
            requested_oplock_level,
            impersonation_level,
            smb_create_flags,
            desired_access,
            file_attributes,
            share_access,
            create_disposition,
            create_options,
            name,
            contexts,
        })
    }
}

/// `SMB2 CREATE` response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateResponse {
    pub oplock_level: OplockLevel,
    pub flags: CreateFlags,
    pub create_action: CreateAction,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub change_time: FileTime,
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub file_attributes: FileAttributes,
    pub file_id: FileId,
    pub contexts: Vec<CreateContext>,
}

impl CreateResponse {
    /// Header-relative offset of the first create context, or zero if there are none.
    pub fn contexts_offset(&self) -> usize {
        if self.contexts.is_empty() {
            return 0;
        }
        RESPONSE_CONTEXTS_OFFSET
    }
}

impl Write for CreateResponse {
    fn write(&self, buf: &mut impl BufMut) {
        RESPONSE_STRUCTURE_SIZE.write(buf);
        self.oplock_level.write(buf);
        self.flags.write(buf);
        self.create_action.write(buf);
        self.creation_time.write(buf);
        self.last_access_time.write(buf);
        self.last_write_time.write(buf);
        self.change_time.write(buf);
        self.allocation_size.write(buf);
        self.end_of_file.write(buf);
        self.file_attributes.write(buf);
        0u32.write(buf);
        self.file_id.write(buf);
        fit::<u32>("create_contexts_offset", self.contexts_offset()).write(buf);
        fit::<u32>("create_contexts_length", Linked::size(&self.contexts)).write(buf);
        Linked::write(&self.contexts, buf);
    }
}

impl EncodeSize for CreateResponse {
    fn encode_size(&self) -> usize {
        RESPONSE_CONTEXTS_OFFSET - HEADER_SIZE + Linked::size(&self.contexts)
    }
}

impl Read for CreateResponse {
    /// Bound on the number of create contexts.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, limit: &RangeCfg) -> Result<Self, Error> {
        let mut reader = FieldReader::new(buf);
        reader.constant("structure_size", RESPONSE_STRUCTURE_SIZE)?;
        let oplock_level = reader.read("oplock_level")?;
        let flags = reader.read("flags")?;
        let create_action = reader.read("create_action")?;
        let creation_time = reader.read("creation_time")?;
        let last_access_time = reader.read("last_access_time")?;
        let last_write_time = reader.read("last_write_time")?;
        let change_time = reader.read("change_time")?;
        let allocation_size = reader.read("allocation_size")?;
        let end_of_file = reader.read("end_of_file")?;
        let file_attributes = reader.read("file_attributes")?;
        reader.skip("reserved2", 4)?;
        let file_id = reader.read("file_id")?;
        let contexts_offset: u32 = reader.read("create_contexts_offset")?;
        let contexts_length: u32 = reader.read("create_contexts_length")?;
        let contexts = read_chain(
            &mut reader,
            contexts_offset as usize,
            contexts_length as usize,
            limit,
            Direction::Response,
        )?;
        Ok(Self {
            oplock_level,
            flags,
            create_action,
            creation_time,
            last_access_time,
            last_write_time,
            change_time,
            allocation_size,
            end_of_file,
            file_attributes,
            file_id,
            contexts,
        })
    }
}

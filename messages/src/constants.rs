//! Protocol codes and flag sets.
//!
//! Every enumerated field keeps codes it does not recognize (see [`smbwire_codec::symbols!`]) and
//! every flag set keeps bits it does not recognize (see [`smbwire_codec::flags!`]).

use smbwire_codec::{flags, symbols};

symbols! {
    /// SMB2 command code.
    pub enum Command: u16 {
        Negotiate = 0x0000,
        SessionSetup = 0x0001,
        Logoff = 0x0002,
        TreeConnect = 0x0003,
        TreeDisconnect = 0x0004,
        Create = 0x0005,
        Close = 0x0006,
        Flush = 0x0007,
        Read = 0x0008,
        Write = 0x0009,
        Lock = 0x000A,
        Ioctl = 0x000B,
        Cancel = 0x000C,
        Echo = 0x000D,
        QueryDirectory = 0x000E,
        ChangeNotify = 0x000F,
        QueryInfo = 0x0010,
        SetInfo = 0x0011,
        OplockBreak = 0x0012,
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::Negotiate
    }
}

symbols! {
    /// Dialect revision.
    pub enum Dialect: u16 {
        Smb202 = 0x0202,
        Smb210 = 0x0210,
        Smb300 = 0x0300,
        Smb302 = 0x0302,
        Smb311 = 0x0311,
        /// Sent by a server in response to a multi-protocol SMB1 negotiate.
        Wildcard = 0x02FF,
    }
}

impl Dialect {
    /// The highest dialect, the only one that carries negotiate contexts.
    pub const TOP: Dialect = Dialect::Smb311;
}

symbols! {
    /// NTSTATUS code carried in the header of a response.
    pub enum Status: u32 {
        Success = 0x0000_0000,
        Pending = 0x0000_0103,
        NotifyCleanup = 0x0000_010B,
        NotifyEnumDir = 0x0000_010C,
        BufferOverflow = 0x8000_0005,
        NoMoreFiles = 0x8000_0006,
        StoppedOnSymlink = 0x8000_002D,
        InvalidParameter = 0xC000_000D,
        NoSuchFile = 0xC000_000F,
        EndOfFile = 0xC000_0011,
        MoreProcessingRequired = 0xC000_0016,
        AccessDenied = 0xC000_0022,
        BufferTooSmall = 0xC000_0023,
        ObjectNameInvalid = 0xC000_0033,
        ObjectNameNotFound = 0xC000_0034,
        ObjectNameCollision = 0xC000_0035,
        ObjectPathInvalid = 0xC000_0039,
        ObjectPathNotFound = 0xC000_003A,
        SharingViolation = 0xC000_0043,
        LogonFailure = 0xC000_006D,
        PasswordExpired = 0xC000_0071,
        InsufficientResources = 0xC000_009A,
        PipeBusy = 0xC000_00AE,
        NotSupported = 0xC000_00BB,
        NetworkNameDeleted = 0xC000_00C9,
        BadNetworkName = 0xC000_00CC,
        RequestNotAccepted = 0xC000_00D0,
        DirectoryNotEmpty = 0xC000_0101,
        NotADirectory = 0xC000_0103,
        Cancelled = 0xC000_0120,
        FileClosed = 0xC000_0128,
        UserSessionDeleted = 0xC000_0203,
        PathNotCovered = 0xC000_0257,
        NetworkSessionExpired = 0xC000_035C,
    }
}

impl Status {
    /// Returns true if the severity bits mark this status as an error.
    pub const fn is_error(&self) -> bool {
        self.code() >> 30 == 0b11
    }
}

symbols! {
    /// Negotiate context type.
    pub enum NegotiateContextType: u16 {
        PreauthIntegrityCapabilities = 0x0001,
        EncryptionCapabilities = 0x0002,
        CompressionCapabilities = 0x0003,
        NetnameNegotiateContextId = 0x0005,
        TransportCapabilities = 0x0006,
        RdmaTransformCapabilities = 0x0007,
        SigningCapabilities = 0x0008,
    }
}

symbols! {
    /// Preauthentication integrity hash algorithm.
    pub enum HashAlgorithm: u16 {
        Sha512 = 0x0001,
    }
}

symbols! {
    /// Encryption cipher.
    pub enum Cipher: u16 {
        Aes128Ccm = 0x0001,
        Aes128Gcm = 0x0002,
        Aes256Ccm = 0x0003,
        Aes256Gcm = 0x0004,
    }
}

symbols! {
    /// Compression algorithm.
    pub enum CompressionAlgorithm: u16 {
        None = 0x0000,
        Lznt1 = 0x0001,
        Lz77 = 0x0002,
        Lz77Huffman = 0x0003,
        PatternV1 = 0x0004,
        Lz4 = 0x0005,
    }
}

symbols! {
    /// Signing algorithm.
    pub enum SigningAlgorithm: u16 {
        HmacSha256 = 0x0000,
        AesCmac = 0x0001,
        AesGmac = 0x0002,
    }
}

symbols! {
    /// Share type returned by a tree connect.
    pub enum ShareType: u8 {
        Disk = 0x01,
        Pipe = 0x02,
        Print = 0x03,
    }
}

symbols! {
    /// Oplock level requested by a create, or granted in its response.
    pub enum OplockLevel: u8 {
        None = 0x00,
        Ii = 0x01,
        Exclusive = 0x08,
        Batch = 0x09,
        Lease = 0xFF,
    }
}

impl Default for OplockLevel {
    fn default() -> Self {
        Self::None
    }
}

symbols! {
    /// Impersonation level requested by a create.
    pub enum ImpersonationLevel: u32 {
        Anonymous = 0x0000_0000,
        Identification = 0x0000_0001,
        Impersonation = 0x0000_0002,
        Delegate = 0x0000_0003,
    }
}

impl Default for ImpersonationLevel {
    fn default() -> Self {
        Self::Anonymous
    }
}

symbols! {
    /// What a create does when the file does or does not exist.
    pub enum CreateDisposition: u32 {
        Supersede = 0x0000_0000,
        Open = 0x0000_0001,
        Create = 0x0000_0002,
        OpenIf = 0x0000_0003,
        Overwrite = 0x0000_0004,
        OverwriteIf = 0x0000_0005,
    }
}

impl Default for CreateDisposition {
    fn default() -> Self {
        Self::Supersede
    }
}

symbols! {
    /// What a create did.
    pub enum CreateAction: u32 {
        Superseded = 0x0000_0000,
        Opened = 0x0000_0001,
        Created = 0x0000_0002,
        Overwritten = 0x0000_0003,
    }
}

impl Default for CreateAction {
    fn default() -> Self {
        Self::Superseded
    }
}

symbols! {
    /// IOCTL / FSCTL control code.
    pub enum CtlCode: u32 {
        DfsGetReferrals = 0x0006_0194,
        DfsGetReferralsEx = 0x0006_01B0,
        SetReparsePoint = 0x0009_00A4,
        FileLevelTrim = 0x0009_8208,
        PipeWait = 0x0011_0018,
        PipePeek = 0x0011_400C,
        PipeTransceive = 0x0011_C017,
        SrvRequestResumeKey = 0x0014_0078,
        LmrRequestResiliency = 0x0014_01D4,
        QueryNetworkInterfaceInfo = 0x0014_01FC,
        ValidateNegotiateInfo = 0x0014_0204,
        SrvEnumerateSnapshots = 0x0014_4064,
        SrvCopychunk = 0x0014_40F2,
        SrvReadHash = 0x0014_41BB,
        SrvCopychunkWrite = 0x0014_80F2,
    }
}

symbols! {
    /// Whether an IOCTL request is a device control or a file system control.
    pub enum IoctlFlags: u32 {
        Ioctl = 0x0000_0000,
        Fsctl = 0x0000_0001,
    }
}

symbols! {
    /// Error context identifier.
    pub enum ErrorId: u32 {
        Default = 0x0000_0000,
        ShareRedirect = 0x7264_5253,
    }
}

impl Default for ErrorId {
    fn default() -> Self {
        Self::Default
    }
}

flags! {
    /// SMB1 header flags.
    pub struct Smb1Flags: u8 {
        const LOCK_AND_READ_OK = 0x01;
        const BUF_AVAIL = 0x02;
        const CASE_INSENSITIVE = 0x08;
        const CANONICALIZED_PATHS = 0x10;
        const OPLOCK = 0x20;
        const OPBATCH = 0x40;
        const REPLY = 0x80;
    }
}

flags! {
    /// SMB1 header extended flags.
    pub struct Smb1Flags2: u16 {
        const LONG_NAMES = 0x0001;
        const EAS = 0x0002;
        const SMB_SECURITY_SIGNATURE = 0x0004;
        const IS_LONG_NAME = 0x0040;
        const EXTENDED_SECURITY = 0x0800;
        const DFS = 0x1000;
        const PAGING_IO = 0x2000;
        const NT_STATUS = 0x4000;
        const UNICODE = 0x8000;
    }
}

flags! {
    /// SMB2 header flags.
    pub struct HeaderFlags: u32 {
        const SERVER_TO_REDIR = 0x0000_0001;
        const ASYNC_COMMAND = 0x0000_0002;
        const RELATED_OPERATIONS = 0x0000_0004;
        const SIGNED = 0x0000_0008;
        const PRIORITY_MASK = 0x0000_0070;
        const DFS_OPERATIONS = 0x1000_0000;
        const REPLAY_OPERATION = 0x2000_0000;
    }
}

flags! {
    /// Signing requirements advertised in negotiate and validate-negotiate messages.
    pub struct SecurityMode: u16 {
        const SIGNING_ENABLED = 0x0001;
        const SIGNING_REQUIRED = 0x0002;
    }
}

flags! {
    /// Signing requirements advertised in a session setup request.
    pub struct SetupSecurityMode: u8 {
        const SIGNING_ENABLED = 0x01;
        const SIGNING_REQUIRED = 0x02;
    }
}

flags! {
    /// Global capabilities.
    pub struct Capabilities: u32 {
        const DFS = 0x0000_0001;
        const LEASING = 0x0000_0002;
        const LARGE_MTU = 0x0000_0004;
        const MULTI_CHANNEL = 0x0000_0008;
        const PERSISTENT_HANDLES = 0x0000_0010;
        const DIRECTORY_LEASING = 0x0000_0020;
        const ENCRYPTION = 0x0000_0040;
        const NOTIFICATIONS = 0x0000_0080;
    }
}

flags! {
    /// Session setup request flags.
    pub struct SessionSetupFlags: u8 {
        const BINDING = 0x01;
    }
}

flags! {
    /// Session setup response flags.
    pub struct SessionFlags: u16 {
        const IS_GUEST = 0x0001;
        const IS_NULL = 0x0002;
        const ENCRYPT_DATA = 0x0004;
    }
}

flags! {
    /// Tree connect request flags.
    pub struct TreeFlags: u16 {
        const CLUSTER_RECONNECT = 0x0001;
        const REDIRECT_TO_OWNER = 0x0002;
        const EXTENSION_PRESENT = 0x0004;
    }
}

flags! {
    /// Share properties returned by a tree connect.
    pub struct ShareFlags: u32 {
        const DFS = 0x0000_0001;
        const DFS_ROOT = 0x0000_0002;
        const AUTO_CACHING = 0x0000_0010;
        const VDO_CACHING = 0x0000_0020;
        const NO_CACHING = 0x0000_0030;
        const RESTRICT_EXCLUSIVE_OPENS = 0x0000_0100;
        const FORCE_SHARED_DELETE = 0x0000_0200;
        const ALLOW_NAMESPACE_CACHING = 0x0000_0400;
        const ACCESS_BASED_DIRECTORY_ENUM = 0x0000_0800;
        const FORCE_LEVELII_OPLOCK = 0x0000_1000;
        const ENABLE_HASH_V1 = 0x0000_2000;
        const ENABLE_HASH_V2 = 0x0000_4000;
        const ENCRYPT_DATA = 0x0000_8000;
        const IDENTITY_REMOTING = 0x0004_0000;
        const COMPRESS_DATA = 0x0010_0000;
    }
}

flags! {
    /// Share capabilities returned by a tree connect.
    pub struct ShareCapabilities: u32 {
        const DFS = 0x0000_0008;
        const CONTINUOUS_AVAILABILITY = 0x0000_0010;
        const SCALEOUT = 0x0000_0020;
        const CLUSTER = 0x0000_0040;
        const ASYMMETRIC = 0x0000_0080;
        const REDIRECT_TO_OWNER = 0x0000_0100;
    }
}

flags! {
    /// Sharing mode requested by a create.
    pub struct ShareAccess: u32 {
        const READ = 0x0000_0001;
        const WRITE = 0x0000_0002;
        const DELETE = 0x0000_0004;
    }
}

flags! {
    /// Create options.
    pub struct CreateOptions: u32 {
        const DIRECTORY_FILE = 0x0000_0001;
        const WRITE_THROUGH = 0x0000_0002;
        const SEQUENTIAL_ONLY = 0x0000_0004;
        const NO_INTERMEDIATE_BUFFERING = 0x0000_0008;
        const SYNCHRONOUS_IO_ALERT = 0x0000_0010;
        const SYNCHRONOUS_IO_NONALERT = 0x0000_0020;
        const NON_DIRECTORY_FILE = 0x0000_0040;
        const COMPLETE_IF_OPLOCKED = 0x0000_0100;
        const NO_EA_KNOWLEDGE = 0x0000_0200;
        const OPEN_REMOTE_INSTANCE = 0x0000_0400;
        const RANDOM_ACCESS = 0x0000_0800;
        const DELETE_ON_CLOSE = 0x0000_1000;
        const OPEN_BY_FILE_ID = 0x0000_2000;
        const OPEN_FOR_BACKUP_INTENT = 0x0000_4000;
        const NO_COMPRESSION = 0x0000_8000;
        const OPEN_REQUIRING_OPLOCK = 0x0001_0000;
        const DISALLOW_EXCLUSIVE = 0x0002_0000;
        const RESERVE_OPFILTER = 0x0010_0000;
        const OPEN_REPARSE_POINT = 0x0020_0000;
        const OPEN_NO_RECALL = 0x0040_0000;
        const OPEN_FOR_FREE_SPACE_QUERY = 0x0080_0000;
    }
}

flags! {
    /// Create response flags.
    pub struct CreateFlags: u8 {
        const REPARSEPOINT = 0x01;
    }
}

flags! {
    /// File attributes.
    pub struct FileAttributes: u32 {
        const READONLY = 0x0000_0001;
        const HIDDEN = 0x0000_0002;
        const SYSTEM = 0x0000_0004;
        const DIRECTORY = 0x0000_0010;
        const ARCHIVE = 0x0000_0020;
        const NORMAL = 0x0000_0080;
        const TEMPORARY = 0x0000_0100;
        const SPARSE_FILE = 0x0000_0200;
        const REPARSE_POINT = 0x0000_0400;
        const COMPRESSED = 0x0000_0800;
        const OFFLINE = 0x0000_1000;
        const NOT_CONTENT_INDEXED = 0x0000_2000;
        const ENCRYPTED = 0x0000_4000;
        const INTEGRITY_STREAM = 0x0000_8000;
        const NO_SCRUB_DATA = 0x0002_0000;
    }
}

flags! {
    /// Close flags.
    pub struct CloseFlags: u16 {
        const POSTQUERY_ATTRIB = 0x0001;
    }
}

flags! {
    /// Compression capability flags.
    pub struct CompressionFlags: u32 {
        const CHAINED = 0x0000_0001;
    }
}

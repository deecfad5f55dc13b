//! End-to-end exchanges framed the way they travel on a direct TCP connection.

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use smbwire_codec::{Decode, DecodeExt, Encode, Error as CodecError, FileTime};
use smbwire_messages::{
    constants::{
        Capabilities, Cipher, Command, CreateDisposition, CreateOptions, Dialect,
        HashAlgorithm, HeaderFlags, ImpersonationLevel, SecurityMode, ShareAccess, Status,
        TreeFlags,
    },
    create::{CreateContext, CreateContextName, CreateRequest, CreateResponse, FileId},
    error_response::ErrorResponse,
    ioctl::{IoctlRequest, ValidateNegotiateInfoRequest},
    negotiate::{
        EncryptionCapabilities, NegotiateContext, NegotiateRequest,
        PreauthIntegrityCapabilities,
    },
    smb1::{Smb1Header, Smb1NegotiateRequest},
    transform::TransformHeader,
    transport::DirectTcp,
    tree::TreeConnectRequest,
    Body, Direction, Error, Header, HeaderForm, Limits, StatusField,
};
use test_case::test_case;
use uuid::Uuid;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Frames `body` behind a fresh header, then decodes it back through every layer.
fn exchange(header: Header, body: &Body) -> (Bytes, Body) {
    let limits = Limits::default();
    let form = header.status.form();
    let frame = DirectTcp::new(header.with_body(body).encode()).encode().freeze();

    let decoded = DirectTcp::decode_cfg(frame.clone(), &limits.frame).unwrap();
    let header = Header::decode_cfg(decoded.message, &form).unwrap();
    (frame, Body::parse(&header, &limits).unwrap())
}

fn response() -> Header {
    Header {
        flags: HeaderFlags::SERVER_TO_REDIR,
        ..Default::default()
    }
}

#[test]
fn test_negotiate_with_three_dialects() {
    init_logging();
    let request = NegotiateRequest {
        security_mode: SecurityMode::SIGNING_ENABLED,
        capabilities: Capabilities::empty(),
        client_guid: Uuid::nil(),
        dialects: vec![Dialect::Smb202, Dialect::Smb210, Dialect::Smb311],
        contexts: vec![NegotiateContext::PreauthIntegrity(
            PreauthIntegrityCapabilities {
                hash_algorithms: vec![HashAlgorithm::Sha512],
                salt: Bytes::from_static(&[0x5A; 32]),
            },
        )],
    };
    assert_eq!(request.context_offset(), 64 + 36 + 6 + 6);

    let (frame, body) = exchange(
        Header::new(Command::Negotiate),
        &Body::NegotiateRequest(request.clone()),
    );
    assert_eq!(body, Body::NegotiateRequest(request));

    // Frame length, SMB2 header, then the negotiate body.
    let body = &frame[4 + 64..];
    assert_eq!(&body[2..4], &[3, 0]);
    assert_eq!(&body[28..32], &112u32.to_le_bytes());
    assert_eq!(&body[36 + 6..36 + 12], &[0; 6]);
}

#[test]
fn test_negotiate_context_entries_are_aligned() {
    let request = NegotiateRequest {
        dialects: vec![Dialect::Smb311],
        contexts: vec![
            NegotiateContext::PreauthIntegrity(PreauthIntegrityCapabilities {
                hash_algorithms: vec![HashAlgorithm::Sha512],
                salt: Bytes::from_static(&[1; 3]),
            }),
            NegotiateContext::Encryption(EncryptionCapabilities {
                ciphers: vec![Cipher::Aes128Gcm, Cipher::Aes256Gcm],
            }),
        ],
        ..Default::default()
    };
    let encoded = Header::new(Command::Negotiate)
        .with_body(&Body::NegotiateRequest(request.clone()))
        .encode();

    // The first entry is 8 + 7 bytes long, so the second starts one 8-byte boundary later.
    let offset = request.context_offset();
    assert_eq!(offset % 8, 0);
    assert_eq!(&encoded[offset..offset + 2], &[1, 0]);
    assert_eq!(&encoded[offset + 15..offset + 16], &[0]);
    assert_eq!(&encoded[offset + 16..offset + 18], &[2, 0]);
}

#[test]
fn test_smb1_negotiate_opens_connection() {
    let header = Smb1Header::negotiate(Smb1NegotiateRequest::smb2());
    let frame = DirectTcp::new(header.encode()).encode();
    let frame = DirectTcp::decode_cfg(frame, &Limits::default().frame).unwrap();
    assert_eq!(&frame.message[..4], &[0xFF, b'S', b'M', b'B']);
    assert_eq!(Smb1Header::decode(frame.message).unwrap(), header);
}

#[test]
fn test_tree_connect() {
    let request = TreeConnectRequest::new(TreeFlags::empty(), r"\\server\share");
    let (_, body) = exchange(
        Header::new(Command::TreeConnect),
        &Body::TreeConnectRequest(request),
    );
    let Body::TreeConnectRequest(request) = body else {
        panic!("expected tree connect request");
    };
    assert_eq!(request.path().unwrap(), r"\\server\share");
}

#[test]
fn test_create_with_context_chain() {
    init_logging();
    let request = CreateRequest {
        impersonation_level: ImpersonationLevel::Impersonation,
        desired_access: 0x0012_0089,
        share_access: ShareAccess::READ | ShareAccess::WRITE,
        create_disposition: CreateDisposition::Open,
        create_options: CreateOptions::NON_DIRECTORY_FILE,
        contexts: vec![
            CreateContext::QueryMaximalAccessRequest(None),
            CreateContext::QueryOnDiskId,
            CreateContext::from_raw(
                CreateContextName::from_bytes(Bytes::from_static(b"ZZZZ")),
                Bytes::from_static(&[7; 3]),
                Direction::Request,
            )
            .unwrap(),
        ],
        ..CreateRequest::new("dir\\file.txt")
    };
    let (_, body) = exchange(
        Header::new(Command::Create),
        &Body::CreateRequest(request.clone()),
    );
    let Body::CreateRequest(decoded) = body else {
        panic!("expected create request");
    };
    assert_eq!(decoded.contexts.len(), 3);
    assert_eq!(decoded.name().unwrap(), "dir\\file.txt");
    assert_eq!(decoded, request);
}

#[test]
fn test_create_response_times() {
    let created = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
    let response = CreateResponse {
        creation_time: FileTime::from(created),
        file_id: FileId {
            persistent: 1,
            volatile: 2,
        },
        ..Default::default()
    };
    let (_, body) = exchange(self::response(), &Body::CreateResponse(response));
    let Body::CreateResponse(decoded) = body else {
        panic!("expected create response");
    };
    assert_eq!(decoded.creation_time.to_datetime(), Some(created));
}

#[test]
fn test_validate_negotiate_on_smb3_channel() {
    let info = ValidateNegotiateInfoRequest {
        capabilities: Capabilities::empty(),
        guid: Uuid::nil(),
        security_mode: SecurityMode::SIGNING_REQUIRED,
        dialects: vec![Dialect::Smb300, Dialect::Smb302],
    };
    let header = Header {
        status: StatusField::ChannelSequence(1),
        ..Header::new(Command::Ioctl)
    };
    let request = IoctlRequest::validate_negotiate_info(&info);
    let (_, body) = exchange(header, &Body::IoctlRequest(request.clone()));
    assert_eq!(body, Body::IoctlRequest(request));
}

#[test_case(0x00; "zero reserved")]
#[test_case(0xFF; "set reserved")]
fn test_empty_error_response(reserved: u8) {
    let mut header = response();
    header.command = Command::Create;
    header.status = StatusField::Status(Status::AccessDenied);
    header.data = Bytes::from(vec![9, 0, 0, reserved, 0, 0, 0, 0]);

    let body = Body::parse(&header, &Limits::default()).unwrap();
    let Body::ErrorResponse(error) = body else {
        panic!("expected error response");
    };
    assert!(error.error_contexts.is_empty());
    assert_eq!(error.byte_count(), 0);
    assert_eq!(error, ErrorResponse::default());
}

/// Start of the context area of a create request named "a": 120 + 2 bytes of name, aligned.
const CONTEXTS_OFFSET: usize = 128;

#[test]
fn test_create_chain_next_outside_buffer() {
    let request = CreateRequest {
        contexts: vec![CreateContext::QueryOnDiskId, CreateContext::QueryOnDiskId],
        ..CreateRequest::new("a")
    };
    let header = Header::new(Command::Create).with_body(&Body::CreateRequest(request));
    let mut raw = header.encode();

    // Point the first entry's `next` past the end of the context area.
    let start = CONTEXTS_OFFSET;
    raw[start..start + 4].copy_from_slice(&0x100u32.to_le_bytes());
    let header = Header::decode_cfg(raw, &HeaderForm::Status).unwrap();

    let Error::Codec(err) = Body::parse(&header, &Limits::default()).unwrap_err() else {
        panic!("expected codec error");
    };
    assert_eq!(err.path(), "buffer_contexts.next");
    assert_eq!(err.root(), &CodecError::EndOfBuffer);
}

#[test]
fn test_transform_wraps_encrypted_message() {
    let transform = TransformHeader {
        signature: [0x11; 16],
        nonce: [0x22; 16],
        session_id: 0x0000_0400_0000_0001,
        data: Bytes::from_static(&[0xC3; 40]),
    };
    let frame = DirectTcp::new(transform.encode()).encode();
    let frame = DirectTcp::decode_cfg(frame, &Limits::default().frame).unwrap();
    assert_eq!(&frame.message[..4], &[0xFD, b'S', b'M', b'B']);
    assert_eq!(TransformHeader::decode(frame.message).unwrap(), transform);
}

#[test]
fn test_frame_limit() {
    let frame = DirectTcp::new(Bytes::from_static(&[0; 16])).encode();
    let limits = Limits {
        frame: (..=8).into(),
        ..Default::default()
    };
    let err = DirectTcp::decode_cfg(frame, &limits.frame).unwrap_err();
    assert_eq!(err.path(), "stream_protocol_length");
    assert_eq!(err.root(), &CodecError::InvalidLength(16));
}

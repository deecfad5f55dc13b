#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use smbwire_codec::{Decode, Encode, EncodeSize};
use smbwire_messages::{
    constants::{Command, HeaderFlags, Status},
    smb1::Smb1Header,
    transform::TransformHeader,
    transport::DirectTcp,
    Body, Header, HeaderForm, Limits, StatusField,
};

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    Frame(Vec<u8>),
    Header { channel_sequence: bool, data: Vec<u8> },
    Body {
        command: u16,
        response: bool,
        status: u32,
        data: Vec<u8>,
    },
    Transform(Vec<u8>),
    Smb1(Vec<u8>),
}

/// Re-encodes a decoded body and checks it decodes to the same value.
fn roundtrip_body(header: &Header, limits: &Limits) {
    let Ok(body) = Body::parse(header, limits) else {
        return;
    };
    let mut rebuilt = header.clone();
    rebuilt.next_command = 0;
    rebuilt.data = body.encode_bytes();
    assert_eq!(body.encode_size(), rebuilt.data.len());
    let decoded = Body::parse(&rebuilt, limits).expect("failed to decode an encoded body");
    assert_eq!(decoded, body);
}

fn fuzz(input: FuzzInput) {
    let limits = Limits::default();
    match input {
        FuzzInput::Frame(data) => {
            if let Ok(frame) = DirectTcp::decode_cfg(Bytes::from(data), &limits.frame) {
                assert_eq!(frame.encode_size(), 4 + frame.message.len());
                if let Ok(header) = Header::decode_cfg(frame.message, &HeaderForm::Status) {
                    roundtrip_body(&header, &limits);
                }
            }
        }
        FuzzInput::Header {
            channel_sequence,
            data,
        } => {
            let form = if channel_sequence {
                HeaderForm::ChannelSequence
            } else {
                HeaderForm::Status
            };
            if let Ok(header) = Header::decode_cfg(Bytes::from(data), &form) {
                let encoded = header.encode();
                let decoded =
                    Header::decode_cfg(encoded, &form).expect("failed to decode an encoded header");
                assert_eq!(decoded, header);
                roundtrip_body(&header, &limits);
            }
        }
        FuzzInput::Body {
            command,
            response,
            status,
            data,
        } => {
            let mut header = Header::new(Command::from_code(command));
            if response {
                header.flags = HeaderFlags::SERVER_TO_REDIR;
            }
            header.status = StatusField::Status(Status::from_code(status));
            header.data = Bytes::from(data);
            roundtrip_body(&header, &limits);
        }
        FuzzInput::Transform(data) => {
            if let Ok(transform) = TransformHeader::decode_cfg(Bytes::from(data), &()) {
                let decoded = TransformHeader::decode_cfg(transform.encode(), &())
                    .expect("failed to decode an encoded transform header");
                assert_eq!(decoded, transform);
            }
        }
        FuzzInput::Smb1(data) => {
            if let Ok(header) = Smb1Header::decode_cfg(Bytes::from(data), &()) {
                let decoded = Smb1Header::decode_cfg(header.encode(), &())
                    .expect("failed to decode an encoded SMB1 header");
                assert_eq!(decoded, header);
            }
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});

//! Message bodies, selected by the command and direction of the header that carries them.

use crate::{
    close::{CloseRequest, CloseResponse},
    config::Limits,
    constants::{Command, HeaderFlags, Status},
    create::{CreateRequest, CreateResponse},
    error_response::ErrorResponse,
    header::Header,
    ioctl::{IoctlRequest, IoctlResponse},
    negotiate::{NegotiateRequest, NegotiateResponse},
    session::{Logoff, SessionSetupRequest, SessionSetupResponse},
    tree::{TreeConnectRequest, TreeConnectResponse, TreeDisconnect},
    Error,
};
use bytes::BufMut;
use smbwire_codec::{Encode, EncodeSize, Read, ReadExt, Write};
use tracing::{debug, trace};

/// The body of an SMB2 message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    NegotiateRequest(NegotiateRequest),
    NegotiateResponse(NegotiateResponse),
    SessionSetupRequest(SessionSetupRequest),
    SessionSetupResponse(SessionSetupResponse),
    LogoffRequest(Logoff),
    LogoffResponse(Logoff),
    TreeConnectRequest(TreeConnectRequest),
    TreeConnectResponse(TreeConnectResponse),
    TreeDisconnectRequest(TreeDisconnect),
    TreeDisconnectResponse(TreeDisconnect),
    CreateRequest(CreateRequest),
    CreateResponse(CreateResponse),
    CloseRequest(CloseRequest),
    CloseResponse(CloseResponse),
    IoctlRequest(IoctlRequest),
    IoctlResponse(IoctlResponse),
    /// Sent in place of the command's response when the status is an error.
    ErrorResponse(ErrorResponse),
}

/// Returns true if a response with `status` to `command` carries an error body.
///
/// A session setup that needs another round trip reports `MoreProcessingRequired` with a
/// regular session setup response.
fn is_error_body(command: Command, status: Status) -> bool {
    if command == Command::SessionSetup && status == Status::MoreProcessingRequired {
        return false;
    }
    status.is_error()
}

impl Body {
    /// Decodes the body of the message carried by `header`.
    ///
    /// Only the bytes before the next compounded message are considered. Bytes after the body
    /// (such as the filler byte some servers append to an empty error response) are ignored.
    pub fn parse(header: &Header, limits: &Limits) -> Result<Self, Error> {
        let mut data = header.body();
        let response = header.is_response();
        trace!(
            command = %header.command,
            response,
            len = data.len(),
            "parsing body"
        );

        if response {
            if let Some(status) = header.status().filter(|s| is_error_body(header.command, *s)) {
                debug!(command = %header.command, %status, "parsing error response");
                let body = ErrorResponse::read_cfg(&mut data, &limits.contexts)?;
                return Ok(Self::ErrorResponse(body));
            }
        }

        let body = match (header.command, response) {
            (Command::Negotiate, false) => {
                Self::NegotiateRequest(NegotiateRequest::read_cfg(&mut data, &limits.contexts)?)
            }
            (Command::Negotiate, true) => {
                Self::NegotiateResponse(NegotiateResponse::read_cfg(&mut data, &limits.contexts)?)
            }
            (Command::SessionSetup, false) => {
                Self::SessionSetupRequest(SessionSetupRequest::read(&mut data)?)
            }
            (Command::SessionSetup, true) => {
                Self::SessionSetupResponse(SessionSetupResponse::read(&mut data)?)
            }
            (Command::Logoff, false) => Self::LogoffRequest(Logoff::read(&mut data)?),
            (Command::Logoff, true) => Self::LogoffResponse(Logoff::read(&mut data)?),
            (Command::TreeConnect, false) => {
                Self::TreeConnectRequest(TreeConnectRequest::read(&mut data)?)
            }
            (Command::TreeConnect, true) => {
                Self::TreeConnectResponse(TreeConnectResponse::read(&mut data)?)
            }
            (Command::TreeDisconnect, false) => {
                Self::TreeDisconnectRequest(TreeDisconnect::read(&mut data)?)
            }
            (Command::TreeDisconnect, true) => {
                Self::TreeDisconnectResponse(TreeDisconnect::read(&mut data)?)
            }
            (Command::Create, false) => {
                Self::CreateRequest(CreateRequest::read_cfg(&mut data, &limits.contexts)?)
            }
            (Command::Create, true) => {
                Self::CreateResponse(CreateResponse::read_cfg(&mut data, &limits.contexts)?)
            }
            (Command::Close, false) => Self::CloseRequest(CloseRequest::read(&mut data)?),
            (Command::Close, true) => Self::CloseResponse(CloseResponse::read(&mut data)?),
            (Command::Ioctl, false) => Self::IoctlRequest(IoctlRequest::read(&mut data)?),
            (Command::Ioctl, true) => Self::IoctlResponse(IoctlResponse::read(&mut data)?),
            (command, _) => {
                debug!(%command, response, "no body decoder");
                return Err(Error::UnsupportedCommand(command));
            }
        };
        Ok(body)
    }

    /// Returns the command this body belongs to, or `None` for an error response (which
    /// answers any command).
    pub fn command(&self) -> Option<Command> {
        Some(match self {
            Self::NegotiateRequest(_) | Self::NegotiateResponse(_) => Command::Negotiate,
            Self::SessionSetupRequest(_) | Self::SessionSetupResponse(_) => Command::SessionSetup,
            Self::LogoffRequest(_) | Self::LogoffResponse(_) => Command::Logoff,
            Self::TreeConnectRequest(_) | Self::TreeConnectResponse(_) => Command::TreeConnect,
            Self::TreeDisconnectRequest(_) | Self::TreeDisconnectResponse(_) => {
                Command::TreeDisconnect
            }
            Self::CreateRequest(_) | Self::CreateResponse(_) => Command::Create,
            Self::CloseRequest(_) | Self::CloseResponse(_) => Command::Close,
            Self::IoctlRequest(_) | Self::IoctlResponse(_) => Command::Ioctl,
            Self::ErrorResponse(_) => return None,
        })
    }

    /// Returns true if the body is sent by a server.
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Self::NegotiateResponse(_)
                | Self::SessionSetupResponse(_)
                | Self::LogoffResponse(_)
                | Self::TreeConnectResponse(_)
                | Self::TreeDisconnectResponse(_)
                | Self::CreateResponse(_)
                | Self::CloseResponse(_)
                | Self::IoctlResponse(_)
                | Self::ErrorResponse(_)
        )
    }
}

impl Write for Body {
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            Self::NegotiateRequest(body) => body.write(buf),
            Self::NegotiateResponse(body) => body.write(buf),
            Self::SessionSetupRequest(body) => body.write(buf),
            Self::SessionSetupResponse(body) => body.write(buf),
            Self::LogoffRequest(body) | Self::LogoffResponse(body) => body.write(buf),
            Self::TreeConnectRequest(body) => body.write(buf),
            Self::TreeConnectResponse(body) => body.write(buf),
            Self::TreeDisconnectRequest(body) | Self::TreeDisconnectResponse(body) => {
                body.write(buf)
            }
            Self::CreateRequest(body) => body.write(buf),
            Self::CreateResponse(body) => body.write(buf),
            Self::CloseRequest(body) => body.write(buf),
            Self::CloseResponse(body) => body.write(buf),
            Self::IoctlRequest(body) => body.write(buf),
            Self::IoctlResponse(body) => body.write(buf),
            Self::ErrorResponse(body) => body.write(buf),
        }
    }
}

impl EncodeSize for Body {
    fn encode_size(&self) -> usize {
        match self {
            Self::NegotiateRequest(body) => body.encode_size(),
            Self::NegotiateResponse(body) => body.encode_size(),
            Self::SessionSetupRequest(body) => body.encode_size(),
            Self::SessionSetupResponse(body) => body.encode_size(),
            Self::LogoffRequest(body) | Self::LogoffResponse(body) => body.encode_size(),
            Self::TreeConnectRequest(body) => body.encode_size(),
            Self::TreeConnectResponse(body) => body.encode_size(),
            Self::TreeDisconnectRequest(body) | Self::TreeDisconnectResponse(body) => {
                body.encode_size()
            }
            Self::CreateRequest(body) => body.encode_size(),
            Self::CreateResponse(body) => body.encode_size(),
            Self::CloseRequest(body) => body.encode_size(),
            Self::CloseResponse(body) => body.encode_size(),
            Self::IoctlRequest(body) => body.encode_size(),
            Self::IoctlResponse(body) => body.encode_size(),
            Self::ErrorResponse(body) => body.encode_size(),
        }
    }
}

impl Header {
    /// Attaches `body`, setting the command and the server-to-redirector flag to match it.
    pub fn with_body(mut self, body: &Body) -> Self {
        if let Some(command) = body.command() {
            self.command = command;
        }
        self.flags.set(HeaderFlags::SERVER_TO_REDIR, body.is_response());
        self.data = body.encode_bytes();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::HeaderForm,
        constants::{Dialect, SecurityMode, SessionFlags},
        header::StatusField,
        HEADER_SIZE,
    };
    use bytes::Bytes;
    use smbwire_codec::{Decode, FileTime};
    use uuid::Uuid;

    fn roundtrip(header: Header) -> Header {
        Header::decode_cfg(header.encode(), &HeaderForm::Status).unwrap()
    }

    #[test]
    fn test_parse_request() {
        let body = Body::NegotiateRequest(NegotiateRequest {
            security_mode: SecurityMode::SIGNING_ENABLED,
            dialects: vec![Dialect::Smb210, Dialect::Smb302],
            ..Default::default()
        });
        let header = roundtrip(Header::default().with_body(&body));
        assert_eq!(header.command, Command::Negotiate);
        assert!(!header.is_response());
        assert_eq!(Body::parse(&header, &Limits::default()).unwrap(), body);
    }

    #[test]
    fn test_parse_response() {
        let body = Body::NegotiateResponse(NegotiateResponse {
            security_mode: SecurityMode::SIGNING_ENABLED,
            dialect: Dialect::Smb302,
            server_guid: Uuid::nil(),
            capabilities: Default::default(),
            max_transact_size: 65_536,
            max_read_size: 65_536,
            max_write_size: 65_536,
            system_time: FileTime(1),
            server_start_time: FileTime(0),
            security_buffer: Bytes::from_static(&[0x60]),
            contexts: vec![],
        });
        let header = roundtrip(Header::default().with_body(&body));
        assert!(header.is_response());
        assert_eq!(Body::parse(&header, &Limits::default()).unwrap(), body);
    }

    #[test]
    fn test_error_status_selects_error_response() {
        let mut header =
            Header::new(Command::Create).with_body(&Body::ErrorResponse(ErrorResponse::default()));
        header.status = StatusField::Status(Status::ObjectNameNotFound);
        let header = roundtrip(header);
        assert_eq!(header.command, Command::Create);
        assert_eq!(
            Body::parse(&header, &Limits::default()).unwrap(),
            Body::ErrorResponse(ErrorResponse::default())
        );
    }

    #[test]
    fn test_more_processing_is_not_an_error_body() {
        let body = Body::SessionSetupResponse(SessionSetupResponse {
            session_flags: SessionFlags::empty(),
            security_buffer: Bytes::from_static(&[0xA1, 0x81]),
        });
        let mut header = Header::default().with_body(&body);
        header.status = StatusField::Status(Status::MoreProcessingRequired);
        let header = roundtrip(header);
        assert_eq!(Body::parse(&header, &Limits::default()).unwrap(), body);
    }

    #[test]
    fn test_error_response_filler_byte() {
        let mut header = Header::new(Command::TreeConnect);
        header.flags = HeaderFlags::SERVER_TO_REDIR;
        header.status = StatusField::Status(Status::BadNetworkName);
        header.data = Bytes::from_static(&[9, 0, 0, 0, 0, 0, 0, 0, 0]);
        let body = Body::parse(&header, &Limits::default()).unwrap();
        assert_eq!(body, Body::ErrorResponse(ErrorResponse::default()));
    }

    #[test]
    fn test_unsupported_command() {
        let mut header = Header::new(Command::Echo);
        header.data = Bytes::from_static(&[4, 0, 0, 0]);
        assert_eq!(
            Body::parse(&header, &Limits::default()),
            Err(Error::UnsupportedCommand(Command::Echo))
        );
    }

    #[test]
    fn test_compound_body() {
        let second = Header::default()
            .with_body(&Body::LogoffRequest(Logoff))
            .encode();

        // The first body is padded to 8 bytes before the next header.
        let mut first = Header::default().with_body(&Body::TreeDisconnectRequest(TreeDisconnect));
        let mut data = first.data.to_vec();
        data.resize(8, 0);
        data.extend_from_slice(&second);
        first.data = Bytes::from(data);
        first.next_command = (HEADER_SIZE + 8) as u32;

        let body = Body::parse(&first, &Limits::default()).unwrap();
        assert_eq!(body, Body::TreeDisconnectRequest(TreeDisconnect));
    }

    #[test]
    fn test_truncated_body() {
        let mut header = Header::new(Command::Close);
        header.data = Bytes::from_static(&[24, 0, 0, 0]);
        let err = Body::parse(&header, &Limits::default()).unwrap_err();
        let Error::Codec(err) = err else {
            panic!("expected codec error");
        };
        assert_eq!(err.path(), "reserved");
    }
}

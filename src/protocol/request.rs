// ABOUTME: Parses a complete control message into a `Request`
// ABOUTME: Grounded on `original_source/videoRTSPServer/RTSPsession.cpp`'s `RTSPRequest::parse*`

use thiserror::Error;

use crate::datatypes::Method;

/// A decoded client request. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub version: String,
    pub seq: u32,
    pub session_id: Option<String>,
    pub client_ports: Option<(u16, u16)>,
}

/// Failure parsing a control message. Both variants map to a 400 reply
/// (§7: "Parse failure"), matching the teacher's typed `frame`/`codec`
/// error enums rather than a bare status code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request message has no request line")]
    MissingRequestLine,
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),
}

impl Request {
    /// Parses a complete message: one request line followed by zero or
    /// more header lines, terminated by the blank-line delimiter the
    /// caller has already located and stripped.
    #[tracing::instrument]
    pub fn parse(msg: &str) -> Result<Request, ParseError> {
        let mut lines = msg.lines().map(|line| line.trim_end_matches('\r'));

        let request_line = lines.next().filter(|l| !l.is_empty());
        let request_line = request_line.ok_or(ParseError::MissingRequestLine)?;

        let mut parts = request_line.split_whitespace();
        let method_token = parts.next();
        let url = parts.next();
        let version = parts.next();

        let (method_token, url, version) = match (method_token, url, version) {
            (Some(m), Some(u), Some(v)) => (m, u, v),
            _ => {
                return Err(ParseError::MalformedRequestLine(request_line.to_string()));
            }
        };

        let mut request = Request {
            method: Method::from_token(method_token),
            url: url.to_string(),
            version: version.to_string(),
            seq: 0,
            session_id: None,
            client_ports: None,
        };

        for line in lines {
            if line.is_empty() {
                break;
            }
            request.apply_header_line(line)?;
        }

        Ok(request)
    }

    /// Splits at the first `:`, trims both sides, and recognizes `CSeq`,
    /// `Session`, and `Transport`. Any other header name is ignored, and a
    /// malformed value for a recognized one leaves the corresponding field
    /// unset (§4.C: "Any other header is ignored"), but a line with no `:`
    /// at all fails the whole message, matching `RTSPRequest::parseOneLine`
    /// returning `-1` when no colon is found.
    fn apply_header_line(&mut self, line: &str) -> Result<(), ParseError> {
        let Some((key, value)) = line.split_once(':') else {
            return Err(ParseError::MalformedHeaderLine(line.to_string()));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "CSeq" => {
                if let Ok(seq) = value.parse() {
                    self.seq = seq;
                }
            }
            "Session" => self.session_id = Some(value.to_string()),
            "Transport" => self.client_ports = parse_client_ports(value),
            _ => {}
        }

        Ok(())
    }
}

/// Locates `client_port=<rtp>-<rtcp>` within a `Transport` header value.
fn parse_client_ports(value: &str) -> Option<(u16, u16)> {
    let rest = value.split_once("client_port=")?.1;
    let (rtp, rest) = rest.split_once('-')?;
    let rtcp_digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rtp_digits: String = rtp.chars().take_while(|c| c.is_ascii_digit()).collect();

    let rtp_port: u16 = rtp_digits.parse().ok()?;
    let rtcp_port: u16 = rtcp_digits.parse().ok()?;
    Some((rtp_port, rtcp_port))
}

// ABOUTME: Composes status lines, headers, and a session-description body into a reply string
// ABOUTME: Grounded on `original_source/videoRTSPServer/RTSPsession.cpp`'s `RTSPReply::toString`/`generateSDP`

use std::fmt::Write as _;

use crate::datatypes::{Method, StatusCode};

/// The `Content-Base` the DESCRIBE reply advertises, matching §4.C's fixed
/// template (the server serves one fixed asset at one fixed URL).
const CONTENT_BASE: &str = "rtsp://127.0.0.1:8554/live";

/// An encoded server response. Owns no I/O; `to_string` produces the exact
/// bytes a caller writes to the control socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub method: Method,
    pub seq: u32,
    pub session_id: Option<String>,
    pub public_methods: Option<&'static str>,
    pub transport: Option<String>,
    pub range: Option<String>,
    pub body: Option<String>,
}

impl Reply {
    /// A bare reply to the given status, echoing the request's sequence
    /// number. Handlers fill in the method-dependent fields afterward.
    pub fn new(status: StatusCode, method: Method, seq: u32) -> Reply {
        Reply {
            status,
            method,
            seq,
            session_id: None,
            public_methods: None,
            transport: None,
            range: None,
            body: None,
        }
    }

    /// Fixed session-description template for a single H.264 video track
    /// at 90 kHz (§4.C). `session_id` appears in the origin line only.
    pub fn generate_sdp(session_id: &str) -> String {
        let mut sdp = String::new();
        let _ = writeln!(sdp, "v=0\r");
        let _ = writeln!(sdp, "o=- {session_id} 1 IN IP4 127.0.0.1\r");
        let _ = writeln!(sdp, "s=Simple RTSP Server\r");
        let _ = writeln!(sdp, "c=IN IP4 0.0.0.0\r");
        let _ = writeln!(sdp, "t=0 0\r");
        let _ = writeln!(sdp, "m=video 0 RTP/AVP 96\r");
        let _ = writeln!(sdp, "a=rtpmap:96 H264/90000\r");
        let _ = writeln!(sdp, "a=fmtp:96 packetization-mode=1\r");
        let _ = writeln!(sdp, "a=control:track0\r");
        sdp
    }

    /// Composes the full reply text: status line, common headers,
    /// method-dependent headers (only when `status` is 200), the blank
    /// line, and, for DESCRIBE, the SDP body.
    pub fn to_string(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "RTSP/1.0 {} {}\r",
            self.status.code(),
            self.status.reason()
        );
        let _ = writeln!(out, "CSeq: {}\r", self.seq);

        if let Some(session_id) = &self.session_id {
            let _ = writeln!(out, "Session: {session_id}\r");
        }

        if self.status == StatusCode::Ok {
            match self.method {
                Method::Options => {
                    if let Some(methods) = self.public_methods {
                        let _ = writeln!(out, "Public: {methods}\r");
                    }
                }
                Method::Describe => {
                    let body_len = self.body.as_deref().unwrap_or_default().len();
                    let _ = writeln!(out, "Content-Type: application/sdp\r");
                    let _ = writeln!(out, "Content-Length: {body_len}\r");
                    let _ = writeln!(out, "Content-Base: {CONTENT_BASE}\r");
                }
                Method::Setup => {
                    if let Some(transport) = &self.transport {
                        let _ = writeln!(out, "Transport: {transport}\r");
                    }
                }
                Method::Play => {
                    if let Some(range) = &self.range {
                        let _ = writeln!(out, "Range: {range}\r");
                    }
                }
                _ => {}
            }
        }

        let _ = write!(out, "\r\n");

        if self.method == Method::Describe {
            if let Some(body) = &self.body {
                out.push_str(body);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_reply_lists_supported_methods() {
        let mut reply = Reply::new(StatusCode::Ok, Method::Options, 1);
        reply.public_methods = Some(Method::SUPPORTED);
        let text = reply.to_string();
        assert!(text.starts_with("RTSP/1.0 200 OK\r\n"));
        assert!(text.contains("CSeq: 1\r\n"));
        assert!(text.contains("Public: OPTIONS, DESCRIBE, SETUP, PLAY, TEARDOWN\r\n"));
    }

    #[test]
    fn describe_reply_includes_sdp_body_and_length() {
        let sdp = Reply::generate_sdp("ABCD1234");
        let mut reply = Reply::new(StatusCode::Ok, Method::Describe, 2);
        reply.body = Some(sdp.clone());
        let text = reply.to_string();

        assert!(text.contains("Content-Type: application/sdp\r\n"));
        assert!(text.contains(&format!("Content-Length: {}\r\n", sdp.len())));
        assert!(text.contains("Content-Base: rtsp://127.0.0.1:8554/live\r\n"));
        assert!(text.ends_with(&sdp));
        assert!(sdp.starts_with("v=0\r\n"));
        assert!(sdp.contains("m=video 0 RTP/AVP 96\r\n"));
        assert!(sdp.contains("a=rtpmap:96 H264/90000\r\n"));
    }

    #[test]
    fn setup_reply_echoes_session_and_transport() {
        let mut reply = Reply::new(StatusCode::Ok, Method::Setup, 3);
        reply.session_id = Some("DEADBEEF".to_string());
        reply.transport = Some(
            "RTP/AVP;unicast;client_port=4000-4001;server_port=55000-55001".to_string(),
        );
        let text = reply.to_string();
        assert!(text.contains("Session: DEADBEEF\r\n"));
        assert!(text.contains(
            "Transport: RTP/AVP;unicast;client_port=4000-4001;server_port=55000-55001\r\n"
        ));
    }

    #[test]
    fn play_reply_includes_range() {
        let mut reply = Reply::new(StatusCode::Ok, Method::Play, 4);
        reply.range = Some("npt=0.000-9.000".to_string());
        assert!(reply.to_string().contains("Range: npt=0.000-9.000\r\n"));
    }

    #[test]
    fn non_ok_status_omits_method_dependent_headers() {
        let mut reply = Reply::new(StatusCode::MethodNotAllowed, Method::Unknown, 5);
        reply.public_methods = Some(Method::SUPPORTED);
        let text = reply.to_string();
        assert!(!text.contains("Public:"));
        assert!(text.starts_with("RTSP/1.0 405 Method Not Allowed\r\n"));
    }

    #[test]
    fn reply_always_ends_with_blank_line() {
        let reply = Reply::new(StatusCode::Ok, Method::Teardown, 6);
        assert!(reply.to_string().ends_with("\r\n\r\n"));
    }
}

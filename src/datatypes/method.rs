// ABOUTME: Defines the RTSP request methods recognized on the control channel
// ABOUTME: Implements the method token <-> wire string mapping used by the parser and composer

use std::fmt;

/// RTSP request method (§6: request line `METHOD SP URL SP VERSION`).
///
/// Any token not present in this table is mapped to [`Method::Unknown`]
/// rather than rejected outright; the session controller answers those with
/// `405 Method Not Allowed` instead of `400 Bad Request`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Options,
    Describe,
    Setup,
    Play,
    Teardown,
    Pause,
    GetParameter,
    SetParameter,
    Unknown,
}

impl Method {
    /// Methods advertised in the OPTIONS reply's `Public` header, in the
    /// fixed order the server supports them (§4.D dispatch table).
    pub const SUPPORTED: &'static str = "OPTIONS, DESCRIBE, SETUP, PLAY, TEARDOWN";

    pub fn from_token(token: &str) -> Method {
        match token {
            "OPTIONS" => Method::Options,
            "DESCRIBE" => Method::Describe,
            "SETUP" => Method::Setup,
            "PLAY" => Method::Play,
            "TEARDOWN" => Method::Teardown,
            "PAUSE" => Method::Pause,
            "GET_PARAMETER" => Method::GetParameter,
            "SET_PARAMETER" => Method::SetParameter,
            _ => Method::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Options => "OPTIONS",
            Method::Describe => "DESCRIBE",
            Method::Setup => "SETUP",
            Method::Play => "PLAY",
            Method::Teardown => "TEARDOWN",
            Method::Pause => "PAUSE",
            Method::GetParameter => "GET_PARAMETER",
            Method::SetParameter => "SET_PARAMETER",
            Method::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

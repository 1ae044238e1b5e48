// ABOUTME: Server-wide fixed configuration, with optional environment-variable overrides
// ABOUTME: Defaults reproduce the original's hard-coded file path, port, and frame rate exactly

/// Bundled sample media path, matching the original's hard-coded `.h264`
/// path (§6: "the media file path is hard-coded at the call site").
const DEFAULT_MEDIA_FILE: &str = "data/sample.h264";

const DEFAULT_LISTEN_PORT: u16 = 8554;
const DEFAULT_FRAME_RATE: u32 = 60;

/// Local UDP ports the server binds for outbound media and (unread)
/// control feedback. Fixed per §6; a single concurrent session is
/// supported by design (§5).
pub const RTP_LOCAL_PORT: u16 = 55000;
pub const RTCP_LOCAL_PORT: u16 = 55001;

/// Payload budget under typical MTU (§4.D step 3).
pub const MAX_RTP_PAYLOAD_SIZE: usize = 1400;

/// H.264 video payload type advertised in SETUP/DESCRIBE and stamped on
/// every outgoing transport packet.
pub const H264_PAYLOAD_TYPE: u8 = 96;

/// Server-wide fixed configuration (§6 "CLI surface: none beyond
/// process start/stop"). Three environment variables override the
/// defaults for local testing; omitting all three reproduces the
/// spec's fixed behavior exactly.
#[derive(Debug, Clone)]
pub struct Config {
    pub media_file: String,
    pub listen_port: u16,
    pub frame_rate: u32,
}

impl Config {
    /// Builds configuration from the environment, falling back to the
    /// spec's fixed defaults for any variable that is unset or
    /// unparseable.
    pub fn from_env() -> Config {
        Config {
            media_file: std::env::var("RTSP_MEDIA_FILE")
                .unwrap_or_else(|_| DEFAULT_MEDIA_FILE.to_string()),
            listen_port: std::env::var("RTSP_LISTEN_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LISTEN_PORT),
            frame_rate: std::env::var("RTSP_FRAME_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FRAME_RATE),
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            media_file: DEFAULT_MEDIA_FILE.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

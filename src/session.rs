// ABOUTME: Drives one client from accept to teardown: framing, dispatch, pacing, and packetizing
// ABOUTME: Grounded on `original_source/videoRTSPServer/RTSPsession.cpp` and the teacher's `Connection` read loop

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bytes::BytesMut;
use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{Config, H264_PAYLOAD_TYPE, MAX_RTP_PAYLOAD_SIZE, RTCP_LOCAL_PORT, RTP_LOCAL_PORT};
use crate::datatypes::{Method, StatusCode};
use crate::error::Result;
use crate::media::MediaFile;
use crate::protocol::{Reply, Request};
use crate::rtp;

/// Synchronization source: stable for the lifetime of a session (§3).
/// The original hard-codes a single constant per process; this
/// implementation draws one per session so multiple sessions (even
/// though only one can stream concurrently, per §5) never share it.
fn random_ssrc() -> u32 {
    rand::thread_rng().r#gen()
}

/// 8-hex-digit uppercase session id, matching `Utils::GenerateUUID`'s
/// random-u32-as-hex construction (not a real UUID).
fn generate_session_id() -> String {
    let value: u32 = rand::thread_rng().r#gen();
    format!("{value:08X}")
}

/// Per-connection state. Owns its control stream, both datagram sockets,
/// the open media file, and the pacing cancellation token exclusively —
/// no `Arc<Mutex<_>>` anywhere (§5: "no mutual exclusion on session
/// state").
pub struct Session {
    id: String,
    stream: BufWriter<TcpStream>,
    peer_ip: IpAddr,
    buffer: BytesMut,

    rtp_socket: Option<UdpSocket>,
    rtp_peer: Option<SocketAddr>,
    rtcp_socket: Option<UdpSocket>,
    rtcp_peer: Option<SocketAddr>,

    media: Option<MediaFile>,
    media_path: String,
    frame_rate: u32,

    next_seq: u16,
    timestamp: u32,
    ssrc: u32,

    cancel: CancellationToken,
}

impl Session {
    pub fn new(socket: TcpStream, peer_ip: IpAddr, config: &Config) -> Session {
        Session {
            id: generate_session_id(),
            stream: BufWriter::new(socket),
            peer_ip,
            buffer: BytesMut::with_capacity(4 * 1024),
            rtp_socket: None,
            rtp_peer: None,
            rtcp_socket: None,
            rtcp_peer: None,
            media: None,
            media_path: config.media_file.clone(),
            frame_rate: config.frame_rate,
            next_seq: 0,
            timestamp: 0,
            ssrc: random_ssrc(),
            cancel: CancellationToken::new(),
        }
    }

    /// Drives the session to completion: reads framed requests, dispatches
    /// them, and interleaves pacing ticks once PLAY has started streaming.
    /// Returns once the control connection closes; never propagates an
    /// error to the caller (§7: "no error propagates across sessions").
    pub async fn run(mut self) {
        let interval = Duration::from_millis(1000 / self.frame_rate as u64);
        let mut pacing = false;

        loop {
            if pacing {
                tokio::select! {
                    biased;
                    _ = sleep(interval) => {
                        if self.cancel.is_cancelled() {
                            pacing = false;
                            continue;
                        }
                        if !self.packetizer_tick().await {
                            pacing = false;
                        }
                    }
                    read = self.read_some() => {
                        match read {
                            Ok(true) => {
                                if self.dispatch_ready_requests().await.is_err() {
                                    return;
                                }
                                pacing = self.is_streaming();
                            }
                            Ok(false) => {
                                debug!(session = %self.id, "control connection closed");
                                return;
                            }
                            Err(err) => {
                                warn!(session = %self.id, error = %err, "control read failed");
                                return;
                            }
                        }
                    }
                }
            } else {
                match self.read_some().await {
                    Ok(true) => {
                        if self.dispatch_ready_requests().await.is_err() {
                            return;
                        }
                        pacing = self.is_streaming();
                    }
                    Ok(false) => {
                        debug!(session = %self.id, "control connection closed");
                        return;
                    }
                    Err(err) => {
                        warn!(session = %self.id, error = %err, "control read failed");
                        return;
                    }
                }
            }
        }
    }

    fn is_streaming(&self) -> bool {
        self.media.is_some() && !self.cancel.is_cancelled()
    }

    /// Reads more bytes into `self.buffer`. Returns `Ok(false)` on a clean
    /// end-of-stream.
    async fn read_some(&mut self) -> Result<bool> {
        let n = self.stream.read_buf(&mut self.buffer).await?;
        Ok(n != 0)
    }

    /// Extracts and dispatches every complete `\r\n\r\n`-delimited message
    /// currently buffered, in receive order (§4.D "Request framing").
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    async fn dispatch_ready_requests(&mut self) -> Result<()> {
        while let Some(end) = find_double_crlf(&self.buffer) {
            let msg_len = end + 4;
            let message = self.buffer.split_to(msg_len);
            let message = String::from_utf8_lossy(&message).into_owned();

            match Request::parse(&message) {
                Ok(request) => {
                    let reply = self.handle(request).await;
                    self.write_reply(&reply).await?;
                }
                Err(err) => {
                    warn!(session = %self.id, error = %err, "request parse failed");
                    // A parse failure has no method/seq to echo reliably;
                    // the original likewise drops these fields on the
                    // floor for a bad request (§7). It stops processing
                    // of this batch only; the session itself stays open
                    // for the next read, per §7's "stop batch processing".
                    let reply = Reply::new(StatusCode::BadRequest, Method::Unknown, 0);
                    self.write_reply(&reply).await?;
                    break;
                }
            }
        }
        Ok(())
    }

    async fn write_reply(&mut self, reply: &Reply) -> Result<()> {
        self.stream.write_all(reply.to_string().as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn handle(&mut self, request: Request) -> Reply {
        match request.method {
            Method::Options => self.handle_options(&request),
            Method::Describe => self.handle_describe(&request),
            Method::Setup => self.handle_setup(&request).await,
            Method::Play => self.handle_play(&request).await,
            Method::Teardown => self.handle_teardown(&request).await,
            _ => Reply::new(StatusCode::MethodNotAllowed, request.method, request.seq),
        }
    }

    fn handle_options(&self, request: &Request) -> Reply {
        let mut reply = Reply::new(StatusCode::Ok, Method::Options, request.seq);
        reply.public_methods = Some(Method::SUPPORTED);
        reply
    }

    fn handle_describe(&self, request: &Request) -> Reply {
        let mut reply = Reply::new(StatusCode::Ok, Method::Describe, request.seq);
        reply.body = Some(Reply::generate_sdp(&self.id));
        reply
    }

    async fn handle_setup(&mut self, request: &Request) -> Reply {
        let mut reply = Reply::new(StatusCode::Ok, Method::Setup, request.seq);
        reply.session_id = Some(self.id.clone());

        let (rtp_port, rtcp_port) = request.client_ports.unwrap_or((0, 0));
        reply.transport = Some(format!(
            "RTP/AVP;unicast;client_port={rtp_port}-{rtcp_port};server_port={RTP_LOCAL_PORT}-{RTCP_LOCAL_PORT}"
        ));

        if self.rtp_socket.is_none() {
            match UdpSocket::bind(("0.0.0.0", RTP_LOCAL_PORT)).await {
                Ok(socket) => {
                    self.rtp_peer = Some(SocketAddr::new(self.peer_ip, rtp_port));
                    self.rtp_socket = Some(socket);
                }
                Err(err) => warn!(session = %self.id, error = %err, "failed to bind RTP socket"),
            }
        }
        if self.rtcp_socket.is_none() {
            match UdpSocket::bind(("0.0.0.0", RTCP_LOCAL_PORT)).await {
                Ok(socket) => {
                    self.rtcp_peer = Some(SocketAddr::new(self.peer_ip, rtcp_port));
                    self.rtcp_socket = Some(socket);
                }
                Err(err) => warn!(session = %self.id, error = %err, "failed to bind RTCP socket"),
            }
        }

        reply
    }

    async fn handle_play(&mut self, request: &Request) -> Reply {
        let mut reply = Reply::new(StatusCode::Ok, Method::Play, request.seq);
        reply.session_id = Some(self.id.clone());
        reply.range = Some("npt=0.000-9.000".to_string());

        if self.media.is_none() {
            match MediaFile::open(&self.media_path) {
                Ok(media) => {
                    self.cancel = CancellationToken::new();
                    self.media = Some(media);
                    info!(session = %self.id, path = %self.media_path, "streaming started");
                }
                Err(err) => {
                    warn!(session = %self.id, error = %err, "failed to open media file");
                }
            }
        }

        reply
    }

    async fn handle_teardown(&mut self, request: &Request) -> Reply {
        let mut reply = Reply::new(StatusCode::Ok, Method::Teardown, request.seq);
        reply.session_id = Some(self.id.clone());
        self.stop_streaming();
        reply
    }

    fn stop_streaming(&mut self) {
        self.cancel.cancel();
        self.media = None;
        self.rtp_socket = None;
        self.rtcp_socket = None;
    }

    /// One pacing tick (§4.D "Packetizer"). Returns `false` once the file
    /// is exhausted or an open-failure has already stopped the pacer, so
    /// the caller stops rescheduling (the session itself stays alive).
    async fn packetizer_tick(&mut self) -> bool {
        let Some(mut media) = self.media.take() else {
            return false;
        };

        let access_unit = match tokio::task::spawn_blocking(move || {
            let result = media.read_next_access_unit();
            (media, result)
        })
        .await
        {
            Ok((media, Ok(unit))) => {
                self.media = Some(media);
                unit
            }
            Ok((_media, Err(err))) => {
                warn!(session = %self.id, error = %err, "media read failed");
                return false;
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "media read task panicked");
                return false;
            }
        };

        if !access_unit.valid || access_unit.data.is_empty() {
            self.media = None;
            return false;
        }

        self.timestamp = self.timestamp.wrapping_add(90_000 / self.frame_rate);
        self.send_access_unit(&access_unit.data).await;
        true
    }

    async fn send_access_unit(&mut self, data: &[u8]) {
        if data.len() <= MAX_RTP_PAYLOAD_SIZE {
            let packet = rtp::build_packet(
                H264_PAYLOAD_TYPE,
                true,
                self.next_seq,
                self.timestamp,
                self.ssrc,
                data,
            );
            self.next_seq = self.next_seq.wrapping_add(1);
            self.send_datagram(&packet).await;
            return;
        }

        let nal_header = data[0];
        let nri = nal_header & 0x60;
        let nal_type = nal_header & 0x1F;
        let fu_indicator = nri | 28;

        let payload = &data[1..];
        let chunks: Vec<&[u8]> = payload.chunks(MAX_RTP_PAYLOAD_SIZE).collect();
        let last_index = chunks.len().saturating_sub(1);

        for (index, chunk) in chunks.into_iter().enumerate() {
            let mut fu_header = nal_type;
            if index == 0 {
                fu_header |= 0x80; // S bit
            }
            if index == last_index {
                fu_header |= 0x40; // E bit
            }

            let mut fragment = Vec::with_capacity(2 + chunk.len());
            fragment.push(fu_indicator);
            fragment.push(fu_header);
            fragment.extend_from_slice(chunk);

            let marker = index == last_index;
            let packet = rtp::build_packet(
                H264_PAYLOAD_TYPE,
                marker,
                self.next_seq,
                self.timestamp,
                self.ssrc,
                &fragment,
            );
            self.next_seq = self.next_seq.wrapping_add(1);
            // Fragments of one access unit are sent back to back within
            // this tick; only the unavoidable `.await` on each `send_to`
            // suspends (§5: "fragmented transport sends do not suspend").
            self.send_datagram(&packet).await;
        }
    }

    async fn send_datagram(&self, packet: &[u8]) {
        let (Some(socket), Some(peer)) = (&self.rtp_socket, self.rtp_peer) else {
            return;
        };
        // Swallowed per §7: "I/O failure on datagram send: swallowed".
        let _ = socket.send_to(packet, peer).await;
    }
}

/// Finds the index of the first `\r\n\r\n` delimiter's opening byte.
fn find_double_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

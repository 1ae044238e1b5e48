// ABOUTME: Listens on the fixed control port, accepts connections, and spawns one session per client
// ABOUTME: Grounded on `original_source/videoRTSPServer/RTSPserver.cpp`'s recursive `async_accept`

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

use crate::config::Config;
use crate::session::Session;

/// Binds the control listener and accepts connections forever. A single
/// accept failure is logged and does not terminate the loop (§4.E, §7).
pub async fn run(config: Config) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.listen_port)).await?;
    info!(port = config.listen_port, "listening for RTSP clients");

    loop {
        match listener.accept().await {
            Ok((socket, peer)) => handle_connection(socket, peer, &config),
            Err(err) => {
                error!(error = %err, "accept failed");
            }
        }
    }
}

/// Hands one accepted connection to a fresh session, spawned as its own
/// task (§4.E: a single error does not terminate the acceptor).
#[tracing::instrument(skip(socket, config), fields(%peer))]
fn handle_connection(socket: TcpStream, peer: SocketAddr, config: &Config) {
    info!("accepted connection");
    let session = Session::new(socket, peer.ip(), config);
    tokio::spawn(session.run());
}

// ABOUTME: Crate-wide error type for the control-plane I/O paths
// ABOUTME: Mirrors the teacher's `SmppError` split of I/O vs. protocol-level failure causes

use thiserror::Error;

use crate::protocol::ParseError;

/// Errors surfaced while driving a session's control connection.
///
/// Per §7, none of these ever propagate out of the session task that
/// produced them — a session's failure is logged and the session closes;
/// it never takes down the acceptor or another session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("control I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    Parse(#[from] ParseError),

    #[error("control connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;

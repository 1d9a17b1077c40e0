//! Client error types.

use thiserror::Error;

/// Client errors.
///
/// The transport faults (`Timeout`, `Cancelled`, `ChannelClosed`) are
/// surfaced verbatim and never retried; everything else is terminal for
/// the invocation as well.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] rssnex_protocol::ProtocolError),

    #[error("timeout")]
    Timeout,

    #[error("canceled")]
    Cancelled,

    #[error("channel closed")]
    ChannelClosed,

    #[error("unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),
}

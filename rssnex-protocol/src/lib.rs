//! # rssnex-protocol
//!
//! Wire protocol implementation for the RSSN bridge link.
//!
//! This crate provides:
//! - ASCII-framed request encoding with hex length fields
//! - Response header validation and decoding
//! - Operation path rendering for the bridge endpoints
//! - Remote timestamp parsing for clock sync

pub mod error;
pub mod frame;
pub mod operation;
pub mod timestamp;

pub use error::ProtocolError;
pub use frame::{encode_request, ResponseHeader, REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE};
pub use operation::{ChannelFormat, Operation};
pub use timestamp::{RemoteTimestamp, TIMESTAMP_PREFIX_LEN};

/// Transmit buffer capacity; a request frame must fit in full.
pub const MAX_REQUEST_SIZE: usize = 512;

/// Shared response buffer capacity (128 KiB).
pub const RESPONSE_BUFFER_SIZE: usize = 128 * 1024;

/// Largest channel body the download path accepts: the response buffer
/// minus the header reserve.
pub const MAX_CHANNEL_BODY: usize = RESPONSE_BUFFER_SIZE - RESPONSE_HEADER_SIZE;

/// Largest body accepted for a date-time query.
pub const MAX_DATETIME_BODY: usize = 127;

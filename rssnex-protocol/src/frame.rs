//! ASCII frame format for the bridge link.
//!
//! Request (header + path, single frame):
//!
//! ```text
//! +---------+--------------+-------------------+
//! | ">|"    | body length  | path and query    |
//! | 2 bytes | 8 hex digits | body-length bytes |
//! +---------+--------------+-------------------+
//! ```
//!
//! Response header (exactly `body length` body bytes follow):
//!
//! ```text
//! +---------+---------+--------------+
//! | "<|"    | status  | body length  |
//! | 2 bytes | 4 chars | 8 hex digits |
//! +---------+---------+--------------+
//! ```

use crate::error::ProtocolError;
use crate::operation::Operation;
use crate::MAX_REQUEST_SIZE;
use bytes::{BufMut, BytesMut};

/// Marker opening every request frame.
pub const REQUEST_MARKER: [u8; 2] = *b">|";

/// Marker opening every response header.
pub const RESPONSE_MARKER: [u8; 2] = *b"<|";

/// Size of the request header (marker + 8 hex digits).
pub const REQUEST_HEADER_SIZE: usize = 10;

/// Size of the fixed response header (marker + status + 8 hex digits).
pub const RESPONSE_HEADER_SIZE: usize = 14;

/// The only status the bridge reports for a successful exchange.
pub const STATUS_OK: &[u8; 4] = b"0200";

/// Encodes a request frame for the given operation.
///
/// The hex length field covers everything after the 10-byte header, so it
/// always equals `frame.len() - 10`. Written lowercase; the bridge accepts
/// either case.
pub fn encode_request(op: &Operation) -> Result<BytesMut, ProtocolError> {
    let path = op.path();
    let total = REQUEST_HEADER_SIZE + path.len();
    if total > MAX_REQUEST_SIZE {
        return Err(ProtocolError::RequestTooLarge {
            size: total,
            max: MAX_REQUEST_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(total);
    buf.put_slice(&REQUEST_MARKER);
    buf.put_slice(format!("{:08x}", path.len()).as_bytes());
    buf.put_slice(path.as_bytes());
    Ok(buf)
}

/// A parsed response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Exact byte count of the body that follows.
    pub body_len: u32,
}

impl ResponseHeader {
    /// Parses the fixed 14-byte response header.
    ///
    /// Any status other than `"0200"` is a protocol failure carrying the
    /// raw status text.
    pub fn parse(bytes: &[u8; RESPONSE_HEADER_SIZE]) -> Result<Self, ProtocolError> {
        if bytes[0..2] != RESPONSE_MARKER {
            return Err(ProtocolError::InvalidMarker([bytes[0], bytes[1]]));
        }

        let status = &bytes[2..6];
        if status != STATUS_OK {
            return Err(ProtocolError::ErrorStatus {
                status: String::from_utf8_lossy(status).into_owned(),
            });
        }

        let digits: [u8; 8] = bytes[6..14].try_into().unwrap();
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return Err(ProtocolError::MalformedLength(digits));
        }
        // all-hex-digit input is valid UTF-8 and fits in u32
        let hex = std::str::from_utf8(&digits).unwrap();
        let body_len = u32::from_str_radix(hex, 16).unwrap();

        Ok(Self { body_len })
    }

    /// Checks the declared body length against the destination capacity.
    ///
    /// Rejecting here happens before any body byte is read, which leaves
    /// the channel undrained; each invocation performs a single exchange,
    /// so the desynchronization stays latent.
    pub fn ensure_fits(&self, max: usize) -> Result<usize, ProtocolError> {
        let len = self.body_len as usize;
        if len > max {
            return Err(ProtocolError::OversizedResponse { size: len, max });
        }
        Ok(len)
    }
}

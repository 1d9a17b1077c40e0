//! Remote timestamp handling for clock sync.

use crate::error::ProtocolError;
use chrono::NaiveDateTime;
use std::fmt;

/// Significant prefix of a bridge timestamp: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_PREFIX_LEN: usize = 19;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A timestamp reported by the bridge's time source.
///
/// Only the 19-character second-resolution prefix is significant; the
/// bridge may append fractional seconds, which are ignored. The raw prefix
/// is retained for the bytewise steady-state comparison in clock sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTimestamp {
    raw: String,
    naive: NaiveDateTime,
}

impl RemoteTimestamp {
    /// Parses a date-time response body.
    pub fn parse(body: &[u8]) -> Result<Self, ProtocolError> {
        let malformed = || ProtocolError::MalformedTimestamp(String::from_utf8_lossy(body).into_owned());

        if body.len() < TIMESTAMP_PREFIX_LEN {
            return Err(malformed());
        }
        let raw = std::str::from_utf8(&body[..TIMESTAMP_PREFIX_LEN]).map_err(|_| malformed())?;
        let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| malformed())?;

        Ok(Self {
            raw: raw.to_owned(),
            naive,
        })
    }

    /// The second-resolution prefix, for bytewise comparison.
    pub fn second_prefix(&self) -> &str {
        &self.raw
    }

    /// The parsed wall-clock fields.
    pub fn naive(&self) -> NaiveDateTime {
        self.naive
    }
}

impl fmt::Display for RemoteTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

//! Protocol error types.

use thiserror::Error;

/// Protocol-level failures in framing, header validation, or payload
/// interpretation. All of them are terminal for the current exchange.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("request too large: {size} bytes (max {max})")]
    RequestTooLarge { size: usize, max: usize },

    #[error("invalid response marker: {0:?}")]
    InvalidMarker([u8; 2]),

    #[error("bridge returned status {status}")]
    ErrorStatus { status: String },

    #[error("malformed length field: {0:?}")]
    MalformedLength([u8; 8]),

    #[error("oversized response: {size} bytes (max {max})")]
    OversizedResponse { size: usize, max: usize },

    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::RequestTooLarge { size: 600, max: 512 };
        assert!(err.to_string().contains("600"));

        let err = ProtocolError::ErrorStatus {
            status: "0404".to_string(),
        };
        assert!(err.to_string().contains("0404"));

        let err = ProtocolError::OversizedResponse {
            size: 200_000,
            max: 131_058,
        };
        assert!(err.to_string().contains("200000"));

        let err = ProtocolError::InvalidMarker(*b"ab");
        assert!(err.to_string().contains("marker"));
    }
}

//! One request/response exchange over the bridge link.

use crate::error::ClientError;
use bytes::{Bytes, BytesMut};
use rssnex_protocol::frame::{self, ResponseHeader};
use rssnex_protocol::{Operation, RemoteTimestamp, MAX_DATETIME_BODY, RESPONSE_HEADER_SIZE};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

/// Default per-call transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates a cancellation flag pair for a session.
///
/// Setting the sender to `true` makes any blocked transport call return
/// `ClientError::Cancelled`.
pub fn cancel_flag() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// A protocol session: at most one exchange in flight over an owned stream.
///
/// Buffers are request-scoped; nothing survives past the exchange that
/// created it.
pub struct Session<S> {
    stream: S,
    timeout: Duration,
    cancel: watch::Receiver<bool>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    /// Creates a session with the default timeout and no cancellation flag.
    pub fn new(stream: S) -> Self {
        let (_tx, cancel) = watch::channel(false);
        Self {
            stream,
            timeout: DEFAULT_TIMEOUT,
            cancel,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Encodes and writes a request frame.
    pub async fn send_request(&mut self, op: &Operation) -> Result<(), ClientError> {
        let frame = frame::encode_request(op)?;
        tracing::debug!("Sending request {} ({} bytes)", op, frame.len());
        self.write_all(&frame).await
    }

    /// Reads and validates the 14-byte response header, bounds-checking
    /// the declared body length against `max_body` before any body read.
    pub async fn read_header(&mut self, max_body: usize) -> Result<usize, ClientError> {
        let mut buf = [0u8; RESPONSE_HEADER_SIZE];
        self.read_exact(&mut buf).await?;
        let header = ResponseHeader::parse(&buf)?;
        let len = header.ensure_fits(max_body)?;
        tracing::debug!("Response header ok, body {} bytes", len);
        Ok(len)
    }

    /// Reads the declared-length body in full.
    pub async fn read_body(&mut self, len: usize) -> Result<Bytes, ClientError> {
        let mut body = BytesMut::zeroed(len);
        self.read_exact(&mut body).await?;
        Ok(body.freeze())
    }

    /// Queries the bridge's date/time shifted by `tz` hours.
    pub async fn query_datetime(&mut self, tz: i16) -> Result<RemoteTimestamp, ClientError> {
        let op = Operation::DateTime { tz };
        self.send_request(&op).await?;
        let len = self.read_header(MAX_DATETIME_BODY).await?;
        let body = self.read_body(len).await?;
        Ok(RemoteTimestamp::parse(&body)?)
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<(), ClientError> {
        let mut cancel = self.cancel.clone();
        tokio::select! {
            biased;
            res = tokio::time::timeout(self.timeout, async {
                self.stream.write_all(buf).await?;
                self.stream.flush().await
            }) => match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(map_io(e)),
                Err(_) => Err(ClientError::Timeout),
            },
            Ok(_) = cancel.wait_for(|c| *c) => Err(ClientError::Cancelled),
        }
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ClientError> {
        let mut cancel = self.cancel.clone();
        tokio::select! {
            biased;
            res = tokio::time::timeout(self.timeout, self.stream.read_exact(buf)) => match res {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(map_io(e)),
                Err(_) => Err(ClientError::Timeout),
            },
            Ok(_) = cancel.wait_for(|c| *c) => Err(ClientError::Cancelled),
        }
    }
}

fn map_io(e: io::Error) -> ClientError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        ClientError::ChannelClosed
    } else {
        ClientError::Io(e)
    }
}

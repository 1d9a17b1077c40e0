//! Bridge stream abstraction for serial device nodes and TCP bridges.

use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

pin_project! {
    /// A bridge attachment that can be a local serial device node or a
    /// serial-over-TCP bridge.
    #[project = BridgeStreamProj]
    pub enum BridgeStream {
        Serial { #[pin] file: File },
        Tcp { #[pin] stream: TcpStream },
    }
}

impl BridgeStream {
    /// Returns whether this stream talks to a local device node.
    pub fn is_serial(&self) -> bool {
        matches!(self, BridgeStream::Serial { .. })
    }
}

impl AsyncRead for BridgeStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.project() {
            BridgeStreamProj::Serial { file } => file.poll_read(cx, buf),
            BridgeStreamProj::Tcp { stream } => stream.poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for BridgeStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.project() {
            BridgeStreamProj::Serial { file } => file.poll_write(cx, buf),
            BridgeStreamProj::Tcp { stream } => stream.poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.project() {
            BridgeStreamProj::Serial { file } => file.poll_flush(cx),
            BridgeStreamProj::Tcp { stream } => stream.poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.project() {
            BridgeStreamProj::Serial { file } => file.poll_shutdown(cx),
            BridgeStreamProj::Tcp { stream } => stream.poll_shutdown(cx),
        }
    }
}

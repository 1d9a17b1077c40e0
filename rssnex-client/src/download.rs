//! Feed download orchestration: one fetch-and-stream exchange.

use crate::error::ClientError;
use crate::session::Session;
use rssnex_protocol::{ChannelFormat, Operation, MAX_CHANNEL_BODY};
use std::io;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Fetches channel content for `link` and streams the response body to
/// `sink`.
///
/// Returns the number of body bytes written. The sink receives exactly the
/// response body, and nothing at all if the exchange fails before the body
/// is complete; discarding a partially written sink on failure is the
/// caller's responsibility.
pub async fn download_channel<S, W>(
    session: &mut Session<S>,
    format: ChannelFormat,
    link: &str,
    sink: &mut W,
) -> Result<u64, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let op = Operation::FetchChannel {
        link: link.to_owned(),
        format,
    };
    session.send_request(&op).await?;

    let len = session.read_header(MAX_CHANNEL_BODY).await?;
    let body = session.read_body(len).await?;

    // Bounded write loop: a sink that stops making progress is an I/O
    // fault, never a silent truncation.
    let mut written = 0;
    while written < body.len() {
        let n = sink.write(&body[written..]).await?;
        if n == 0 {
            return Err(ClientError::Io(io::Error::new(
                io::ErrorKind::WriteZero,
                "output sink made no progress",
            )));
        }
        written += n;
    }
    sink.flush().await?;

    tracing::debug!("Wrote {} body bytes to sink", written);
    Ok(written as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::cancel_flag;
    use rssnex_protocol::ProtocolError;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio_test::io::Builder;

    const REQUEST: &[u8] = b">|00000021/openbbs?link=http://example/feed";

    fn response(status: &str, body: &[u8]) -> Vec<u8> {
        let mut bytes = format!("<|{status}{:08x}", body.len()).into_bytes();
        bytes.extend_from_slice(body);
        bytes
    }

    #[tokio::test]
    async fn test_streams_full_body_to_sink() {
        let mock = Builder::new()
            .write(REQUEST)
            .read(&response("0200", b"hello"))
            .build();
        let mut session = Session::new(mock);
        let mut sink = Vec::new();

        let written = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(written, 5);
        assert_eq!(sink, b"hello");
    }

    #[tokio::test]
    async fn test_dshell_format_selects_alternate_path() {
        let mock = Builder::new()
            .write(b">|00000020/dshell?link=http://example/feed")
            .read(&response("0200", b"ok"))
            .build();
        let mut session = Session::new(mock);
        let mut sink = Vec::new();

        download_channel(
            &mut session,
            ChannelFormat::Dshell,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(sink, b"ok");
    }

    #[tokio::test]
    async fn test_arbitrary_chunking_preserves_body() {
        let body: Vec<u8> = (0..u8::MAX).cycle().take(4096).collect();
        let full = response("0200", &body);
        let mock = Builder::new()
            .write(REQUEST)
            .read(&full[..20])
            .read(&full[20..1000])
            .read(&full[1000..1001])
            .read(&full[1001..])
            .build();
        let mut session = Session::new(mock);
        let mut sink = Vec::new();

        let written = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(written, 4096);
        assert_eq!(sink, body);
    }

    #[tokio::test]
    async fn test_error_status_aborts_without_sink_write() {
        let mock = Builder::new()
            .write(REQUEST)
            .read(b"<|040400000000")
            .build();
        let mut session = Session::new(mock);
        let mut sink = Vec::new();

        let err = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap_err();

        match err {
            ClientError::Protocol(ProtocolError::ErrorStatus { status }) => {
                assert_eq!(status, "0404")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_before_read() {
        // 0x20000 = 131072 > 128 KiB - 14; the script carries no body
        let mock = Builder::new()
            .write(REQUEST)
            .read(b"<|020000020000")
            .build();
        let mut session = Session::new(mock);
        let mut sink = Vec::new();

        let err = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::OversizedResponse { .. })
        ));
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_on_body_read_leaves_sink_untouched() {
        // header arrives, the body never does; the user cancels mid-read
        let (client, mut server) = tokio::io::duplex(1024);
        tokio::io::AsyncWriteExt::write_all(&mut server, b"<|020000000005")
            .await
            .unwrap();

        let (cancel_tx, cancel_rx) = cancel_flag();
        let mut session = Session::new(client).with_cancel(cancel_rx);
        let mut sink = Vec::new();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = cancel_tx.send(true);
        });

        let err = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Cancelled));
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_read_timeout() {
        let (client, mut server) = tokio::io::duplex(1024);
        tokio::io::AsyncWriteExt::write_all(&mut server, b"<|020000000005")
            .await
            .unwrap();

        let mut session = Session::new(client).with_timeout(Duration::from_secs(60));
        let mut sink = Vec::new();

        let err = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Timeout));
        assert!(sink.is_empty());
    }

    struct StalledSink;

    impl AsyncWrite for StalledSink {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Ok(0))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_zero_progress_sink_write_is_io_fault() {
        let mock = Builder::new()
            .write(REQUEST)
            .read(&response("0200", b"hello"))
            .build();
        let mut session = Session::new(mock);
        let mut sink = StalledSink;

        let err = download_channel(
            &mut session,
            ChannelFormat::Tabular,
            "http://example/feed",
            &mut sink,
        )
        .await
        .unwrap_err();

        match err {
            ClientError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! Clock sync orchestration: align the local clock to the bridge's time
//! source on a second boundary.

use crate::error::ClientError;
use crate::session::Session;
use rssnex_protocol::RemoteTimestamp;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

/// Poll interval while waiting for the remote second to advance.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Narrow host interface for applying a wall-clock timestamp.
pub trait ClockSetter {
    /// Applies the parsed date and time to the host clock.
    fn set(&mut self, ts: &RemoteTimestamp) -> io::Result<()>;
}

/// Aligns the local clock to the bridge's time source.
///
/// Polls the date-time query until the remote whole-second value advances,
/// then applies the fresh value immediately, bounding phase error to
/// roughly one poll interval. The same-timestamp path is the expected
/// steady state, not an error; any query failure aborts immediately. The
/// loop itself carries no timeout, only each query does: a wall-clock
/// second is guaranteed to eventually tick.
pub async fn sync_clock<S, C>(
    session: &mut Session<S>,
    tz: i16,
    clock: &mut C,
) -> Result<RemoteTimestamp, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: ClockSetter,
{
    let baseline = session.query_datetime(tz).await?;
    tracing::debug!("Baseline timestamp {}", baseline);

    loop {
        let current = session.query_datetime(tz).await?;
        if current.second_prefix() == baseline.second_prefix() {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }

        clock.set(&current)?;
        tracing::debug!("Applied timestamp {}", current);
        return Ok(current);
    }
}

//! Progress indicator shown during the blocking download exchange.
//!
//! A spawned ticker task animates a marker; it owns no protocol state and
//! talks to nothing but the console. The guard's `Drop` stops it and
//! restores the cursor on every exit path, success or fault.

use std::io::{self, Write};
use std::time::Duration;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_millis(100);
const WIDTH: usize = 16;

/// Scoped progress display: hides the cursor and animates while alive.
pub struct Progress {
    ticker: JoinHandle<()>,
}

impl Progress {
    pub fn start() -> Self {
        eprint!("\x1b[?25lNow Loading... [Ctrl-C] to cancel ");
        io::stderr().flush().ok();

        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            loop {
                // fill the lane with markers, then sweep them away
                for ch in ['>', '_'] {
                    for _ in 0..WIDTH {
                        interval.tick().await;
                        eprint!("{ch}");
                        io::stderr().flush().ok();
                    }
                    eprint!("\x1b[{WIDTH}D");
                }
            }
        });

        Self { ticker }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.ticker.abort();
        eprint!("\r\x1b[2K\x1b[?25h");
        io::stderr().flush().ok();
    }
}

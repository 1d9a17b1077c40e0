//! Host clock setter.

use nix::sys::time::TimeSpec;
use nix::time::{clock_settime, ClockId};
use rssnex_client::ClockSetter;
use rssnex_protocol::RemoteTimestamp;
use std::io;

/// Applies bridge timestamps to the system clock.
///
/// The bridge reports wall-clock time already shifted by the requested
/// timezone offset; `CLOCK_REALTIME` wants UTC, so the offset is
/// subtracted back out.
pub struct SystemClock {
    tz_offset_hours: i16,
}

impl SystemClock {
    pub fn new(tz_offset_hours: i16) -> Self {
        Self { tz_offset_hours }
    }
}

impl ClockSetter for SystemClock {
    fn set(&mut self, ts: &RemoteTimestamp) -> io::Result<()> {
        let epoch = ts.naive().and_utc().timestamp() - i64::from(self.tz_offset_hours) * 3600;
        clock_settime(ClockId::CLOCK_REALTIME, TimeSpec::new(epoch, 0)).map_err(io::Error::from)
    }
}

//! # rssnex-client
//!
//! Client library for the RSSN bridge.
//!
//! This crate provides:
//! - A stream abstraction over serial device nodes and serial-over-TCP
//!   bridges
//! - A protocol session with per-call timeouts and cooperative cancellation
//! - The feed-download and clock-sync orchestrators

pub mod download;
pub mod error;
pub mod session;
pub mod stream;
pub mod sync;
pub mod transport;

pub use download::download_channel;
pub use error::ClientError;
pub use session::{cancel_flag, Session, DEFAULT_TIMEOUT};
pub use stream::BridgeStream;
pub use sync::{sync_clock, ClockSetter, POLL_INTERVAL};
pub use transport::{BaudRate, Endpoint};

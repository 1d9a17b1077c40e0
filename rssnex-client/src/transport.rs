//! Opening and configuring the bridge attachment.

use crate::error::ClientError;
use crate::stream::BridgeStream;
use nix::sys::termios::{self, BaudRate as TermiosBaud, ControlFlags, SetArg};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::net::TcpStream;

/// Baud rates the bridge link supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaudRate {
    B9600,
    B19200,
    #[default]
    B38400,
}

impl BaudRate {
    fn to_termios(self) -> TermiosBaud {
        match self {
            BaudRate::B9600 => TermiosBaud::B9600,
            BaudRate::B19200 => TermiosBaud::B19200,
            BaudRate::B38400 => TermiosBaud::B38400,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = ClientError;

    fn try_from(value: u32) -> Result<Self, ClientError> {
        match value {
            9600 => Ok(BaudRate::B9600),
            19200 => Ok(BaudRate::B19200),
            38400 => Ok(BaudRate::B38400),
            other => Err(ClientError::UnsupportedBaudRate(other)),
        }
    }
}

/// Where the bridge is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A local serial device node, e.g. `/dev/ttyUSB0`.
    Serial(PathBuf),
    /// A serial-over-TCP bridge, e.g. `tcp://bridgepi:8023`.
    Tcp(String),
}

impl FromStr for Endpoint {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.strip_prefix("tcp://") {
            Some(addr) => Endpoint::Tcp(addr.to_owned()),
            None => Endpoint::Serial(PathBuf::from(s)),
        })
    }
}

impl BridgeStream {
    /// Opens the bridge attachment.
    ///
    /// A serial device node is switched to raw 8N1 mode at the requested
    /// baud rate; a TCP endpoint is dialed as-is (the remote end owns the
    /// line discipline).
    pub async fn open(endpoint: &Endpoint, baud: BaudRate) -> Result<BridgeStream, ClientError> {
        match endpoint {
            Endpoint::Serial(path) => {
                tracing::debug!("Opening serial device {}", path.display());
                let file = std::fs::OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(path)?;
                configure_raw(&file, baud)?;
                Ok(BridgeStream::Serial {
                    file: tokio::fs::File::from_std(file),
                })
            }
            Endpoint::Tcp(addr) => {
                tracing::debug!("Dialing bridge at {}", addr);
                let stream = TcpStream::connect(addr).await?;
                stream.set_nodelay(true).ok();
                Ok(BridgeStream::Tcp { stream })
            }
        }
    }
}

/// Puts the device into raw mode at the given speed. Blocking reads wake
/// on the first byte (`cfmakeraw` leaves VMIN=1, VTIME=0).
fn configure_raw(file: &std::fs::File, baud: BaudRate) -> Result<(), ClientError> {
    let mut tio = termios::tcgetattr(file).map_err(errno_io)?;
    termios::cfmakeraw(&mut tio);
    tio.control_flags |= ControlFlags::CLOCAL | ControlFlags::CREAD;
    termios::cfsetspeed(&mut tio, baud.to_termios()).map_err(errno_io)?;
    termios::tcsetattr(file, SetArg::TCSANOW, &tio).map_err(errno_io)?;
    Ok(())
}

fn errno_io(errno: nix::errno::Errno) -> ClientError {
    ClientError::Io(std::io::Error::from(errno))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parse() {
        assert_eq!(
            "tcp://bridgepi:8023".parse::<Endpoint>().unwrap(),
            Endpoint::Tcp("bridgepi:8023".to_string())
        );
        assert_eq!(
            "/dev/ttyUSB0".parse::<Endpoint>().unwrap(),
            Endpoint::Serial(PathBuf::from("/dev/ttyUSB0"))
        );
    }

    #[test]
    fn test_baud_rate_selection() {
        assert_eq!(BaudRate::try_from(9600).unwrap(), BaudRate::B9600);
        assert_eq!(BaudRate::try_from(19200).unwrap(), BaudRate::B19200);
        assert_eq!(BaudRate::try_from(38400).unwrap(), BaudRate::B38400);
        assert!(matches!(
            BaudRate::try_from(57600),
            Err(ClientError::UnsupportedBaudRate(57600))
        ));
    }

    #[test]
    fn test_default_baud_rate() {
        assert_eq!(BaudRate::default(), BaudRate::B38400);
    }
}

//! rssnex - RSSN bridge client
//!
//! Downloads feed content from a serial-attached bridge device, or
//! synchronizes the local clock with the bridge's time source.

mod clock;
mod progress;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use rssnex_client::{
    cancel_flag, download_channel, sync_clock, BaudRate, BridgeStream, ClientError, Endpoint,
    Session,
};
use rssnex_protocol::ChannelFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output file name used when none is given.
const DEFAULT_OUTPUT_FILE: &str = "_R.D";

#[derive(Parser)]
#[command(name = "rssnex")]
#[command(about = "RSSN bridge client: feed download and clock sync over a serial link")]
#[command(version)]
struct Cli {
    /// Output in dshell format
    #[arg(short = 'd')]
    dshell: bool,

    /// Sync date/time with the bridge (optional timezone offset, default 9)
    #[arg(
        short = 't',
        value_name = "TZ",
        num_args = 0..=1,
        default_missing_value = "9",
        allow_hyphen_values = true
    )]
    sync: Option<i16>,

    /// Serial device node or tcp://host:port
    #[arg(long, env = "RSSN_DEVICE", default_value = "/dev/ttyS0")]
    device: Endpoint,

    /// Baud rate (9600/19200/38400)
    #[arg(long, env = "RSSN_SPEED", default_value_t = 38400)]
    speed: u32,

    /// Transport timeout in seconds
    #[arg(long, env = "RSSN_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Nonzero suppresses the progress display
    #[arg(long, env = "RSSN_QUIET", default_value_t = 0)]
    quiet: u8,

    /// Nonzero writes the payload to stdout instead of a file
    #[arg(long, env = "RSSN_STDOUT", default_value_t = 0)]
    stdout: u8,

    /// Feed URL to download
    feed_url: Option<String>,

    /// Output file name
    output_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = if let Some(tz) = cli.sync {
        sync_mode(&cli, tz).await
    } else if let Some(url) = cli.feed_url.clone() {
        download_mode(&cli, &url).await
    } else {
        Cli::command().print_help().ok();
        return ExitCode::FAILURE;
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Opens the bridge attachment and wires up Ctrl-C as the cooperative
/// cancellation signal for blocked transport calls.
async fn open_session(cli: &Cli) -> Result<Session<BridgeStream>, ClientError> {
    let baud = BaudRate::try_from(cli.speed)?;

    let (cancel_tx, cancel_rx) = cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let stream = BridgeStream::open(&cli.device, baud).await?;
    Ok(Session::new(stream)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_cancel(cancel_rx))
}

async fn download_mode(cli: &Cli, link: &str) -> Result<(), ClientError> {
    let mut session = open_session(cli).await?;
    let format = if cli.dshell {
        ChannelFormat::Dshell
    } else {
        ChannelFormat::Tabular
    };
    let quiet = cli.quiet != 0;

    if cli.stdout != 0 {
        let mut sink = tokio::io::stdout();
        let progress = (!quiet).then(progress::Progress::start);
        let result = download_channel(&mut session, format, link, &mut sink).await;
        drop(progress);
        result?;
        return Ok(());
    }

    let path = cli
        .output_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));
    let mut sink = tokio::fs::File::create(&path).await?;

    let progress = (!quiet).then(progress::Progress::start);
    let result = download_channel(&mut session, format, link, &mut sink).await;
    drop(progress);

    match result {
        Ok(written) => {
            tracing::info!("Downloaded {} bytes to {}", written, path.display());
            Ok(())
        }
        Err(e) => {
            // the partially written file must not survive any failure
            drop(sink);
            let _ = std::fs::remove_file(&path);
            Err(e)
        }
    }
}

async fn sync_mode(cli: &Cli, tz: i16) -> Result<(), ClientError> {
    let mut session = open_session(cli).await?;
    let mut clock = clock::SystemClock::new(tz);

    let applied = sync_clock(&mut session, tz, &mut clock).await?;
    println!("RSSN Server Date/Time: {}", applied);
    println!("{}", "Synchronized.".green());
    Ok(())
}

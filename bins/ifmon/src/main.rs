//! ifmon command - watch interface link and address changes.

#[cfg(not(any(target_os = "linux", target_vendor = "apple")))]
compile_error!("ifmon supports Linux and Darwin only");

mod socket;

use std::io::Write;

use clap::Parser;
use ifwatch::{Decoder, FilterConfig, InterfaceEvent, PlatformDecoder};
use tracing::{debug, warn};

use socket::EventSocket;

#[derive(Parser)]
#[command(name = "ifmon", version, about = "Watch network interface changes")]
struct Cli {
    /// Subscription filter as key=value pairs
    /// (Linux: groups=<mask>; Darwin: vendor=<n>,class=<n>,subclass=<n>).
    #[arg(short = 'f', long)]
    filter: Option<FilterConfig>,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Log skipped records and filter setup.
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[cfg(target_os = "linux")]
fn default_filter() -> FilterConfig {
    FilterConfig::new().link().ipv4_addr().ipv6_addr()
}

#[cfg(target_vendor = "apple")]
fn default_filter() -> FilterConfig {
    FilterConfig::network()
}

fn print_event(out: &mut impl Write, event: &InterfaceEvent, cli: &Cli) -> anyhow::Result<()> {
    if cli.json {
        let line = if cli.pretty {
            serde_json::to_string_pretty(event)?
        } else {
            serde_json::to_string(event)?
        };
        writeln!(out, "{}", line)?;
    } else {
        writeln!(out, "{}", event)?;
    }
    out.flush()?;
    Ok(())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let filter = cli.filter.unwrap_or_else(default_filter);
    let socket = EventSocket::open(&filter)?;
    let decoder = PlatformDecoder::default();

    let mut stdout = std::io::stdout().lock();
    loop {
        let buf = tokio::select! {
            buf = socket.recv() => buf?,
            _ = tokio::signal::ctrl_c() => return Ok(()),
        };

        match decoder.decode(&buf) {
            Ok(events) => {
                for event in &events {
                    print_event(&mut stdout, event, cli)?;
                }
            }
            Err(e) if e.is_unhandled() => debug!(error = %e, "skipping kernel event"),
            Err(e) => warn!(error = %e, len = buf.len(), "dropping undecodable message"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

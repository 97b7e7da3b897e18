use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use devsink_cbor::{decode_line, decode_stream, write_body};
use devsink_core::{DeviceIdProfile, ReceiverConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Device payload receiver and packet decoder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Accept device JSON on `POST /` and store it under the data directory
    Serve(ServeArgs),
    /// Decode hex-encoded CBOR packets to JSON
    Decode(DecodeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to bind (overrides DEVSINK_BIND)
    #[arg(long)]
    bind: Option<IpAddr>,
    /// Port to listen on (overrides DEVSINK_PORT)
    #[arg(long)]
    port: Option<u16>,
    /// Root directory for stored payloads (overrides DEVSINK_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Accepted device id shapes: `standard` or `extended` (overrides DEVSINK_ID_PROFILE)
    #[arg(long)]
    profile: Option<DeviceIdProfile>,
}

#[derive(Args, Debug, Default)]
struct DecodeArgs {
    /// Log decoded request types
    #[arg(short, long)]
    verbose: bool,
    /// Decode a single packet and exit
    #[arg(short, long)]
    packet: Option<String>,
    /// Separator between bytes in the hex input
    #[arg(short, long)]
    separator: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Command::Decode(args) if args.verbose => "debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .json()
        .init();

    match cli.command {
        Command::Serve(args) => handle_serve(args).await,
        Command::Decode(args) => handle_decode(args),
    }
}

async fn handle_serve(args: ServeArgs) -> Result<()> {
    dotenvy::dotenv().ok();

    let mut config = ReceiverConfig::from_env().context("invalid DEVSINK_* configuration")?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(profile) = args.profile {
        config.profile = profile;
    }

    info!(?config, "starting devsink receiver");
    devsink_api::serve(config.socket_addr(), config.ingestor())
        .await
        .with_context(|| format!("server on {} failed", config.socket_addr()))
}

fn handle_decode(args: DecodeArgs) -> Result<()> {
    let separator = args.separator.as_deref();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(packet) = &args.packet {
        let decoded = decode_line(packet, separator).context("failed to decode provided packet")?;
        write_body(&mut out, &decoded).context("failed to write decoded packet")?;
        return Ok(());
    }

    let summary = decode_stream(io::stdin().lock(), &mut out, separator)
        .context("failed to decode packet stream")?;
    debug!(?summary, "finished decoding stdin");
    Ok(())
}

//! brickbridge daemon — stdio JSON-RPC front end over the session
//! bridge.
//!
//! stdout carries client traffic, so logs go to stderr.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use brickbridge::adapters::loopback::{LoopbackHost, ScriptedDevice};
use brickbridge::adapters::stdio_link::{self, STDIO_SLOT};
use brickbridge::bridge::channels::{ChannelSink, ClientEvent, EVENT_CHANNEL};
use brickbridge::bridge::ports::{ClientId, TransportMode};
use brickbridge::bridge::server::BridgeServer;
use brickbridge::config::BridgeConfig;

#[derive(Debug, Parser)]
#[command(name = "brickbridge", version, about = "JSON-RPC to brick-robot bridge")]
struct Cli {
    /// Wireless transport flavor.
    #[arg(long, value_enum, default_value_t = ModeArg::Classic)]
    mode: ModeArg,

    /// Control loop poll interval in milliseconds.
    #[arg(long, default_value_t = 5)]
    poll_interval_ms: u64,

    /// Push device frames as they arrive instead of waiting for `read`.
    #[arg(long)]
    eager_push: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Classic,
    LowEnergy,
}

impl From<ModeArg> for TransportMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Classic => TransportMode::Classic,
            ModeArg::LowEnergy => TransportMode::LowEnergy,
        }
    }
}

/// Scripted device host handed to each session.
///
/// Real radio stacks plug in here behind the same trait; the in-tree
/// host answers scans with a canned brick so the daemon is exercisable
/// end to end without hardware.
fn demo_host(_client_id: ClientId) -> LoopbackHost {
    LoopbackHost::new(vec![ScriptedDevice {
        address: "00:16:53:40:CE:B6".into(),
        name: Some("EV3".into()),
        rssi: -52,
    }])
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = BridgeConfig {
        transport: cli.mode.into(),
        poll_interval_ms: cli.poll_interval_ms,
        eager_push: cli.eager_push,
    };
    info!(
        "brickbridge v{} ({:?} mode)",
        env!("CARGO_PKG_VERSION"),
        config.transport
    );

    let reader = stdio_link::spawn_reader();
    let mut server = BridgeServer::new(config.transport, config.eager_push, demo_host);
    let mut sink = ChannelSink;

    'main: loop {
        // Drain client events first so requests see fresh link state.
        while let Ok(event) = EVENT_CHANNEL.try_receive() {
            let stdio_gone = matches!(
                &event,
                ClientEvent::Disconnected { client_id } if *client_id == STDIO_SLOT
            );
            server.handle_event(event, &mut sink);
            if stdio_gone {
                stdio_link::flush_outbound()?;
                break 'main;
            }
        }

        server.poll(&mut sink);
        stdio_link::flush_outbound()?;

        thread::sleep(Duration::from_millis(config.poll_interval_ms));
    }

    info!("client gone, shutting down");
    let _ = reader.join();
    Ok(())
}

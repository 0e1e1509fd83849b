//! Connect in the Dark terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server
//! inthedark-tui
//!
//! # Join a room straight away, remembering the user id between runs
//! inthedark-tui --room AB12C --cache-file ~/.inthedark-user
//!
//! # Remote server over TLS, with logs
//! inthedark-tui --host play.example.com --secure --log-file client.log
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use inthedark_app::{Bridge, Command, Runtime};
use inthedark_client::{ConnectionManager, Endpoint, transport::WsConnector};
use inthedark_tui::{TerminalDriver, UserCache};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Connect in the Dark terminal client
#[derive(Parser, Debug)]
#[command(name = "inthedark-tui")]
#[command(about = "Terminal client for Connect in the Dark")]
#[command(version)]
struct Args {
    /// Server host, with port
    #[arg(long, default_value = "localhost:8000")]
    host: String,

    /// WebSocket path on the server
    #[arg(long, default_value = "api/ws")]
    path: String,

    /// Use TLS (wss)
    #[arg(long)]
    secure: bool,

    /// Log in as this user at startup
    #[arg(short, long)]
    user: Option<String>,

    /// Room id to join once connected
    #[arg(short, long)]
    room: Option<String>,

    /// File remembering the last user id
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Page that shareable room links point at
    #[arg(long, default_value = "http://localhost:3000/")]
    link_base: Url,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file. The terminal is busy with the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let file_layer = match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        },
        None => None,
    };
    tracing_subscriber::registry().with(file_layer).with(filter).init();

    let endpoint = Endpoint::new(args.host, args.path, args.secure);
    tracing::info!(host = %endpoint.host, secure = endpoint.secure, "client starting");

    let cache = match args.cache_file {
        Some(path) => UserCache::open(path)?,
        None => UserCache::in_memory(),
    };

    let (connector, reports) = WsConnector::new();
    let bridge = Bridge::new(ConnectionManager::new(connector, endpoint));

    let mut driver = TerminalDriver::new(cache, args.link_base)?;
    if let Some(user_id) = args.user {
        driver.queue(Command::Login { user_id });
    }

    let mut runtime = Runtime::new(driver, bridge, reports, args.room);
    runtime.run().await?;

    tracing::info!("client stopped");
    Ok(())
}

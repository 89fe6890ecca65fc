//! TRACETIME Server
//!
//! Serves one trace bundle over HTTP.

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracetime_replay::SessionConfig;
use tracetime_server::{ApiServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracetime-server")]
#[command(about = "Replay recorded page snapshots over HTTP", long_about = None)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Trace bundle directory (holds trace.json and resources/)
    #[arg(short, long)]
    trace: PathBuf,

    /// Title of the document shown when no snapshot matches
    #[arg(long)]
    placeholder_title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tracetime=info,tower_http=debug")),
        )
        .init();

    let mut session = SessionConfig::default();
    if let Some(title) = args.placeholder_title {
        session = session.with_placeholder_title(title);
    }

    let config = ServerConfig::default()
        .with_bind(args.bind)
        .with_trace_dir(args.trace)
        .with_session(session);

    let server = ApiServer::new(config).await?;
    server.serve().await?;

    Ok(())
}

//! TRACETIME CLI
//!
//! Inspect trace bundles and resolve snapshots and resources offline.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracetime_core::{FrameId, PageId};
use tracetime_replay::{ReplaySession, TemporalCoordinate, snapshot_url};
use tracetime_storage::FsBlobStore;
use tracetime_trace::TraceBundle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracetime")]
#[command(about = "TRACETIME - time-travel replay of recorded page snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pages, frames and snapshots of a bundle
    Inspect {
        /// Trace bundle directory
        #[arg(short, long)]
        trace: PathBuf,
    },
    /// Print the document a navigation resolves to
    Snapshot {
        /// Trace bundle directory
        #[arg(short, long)]
        trace: PathBuf,
        #[command(flatten)]
        target: Target,
    },
    /// Resolve a URL requested from within a snapshot
    Resource {
        /// Trace bundle directory
        #[arg(short, long)]
        trace: PathBuf,
        #[command(flatten)]
        target: Target,
        /// Requested URL
        #[arg(short, long)]
        url: String,
        /// Write the body to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Target {
    /// Page id
    #[arg(long)]
    page: String,
    /// Frame id
    #[arg(long)]
    frame: String,
    #[command(flatten)]
    selector: Selector,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Selector {
    /// Snapshot id
    #[arg(long)]
    name: Option<String>,
    /// Latest snapshot at or before this time (ms)
    #[arg(long)]
    time: Option<String>,
}

impl Target {
    fn coordinate(&self) -> Result<TemporalCoordinate> {
        Ok(TemporalCoordinate::from_query(
            self.selector.name.as_deref(),
            self.selector.time.as_deref(),
        )?)
    }

    fn ids(&self) -> (PageId, FrameId) {
        (PageId::new(self.page.as_str()), FrameId::new(self.frame.as_str()))
    }
}

fn load_session(trace: &Path) -> Result<ReplaySession> {
    let bundle = TraceBundle::open(trace)?;
    let store = FsBlobStore::new(bundle.resources_dir());
    Ok(ReplaySession::new(bundle.into_model(), Arc::new(store)))
}

fn render_inspect(session: &ReplaySession) -> String {
    let mut out = String::new();
    for page in session.pages() {
        let _ = writeln!(out, "page {}", page.page_id);
        for frame in &page.frames {
            let _ = writeln!(
                out,
                "  frame {}: {} snapshots, {} resources",
                frame.frame_id,
                frame.snapshots.len(),
                frame.resources_in_order().count()
            );
            for snapshot in &frame.snapshots {
                let (label, coordinate) = match &snapshot.snapshot_id {
                    Some(id) => (id.as_str(), TemporalCoordinate::exact(id.clone())),
                    None => ("-", TemporalCoordinate::before(snapshot.timestamp)),
                };
                let _ = writeln!(
                    out,
                    "    {} @ {}  {}",
                    label,
                    snapshot.timestamp,
                    snapshot_url(&page.page_id, &frame.frame_id, &coordinate)
                );
            }
        }
    }
    let _ = writeln!(out, "resources: {}", session.resource_index().len());
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tracetime=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { trace } => {
            let session = load_session(&trace)?;
            print!("{}", render_inspect(&session));
            Ok(())
        }
        Commands::Snapshot { trace, target } => {
            let session = load_session(&trace)?;
            let (page, frame) = target.ids();
            let navigation = session.resolve_navigation(&page, &frame, &target.coordinate()?);
            if !navigation.is_available() {
                tracing::warn!(page = %page, frame = %frame, "no snapshot matched");
            }
            println!("{}", navigation.html());
            Ok(())
        }
        Commands::Resource {
            trace,
            target,
            url,
            output,
        } => {
            let session = load_session(&trace)?;
            let (page, frame) = target.ids();
            let response = session
                .resolve_sub_resource(&page, &frame, &target.coordinate()?, &url)
                .await?;

            println!("{} {}", response.content_hash, response.url);
            for header in &response.headers {
                println!("{}: {}", header.name, header.value);
            }
            if let Some(path) = output {
                std::fs::write(&path, &response.body)?;
                println!("wrote {} bytes to {}", response.content_length(), path.display());
            }
            Ok(())
        }
    }
}

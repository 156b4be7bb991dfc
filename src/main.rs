mod app;
mod error;
mod graph;
mod layout;
mod store;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use crate::app::{GraphSource, LoadRequest, ShakeGraphApp, fetch_graph};
use crate::graph::Caller;
use crate::layout::LayoutConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the encounter graph for a user and print the response JSON.
    Build {
        /// Store snapshot (`{"users": {id: {"friends": ...}}}`).
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        user: String,
        /// Uid the request is made as; defaults to --user, "" is anonymous.
        #[arg(long = "as")]
        as_uid: Option<String>,
    },
    /// Open the interactive graph viewer.
    View {
        #[arg(long, conflicts_with = "response", required_unless_present = "response")]
        store: Option<PathBuf>,
        /// Saved graph response to replay instead of building one.
        #[arg(long)]
        response: Option<PathBuf>,
        /// Snapshot to read names and icons from when replaying a response.
        #[arg(long, requires = "response")]
        profiles: Option<PathBuf>,
        #[arg(long)]
        user: String,
        #[arg(long = "as")]
        as_uid: Option<String>,
        /// JSON file overriding layout constants.
        #[arg(long)]
        layout_config: Option<PathBuf>,
    },
}

fn caller_for(user: &str, as_uid: Option<String>) -> Caller {
    match as_uid {
        Some(uid) if uid.is_empty() => Caller::anonymous(),
        Some(uid) => Caller::authenticated(uid),
        None => Caller::authenticated(user),
    }
}

fn run_build(store: PathBuf, user: String, as_uid: Option<String>) -> Result<()> {
    let caller = caller_for(&user, as_uid);
    let request = LoadRequest {
        source: GraphSource::Store { snapshot: store },
        user_id: user,
        caller,
        config: LayoutConfig::default(),
    };

    let loaded = fetch_graph(&request)?;
    let json = serde_json::to_string_pretty(&loaded.response)
        .context("failed to serialize graph response")?;
    println!("{json}");
    Ok(())
}

fn run_view(request: LoadRequest) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "shakegraph",
        options,
        Box::new(move |cc| Ok(Box::new(ShakeGraphApp::new(cc, request)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Build {
            store,
            user,
            as_uid,
        } => run_build(store, user, as_uid),
        Command::View {
            store,
            response,
            profiles,
            user,
            as_uid,
            layout_config,
        } => {
            let source = match (store, response) {
                (Some(snapshot), _) => GraphSource::Store { snapshot },
                (None, Some(response)) => GraphSource::Response { response, profiles },
                (None, None) => return Err(anyhow!("either --store or --response is required")),
            };
            let config = match layout_config {
                Some(path) => LayoutConfig::load(&path)?,
                None => LayoutConfig::default(),
            };
            let caller = caller_for(&user, as_uid);
            run_view(LoadRequest {
                source,
                user_id: user,
                caller,
                config,
            })
        }
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::error::GraphError;
use crate::graph::{Caller, GraphBuilder, GraphRequest, GraphResponse, decode_response_str};
use crate::layout::LayoutConfig;
use crate::store::{ProfileDirectory, load_snapshot};

#[derive(Clone, Debug)]
pub enum GraphSource {
    /// Run the graph builder in-process against a store snapshot.
    Store { snapshot: PathBuf },
    /// Replay a saved graph service response.
    Response {
        response: PathBuf,
        profiles: Option<PathBuf>,
    },
}

#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub source: GraphSource,
    pub user_id: String,
    pub caller: Caller,
    pub config: LayoutConfig,
}

pub struct LoadedGraph {
    pub response: GraphResponse,
    pub profiles: ProfileDirectory,
}

impl LoadedGraph {
    pub fn contains_user(&self, user_id: &str) -> bool {
        self.response.nodes.iter().any(|node| node.id == user_id)
    }
}

#[derive(Clone, Debug)]
pub struct LoadFailure {
    pub message: String,
    pub retryable: bool,
}

impl LoadFailure {
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    fn from_error(error: &anyhow::Error) -> Self {
        // I/O and snapshot problems may clear up on their own; graph errors
        // know whether they do.
        let retryable = error
            .downcast_ref::<GraphError>()
            .is_none_or(GraphError::is_retryable);
        Self {
            message: format!("{error:#}"),
            retryable,
        }
    }
}

pub fn load_graph(request: &LoadRequest) -> std::result::Result<LoadedGraph, LoadFailure> {
    fetch_graph(request).map_err(|error| {
        log::warn!("graph load failed: {error:#}");
        LoadFailure::from_error(&error)
    })
}

pub fn fetch_graph(request: &LoadRequest) -> Result<LoadedGraph> {
    match &request.source {
        GraphSource::Store { snapshot } => {
            let (store, profiles) = load_snapshot(snapshot)?;
            log::debug!("snapshot {} has {} profiles", snapshot.display(), profiles.len());
            let builder = GraphBuilder::new(store);
            let graph_request = GraphRequest {
                user_id: request.user_id.clone(),
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .context("failed to start graph runtime")?;
            let response =
                runtime.block_on(builder.build_graph(&request.caller, &graph_request))?;
            Ok(LoadedGraph { response, profiles })
        }
        GraphSource::Response { response, profiles } => {
            let raw = fs::read_to_string(response)
                .with_context(|| format!("failed to read graph response {}", response.display()))?;
            let decoded = decode_response_str(&raw)?;
            let profiles = match profiles {
                Some(path) => load_snapshot(path)?.1,
                None => ProfileDirectory::new(),
            };
            log::debug!("replaying {} with {} profiles", response.display(), profiles.len());
            Ok(LoadedGraph {
                response: decoded,
                profiles,
            })
        }
    }
}

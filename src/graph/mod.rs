mod builder;
mod paths;
mod social;
mod wire;

pub use builder::{Caller, GraphBuilder};
pub use paths::{
    compute_distances, extract_largest_component, find_connected_components, shortest_path,
};
pub use social::{SocialGraph, SocialNode};
pub use wire::{GraphRequest, GraphResponse, decode_response_str};
#[cfg(test)]
pub use wire::{WireEdge, WireNode};

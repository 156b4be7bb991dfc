use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod clock;
mod drag;
mod fit;
mod physics;
mod session;
mod visibility;

pub use drag::Interaction;
pub use session::LayoutSession;
pub use visibility::DistanceTier;

/// Tuning for the force simulation. Units are viewport points and ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub repulsion: f32,
    pub attraction: f32,
    pub rest_length: f32,
    pub gravity: f32,
    pub damping: f32,
    /// Velocity retention for nodes past `stable_distance`; lower settles faster.
    pub far_damping: f32,
    pub time_step: f32,
    pub far_time_step: f32,
    pub stable_distance: u32,
    pub padding: f32,
    /// Drawn radius of a node; positions are kept half of it away from the edges.
    pub node_radius: f32,
    pub tick_rate_hz: f32,
    pub approximate_repulsion: bool,
    pub barnes_hut_theta: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 8_000.0,
            attraction: 0.05,
            rest_length: 100.0,
            gravity: 0.02,
            damping: 0.85,
            far_damping: 0.6,
            time_step: 1.0,
            far_time_step: 0.5,
            stable_distance: 3,
            padding: 50.0,
            node_radius: 12.0,
            tick_rate_hz: 60.0,
            approximate_repulsion: false,
            barnes_hut_theta: 0.72,
        }
    }
}

impl LayoutConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid layout config {}", path.display()))
    }

    pub(crate) fn clamp_margin(&self) -> f32 {
        self.node_radius * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "repulsion": 1200.0, "approximate_repulsion": true }"#)
                .unwrap();
        assert_eq!(config.repulsion, 1200.0);
        assert!(config.approximate_repulsion);
        assert_eq!(config.rest_length, LayoutConfig::default().rest_length);
        assert_eq!(config.stable_distance, 3);
    }

    #[test]
    fn clamp_margin_is_half_the_drawn_radius() {
        let config = LayoutConfig {
            node_radius: 20.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.clamp_margin(), 10.0);
    }
}

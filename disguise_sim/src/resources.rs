use bevy::prelude::*;
use serde::Deserialize;

use crate::players::{PlayerColor, Relationship};

/// Global tick counter.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationTick(pub u64);

/// How radar blips of disguised actors are colored for fooled viewers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarColorMode {
    /// Color by the viewer's relationship with the apparent owner.
    Stance,
    /// Use the apparent owner's player color.
    #[default]
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StanceColors {
    pub own: PlayerColor,
    pub ally: PlayerColor,
    pub neutral: PlayerColor,
    pub enemy: PlayerColor,
}

impl Default for StanceColors {
    fn default() -> Self {
        Self {
            own: PlayerColor::rgb(0, 255, 0),
            ally: PlayerColor::rgb(255, 255, 0),
            neutral: PlayerColor::rgb(160, 160, 160),
            enemy: PlayerColor::rgb(255, 0, 0),
        }
    }
}

impl StanceColors {
    pub fn for_relationship(&self, relationship: Relationship) -> PlayerColor {
        if relationship == Relationship::ALLY {
            self.ally
        } else if relationship == Relationship::NEUTRAL {
            self.neutral
        } else {
            self.enemy
        }
    }
}

/// Client display options consulted by presentation queries.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub radar_color_mode: RadarColorMode,
    pub stance_colors: StanceColors,
}

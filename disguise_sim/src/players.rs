use std::collections::HashSet;
use std::fmt;

use bevy::prelude::Resource;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Identifier for a player participating in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 8-bit RGB color used for player swatches and radar blips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PlayerColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

bitflags! {
    /// How one player regards another. Used as a mask when filtering targets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Relationship: u8 {
        const ALLY = 1 << 0;
        const NEUTRAL = 1 << 1;
        const ENEMY = 1 << 2;
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Relationship::all()
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Internal faction name, used to pick faction-specific sprites.
    pub faction: String,
    pub color: PlayerColor,
}

/// Registry of players and their diplomatic standing.
///
/// A player is always allied with itself. Pairs that are neither allied nor
/// marked neutral are enemies.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    alliances: HashSet<(PlayerId, PlayerId)>,
    neutral: HashSet<(PlayerId, PlayerId)>,
}

fn pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PlayerRegistry {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.retain(|existing| existing.id != player.id);
        self.players.push(player);
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn faction_of(&self, id: PlayerId) -> Option<&str> {
        self.player(id).map(|player| player.faction.as_str())
    }

    pub fn color_of(&self, id: PlayerId) -> Option<PlayerColor> {
        self.player(id).map(|player| player.color)
    }

    pub fn set_allied(&mut self, a: PlayerId, b: PlayerId) {
        self.neutral.remove(&pair(a, b));
        self.alliances.insert(pair(a, b));
    }

    pub fn set_neutral(&mut self, a: PlayerId, b: PlayerId) {
        self.alliances.remove(&pair(a, b));
        self.neutral.insert(pair(a, b));
    }

    pub fn set_enemies(&mut self, a: PlayerId, b: PlayerId) {
        self.alliances.remove(&pair(a, b));
        self.neutral.remove(&pair(a, b));
    }

    pub fn relationship(&self, from: PlayerId, to: PlayerId) -> Relationship {
        if from == to || self.alliances.contains(&pair(from, to)) {
            Relationship::ALLY
        } else if self.neutral.contains(&pair(from, to)) {
            Relationship::NEUTRAL
        } else {
            Relationship::ENEMY
        }
    }

    pub fn is_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        self.relationship(a, b) == Relationship::ALLY
    }
}

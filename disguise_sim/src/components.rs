use std::collections::BTreeSet;
use std::sync::Arc;

use bevy::prelude::*;

use crate::{
    catalog::{ActorTypeId, TooltipInfo},
    players::PlayerId,
};

/// Opaque handle naming the image an actor is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteKey(pub String);

impl SpriteKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

/// True owner of an actor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub PlayerId);

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ActorType(pub ActorTypeId);

/// The actor's own render image, before any disguise override.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Sprite(pub SpriteKey);

/// Tooltip-capable facet. Every actor carries exactly one.
#[derive(Component, Debug, Clone)]
pub struct Tooltip {
    pub info: Arc<TooltipInfo>,
}

/// Target types an actor can be picked as by targeted orders.
#[derive(Component, Debug, Clone, Default)]
pub struct Targetable {
    pub types: BTreeSet<String>,
}

impl Targetable {
    pub fn overlaps(&self, types: &BTreeSet<String>) -> bool {
        !self.types.is_disjoint(types)
    }
}

/// Marker for actors currently present in the world (not loaded into a
/// transport, not removed pending despawn).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InWorld;

/// Actors carrying this see the true owner of disguised actors.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DisguiseDetector;

#[derive(Bundle)]
pub struct ActorBundle {
    pub actor_type: ActorType,
    pub owner: Owner,
    pub sprite: Sprite,
    pub tooltip: Tooltip,
    pub targetable: Targetable,
    pub in_world: InWorld,
}

//! Identity queries answered for tooltips, stance checks and the radar.
//!
//! None of these hold state; they read the actor's facets on demand.

use std::sync::Arc;

use bevy::prelude::*;

use crate::{
    catalog::TooltipInfo,
    components::{DisguiseDetector, Owner, Tooltip},
    disguise::Disguise,
    players::{PlayerColor, PlayerId, PlayerRegistry},
    resources::{DisplaySettings, RadarColorMode},
};

/// Description shown in `entity`'s tooltip.
pub fn tooltip_description_for(world: &World, entity: Entity) -> Option<Arc<TooltipInfo>> {
    let base = &world.get::<Tooltip>(entity)?.info;
    let description = match world.get::<Disguise>(entity) {
        Some(disguise) => disguise.tooltip_description(base),
        None => base,
    };
    Some(Arc::clone(description))
}

/// Owner `viewer` believes `entity` belongs to.
pub fn owner_for(world: &World, entity: Entity, viewer: PlayerId) -> Option<PlayerId> {
    let true_owner = world.get::<Owner>(entity)?.0;
    let Some(disguise) = world.get::<Disguise>(entity) else {
        return Some(true_owner);
    };
    let players = world.resource::<PlayerRegistry>();
    Some(disguise.effective_owner_for(true_owner, viewer, players))
}

/// Owner as seen by `detector`. Disguise detectors always see the truth.
pub fn owner_for_detector(world: &World, entity: Entity, detector: Entity) -> Option<PlayerId> {
    let true_owner = world.get::<Owner>(entity)?.0;
    if world.get::<DisguiseDetector>(detector).is_some() {
        return Some(true_owner);
    }
    let viewer = world.get::<Owner>(detector)?.0;
    owner_for(world, entity, viewer)
}

pub fn sees_through(world: &World, detector: Entity) -> bool {
    world.get::<DisguiseDetector>(detector).is_some()
}

/// Radar blip color for `entity` as drawn for `viewer`.
///
/// `base_color` is the color the radar would use without disguises.
pub fn radar_color_for(
    world: &World,
    entity: Entity,
    viewer: PlayerId,
    base_color: PlayerColor,
    mode: RadarColorMode,
) -> PlayerColor {
    let (Some(owner), Some(disguise)) = (world.get::<Owner>(entity), world.get::<Disguise>(entity))
    else {
        return base_color;
    };
    let players = world.resource::<PlayerRegistry>();
    let settings = world.resource::<DisplaySettings>();
    disguise.radar_color(
        owner.0,
        viewer,
        base_color,
        mode,
        players,
        &settings.stance_colors,
    )
}

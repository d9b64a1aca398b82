//! Disguise behavior for actors in a headless strategy simulation.
//!
//! Actors with a disguise profile can take on another actor's sprite, owner
//! and tooltip. Orders and reveal triggers are resolved once per tick when
//! [`run_tick`] is invoked.

pub mod catalog;
mod components;
pub mod conditions;
pub mod disguise;
pub mod events;
pub mod orders;
mod players;
pub mod presentation;
mod resources;
mod systems;

use bevy::prelude::*;

pub use catalog::{
    load_actor_catalog, load_actor_catalog_from_env, ActorCatalog, ActorCatalogHandle,
    ActorCatalogMetadata, ActorTemplate, ActorTypeId, CatalogError, DisguiseProfile,
    RevealTrigger, TooltipInfo,
};
pub use components::{
    ActorBundle, ActorType, DisguiseDetector, InWorld, Owner, Sprite, SpriteKey, Targetable,
    Tooltip,
};
pub use conditions::{ConditionManager, ConditionToken, Conditions};
pub use disguise::{ApparentIdentity, Disguise, TargetFacets, TransitionContext};
pub use events::{
    ApparentOwnerChanged, AttackCommitted, CargoUnloading, Damaged, Demolishing, Infiltrating,
    OwnerChangeSink, PreparingAttack,
};
pub use orders::{
    DisguiseOrderTargeter, Order, OrderQueue, OrderTarget, SubmitError, SubmitOutcome,
    DISGUISE_ORDER_ID,
};
pub use players::{Player, PlayerColor, PlayerId, PlayerRegistry, Relationship};
pub use resources::{DisplaySettings, RadarColorMode, SimulationTick, StanceColors};
pub use systems::{disguise_as_template, spawn_actor, submit_order, ActorError};

/// Construct a Bevy [`App`] configured with the disguise tick pipeline.
pub fn build_headless_app() -> App {
    let mut app = App::new();

    let (catalog, catalog_metadata) = load_actor_catalog_from_env();

    app.insert_resource(ActorCatalogHandle::new(catalog))
        .insert_resource(catalog_metadata)
        .insert_resource(PlayerRegistry::default())
        .insert_resource(DisplaySettings::default())
        .insert_resource(SimulationTick::default())
        .insert_resource(OrderQueue::default())
        .add_event::<PreparingAttack>()
        .add_event::<AttackCommitted>()
        .add_event::<Damaged>()
        .add_event::<CargoUnloading>()
        .add_event::<Demolishing>()
        .add_event::<Infiltrating>()
        .add_event::<ApparentOwnerChanged>()
        .add_plugins(MinimalPlugins)
        .add_systems(
            Update,
            (
                systems::resolve_disguise_orders,
                systems::reveal_disguises,
                systems::advance_tick,
            )
                .chain(),
        );

    app
}

/// Execute a single simulation tick.
///
/// Orders queued before the call resolve first, then reveal triggers sent
/// before the call are applied.
pub fn run_tick(app: &mut App) {
    app.update();
}

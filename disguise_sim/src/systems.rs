use std::sync::Arc;

use bevy::{ecs::system::SystemParam, prelude::*};
use thiserror::Error;

use crate::{
    catalog::ActorCatalogHandle,
    components::{
        ActorBundle, ActorType, DisguiseDetector, InWorld, Owner, Sprite, Targetable, Tooltip,
    },
    conditions::{ConditionManager, Conditions},
    disguise::{Disguise, TargetFacets, TransitionContext},
    events::{
        ApparentOwnerChanged, AttackCommitted, CargoUnloading, Damaged, Demolishing, Infiltrating,
        PreparingAttack,
    },
    orders::{
        effective_disguise_target, DisguiseOrderTargeter, Order, OrderQueue, QueuedOrder,
        SubmitError, SubmitOutcome,
    },
    players::{PlayerId, PlayerRegistry},
    resources::SimulationTick,
};

type DisguiseQueryData = (
    &'static mut Disguise,
    &'static Owner,
    Option<&'static mut Conditions>,
);

type FacetQueryData = (
    &'static ActorType,
    &'static Sprite,
    &'static Tooltip,
    &'static Owner,
);

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("unknown actor type '{0}'")]
    UnknownActorType(String),
    #[error("player {0} is not registered")]
    UnknownPlayer(PlayerId),
    #[error("entity {0:?} is not an actor")]
    UnknownActor(Entity),
    #[error("actor {0:?} cannot disguise")]
    CannotDisguise(Entity),
}

/// Spawn an actor of `actor_type` owned by `owner`, drawn with the owner's
/// faction-specific image.
pub fn spawn_actor(
    world: &mut World,
    actor_type: &str,
    owner: PlayerId,
) -> Result<Entity, ActorError> {
    let catalog = world.resource::<ActorCatalogHandle>().get();
    let template = catalog
        .get(actor_type)
        .ok_or_else(|| ActorError::UnknownActorType(actor_type.to_string()))?;

    let sprite = {
        let players = world.resource::<PlayerRegistry>();
        if !players.contains(owner) {
            return Err(ActorError::UnknownPlayer(owner));
        }
        template.image_for(players.faction_of(owner))
    };

    let mut entity = world.spawn(ActorBundle {
        actor_type: ActorType(template.id.clone()),
        owner: Owner(owner),
        sprite: Sprite(sprite),
        tooltip: Tooltip {
            info: Arc::clone(&template.tooltip),
        },
        targetable: Targetable {
            types: template.targetable.clone(),
        },
        in_world: InWorld,
    });
    if let Some(profile) = &template.disguise {
        entity.insert((Disguise::new(Arc::clone(profile)), Conditions::default()));
    }
    if template.detects_disguise {
        entity.insert(DisguiseDetector);
    }

    let id = entity.id();
    tracing::debug!(
        target: "disguise::actors",
        entity = ?id,
        actor_type,
        %owner,
        "actor.spawned"
    );
    Ok(id)
}

/// Validate and enqueue an order for the next resolution pass.
pub fn submit_order(
    world: &mut World,
    issuer: PlayerId,
    order: Order,
) -> Result<SubmitOutcome, SubmitError> {
    if !world.resource::<PlayerRegistry>().contains(issuer) {
        return Err(SubmitError::UnknownPlayer(issuer));
    }
    let actor = order.actor();
    if world.get::<Owner>(actor).map(|owner| owner.0) != Some(issuer) {
        return Err(SubmitError::NotOwner { issuer, actor });
    }
    let Order::Disguise { target, .. } = order;
    let Some(disguise) = world.get::<Disguise>(actor) else {
        return Err(SubmitError::CannotDisguise(actor));
    };
    if let Some(target) = target.filter(|&target| target != actor) {
        if !can_disguise_as(world, disguise, issuer, target) {
            return Err(SubmitError::InvalidTarget { actor, target });
        }
    }
    Ok(world.resource_mut::<OrderQueue>().push(issuer, order))
}

/// Targeter check for a live `target`. Entities already gone are let
/// through; resolution treats them as leaving the world.
fn can_disguise_as(world: &World, disguise: &Disguise, issuer: PlayerId, target: Entity) -> bool {
    let Some(target_ref) = world.get_entity(target) else {
        return true;
    };
    let (Some(targetable), Some(owner)) =
        (target_ref.get::<Targetable>(), target_ref.get::<Owner>())
    else {
        return false;
    };
    let relationship = world
        .resource::<PlayerRegistry>()
        .relationship(issuer, owner.0);
    DisguiseOrderTargeter::default().can_target_actor(
        disguise.profile(),
        relationship,
        targetable,
        false,
    )
}

/// Immediately disguise `actor` as `actor_type` fielded by `new_owner`.
pub fn disguise_as_template(
    world: &mut World,
    actor: Entity,
    actor_type: &str,
    new_owner: PlayerId,
) -> Result<(), ActorError> {
    let catalog = world.resource::<ActorCatalogHandle>().get();
    let template = catalog
        .get(actor_type)
        .ok_or_else(|| ActorError::UnknownActorType(actor_type.to_string()))?;

    let mut changes: Vec<ApparentOwnerChanged> = Vec::new();
    world.resource_scope(|world, players: Mut<PlayerRegistry>| {
        if !players.contains(new_owner) {
            return Err(ActorError::UnknownPlayer(new_owner));
        }
        if world.get::<Owner>(actor).is_none() {
            return Err(ActorError::UnknownActor(actor));
        }
        let mut query = world.query::<DisguiseQueryData>();
        let Ok((mut disguise, owner, conditions)) = query.get_mut(world, actor) else {
            return Err(ActorError::CannotDisguise(actor));
        };
        let mut ctx = TransitionContext {
            entity: actor,
            true_owner: owner.0,
            conditions: conditions.map(|c| c.into_inner() as &mut dyn ConditionManager),
            observers: &mut changes,
        };
        disguise.disguise_as_template(template, new_owner, &players, &mut ctx);
        Ok(())
    })?;

    for change in changes {
        world.send_event(change);
    }
    Ok(())
}

#[derive(SystemParam)]
pub struct DisguiseOrderParams<'w, 's> {
    pub queue: ResMut<'w, OrderQueue>,
    pub disguises: Query<'w, 's, DisguiseQueryData>,
    pub facets: Query<'w, 's, FacetQueryData>,
    pub in_world: Query<'w, 's, (), With<InWorld>>,
    pub owner_events: EventWriter<'w, ApparentOwnerChanged>,
}

fn capture_target_facets(
    facets: &Query<FacetQueryData>,
    disguises: &Query<DisguiseQueryData>,
    target: Entity,
) -> Option<TargetFacets> {
    let (actor_type, sprite, tooltip, owner) = facets.get(target).ok()?;
    let disguise = disguises
        .get(target)
        .ok()
        .and_then(|(disguise, _, _)| disguise.identity().cloned());
    Some(TargetFacets {
        actor_type: actor_type.0.clone(),
        sprite: sprite.0.clone(),
        owner: owner.0,
        description: Arc::clone(&tooltip.info),
        disguise,
    })
}

/// Resolve queued Disguise orders against the current world.
pub fn resolve_disguise_orders(mut params: DisguiseOrderParams) {
    for QueuedOrder { issuer, order } in params.queue.drain() {
        let Order::Disguise { actor, target, .. } = order;

        let target =
            effective_disguise_target(actor, target, |entity| params.in_world.contains(entity));
        let facets = match target {
            Some(target) => {
                match capture_target_facets(&params.facets, &params.disguises, target) {
                    Some(facets) => Some(facets),
                    None => {
                        tracing::warn!(
                            target: "disguise::orders",
                            actor = ?actor,
                            disguise_target = ?target,
                            "order.skipped=target_without_facets"
                        );
                        continue;
                    }
                }
            }
            None => None,
        };

        let Ok((mut disguise, owner, conditions)) = params.disguises.get_mut(actor) else {
            tracing::warn!(
                target: "disguise::orders",
                actor = ?actor,
                %issuer,
                "order.skipped=actor_cannot_disguise"
            );
            continue;
        };

        let mut ctx = TransitionContext {
            entity: actor,
            true_owner: owner.0,
            conditions: conditions.map(|c| c.into_inner() as &mut dyn ConditionManager),
            observers: &mut params.owner_events,
        };
        disguise.disguise_as_actor(facets, &mut ctx);

        tracing::debug!(
            target: "disguise::orders",
            actor = ?actor,
            %issuer,
            apparent_owner = ?disguise.apparent_owner(),
            "order.resolved=disguise"
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum Notice {
    PreparingAttack,
    Attack,
    Damaged(i32),
    Unload,
    Demolish,
    Infiltrate,
}

#[derive(SystemParam)]
pub struct RevealParams<'w, 's> {
    pub preparing: EventReader<'w, 's, PreparingAttack>,
    pub attacks: EventReader<'w, 's, AttackCommitted>,
    pub damaged: EventReader<'w, 's, Damaged>,
    pub unloading: EventReader<'w, 's, CargoUnloading>,
    pub demolishing: EventReader<'w, 's, Demolishing>,
    pub infiltrating: EventReader<'w, 's, Infiltrating>,
    pub disguises: Query<'w, 's, DisguiseQueryData>,
    pub owner_events: EventWriter<'w, ApparentOwnerChanged>,
}

/// Drop disguises whose profile lists a trigger that fired this tick.
pub fn reveal_disguises(mut params: RevealParams) {
    let mut notices = Vec::new();
    notices.extend(
        params
            .preparing
            .read()
            .map(|event| (event.attacker, Notice::PreparingAttack)),
    );
    notices.extend(params.attacks.read().map(|event| (event.attacker, Notice::Attack)));
    notices.extend(
        params
            .damaged
            .read()
            .map(|event| (event.entity, Notice::Damaged(event.damage))),
    );
    notices.extend(params.unloading.read().map(|event| (event.carrier, Notice::Unload)));
    notices.extend(params.demolishing.read().map(|event| (event.entity, Notice::Demolish)));
    notices.extend(
        params
            .infiltrating
            .read()
            .map(|event| (event.entity, Notice::Infiltrate)),
    );

    for (entity, notice) in notices {
        let Ok((mut disguise, owner, conditions)) = params.disguises.get_mut(entity) else {
            continue;
        };
        let was_disguised = disguise.is_disguised();
        let mut ctx = TransitionContext {
            entity,
            true_owner: owner.0,
            conditions: conditions.map(|c| c.into_inner() as &mut dyn ConditionManager),
            observers: &mut params.owner_events,
        };
        match notice {
            Notice::PreparingAttack => disguise.preparing_attack(),
            Notice::Attack => disguise.attacking(&mut ctx),
            Notice::Damaged(damage) => disguise.damaged(damage, &mut ctx),
            Notice::Unload => disguise.unloading(&mut ctx),
            Notice::Demolish => disguise.demolishing(&mut ctx),
            Notice::Infiltrate => disguise.infiltrating(&mut ctx),
        }
        if was_disguised && !disguise.is_disguised() {
            tracing::debug!(
                target: "disguise::reveal",
                entity = ?entity,
                trigger = ?notice,
                "disguise.revealed"
            );
        }
    }
}

/// Increment global tick counter after the simulation step.
pub fn advance_tick(mut tick: ResMut<SimulationTick>) {
    tick.0 = tick.0.wrapping_add(1);
}

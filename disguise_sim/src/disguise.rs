//! Disguise state for actors that can impersonate other actors.
//!
//! An actor's apparent identity (sprite, owner, tooltip, actor type) is either
//! fully overridden or not overridden at all. Allies of the true owner always
//! see through the disguise.

use std::sync::Arc;

use bevy::prelude::*;

use crate::{
    catalog::{ActorTemplate, ActorTypeId, DisguiseProfile, RevealTrigger, TooltipInfo},
    components::SpriteKey,
    conditions::{ConditionManager, ConditionToken},
    events::{ApparentOwnerChanged, OwnerChangeSink},
    players::{PlayerColor, PlayerId, PlayerRegistry},
    resources::{RadarColorMode, StanceColors},
};

/// What a disguised actor looks like to fooled viewers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApparentIdentity {
    pub sprite: SpriteKey,
    pub owner: PlayerId,
    pub description: Arc<TooltipInfo>,
    pub actor_type: ActorTypeId,
}

/// Snapshot of the facets a disguise copies from a live target.
#[derive(Debug, Clone)]
pub struct TargetFacets {
    pub actor_type: ActorTypeId,
    pub sprite: SpriteKey,
    pub owner: PlayerId,
    pub description: Arc<TooltipInfo>,
    /// The target's own disguise, if it is wearing one.
    pub disguise: Option<ApparentIdentity>,
}

impl TargetFacets {
    /// Identity a disguise takes on from this target. A disguised target
    /// passes on its disguise, not its true identity.
    pub fn apparent_identity(self) -> ApparentIdentity {
        match self.disguise {
            Some(identity) => identity,
            None => ApparentIdentity {
                sprite: self.sprite,
                owner: self.owner,
                description: self.description,
                actor_type: self.actor_type,
            },
        }
    }
}

/// Collaborators touched by a disguise transition.
pub struct TransitionContext<'a> {
    pub entity: Entity,
    pub true_owner: PlayerId,
    pub conditions: Option<&'a mut dyn ConditionManager>,
    pub observers: &'a mut dyn OwnerChangeSink,
}

#[derive(Component, Debug, Clone)]
pub struct Disguise {
    profile: Arc<DisguiseProfile>,
    identity: Option<ApparentIdentity>,
    condition_token: Option<ConditionToken>,
}

impl Disguise {
    pub fn new(profile: Arc<DisguiseProfile>) -> Self {
        Self {
            profile,
            identity: None,
            condition_token: None,
        }
    }

    pub fn profile(&self) -> &DisguiseProfile {
        &self.profile
    }

    pub fn is_disguised(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&ApparentIdentity> {
        self.identity.as_ref()
    }

    pub fn apparent_owner(&self) -> Option<PlayerId> {
        self.identity.as_ref().map(|identity| identity.owner)
    }

    pub fn apparent_sprite(&self) -> Option<&SpriteKey> {
        self.identity.as_ref().map(|identity| &identity.sprite)
    }

    pub fn apparent_description(&self) -> Option<&Arc<TooltipInfo>> {
        self.identity.as_ref().map(|identity| &identity.description)
    }

    pub fn apparent_actor_type(&self) -> Option<&ActorTypeId> {
        self.identity.as_ref().map(|identity| &identity.actor_type)
    }

    pub fn condition_token(&self) -> Option<ConditionToken> {
        self.condition_token
    }

    /// Take on the appearance of `target`, or drop the disguise when `None`.
    pub fn disguise_as_actor(&mut self, target: Option<TargetFacets>, ctx: &mut TransitionContext) {
        let previous_owner = self.effective_owner(ctx.true_owner);
        let was_disguised = self.is_disguised();

        self.identity = target.map(TargetFacets::apparent_identity);

        self.handle_transition(previous_owner, was_disguised, ctx);
    }

    /// Take on the appearance of an actor type as fielded by `new_owner`.
    pub fn disguise_as_template(
        &mut self,
        template: &ActorTemplate,
        new_owner: PlayerId,
        players: &PlayerRegistry,
        ctx: &mut TransitionContext,
    ) {
        let previous_owner = self.effective_owner(ctx.true_owner);
        let was_disguised = self.is_disguised();

        self.identity = Some(ApparentIdentity {
            sprite: template.image_for(players.faction_of(new_owner)),
            owner: new_owner,
            description: Arc::clone(&template.tooltip),
            actor_type: template.id.clone(),
        });

        self.handle_transition(previous_owner, was_disguised, ctx);
    }

    fn handle_transition(
        &mut self,
        previous_owner: PlayerId,
        was_disguised: bool,
        ctx: &mut TransitionContext,
    ) {
        ctx.observers.owner_changed(ApparentOwnerChanged {
            entity: ctx.entity,
            previous: previous_owner,
            current: self.effective_owner(ctx.true_owner),
        });

        if was_disguised == self.is_disguised() {
            return;
        }

        let Some(conditions) = ctx.conditions.as_deref_mut() else {
            return;
        };

        if self.is_disguised() {
            if self.condition_token.is_none() {
                if let Some(condition) = self.profile.condition.as_deref() {
                    self.condition_token = Some(conditions.grant(condition));
                }
            }
        } else if let Some(token) = self.condition_token.take() {
            conditions.revoke(token);
        }
    }

    fn effective_owner(&self, true_owner: PlayerId) -> PlayerId {
        self.apparent_owner().unwrap_or(true_owner)
    }

    /// Owner `viewer` should use for stance calculations.
    pub fn effective_owner_for(
        &self,
        true_owner: PlayerId,
        viewer: PlayerId,
        players: &PlayerRegistry,
    ) -> PlayerId {
        match self.apparent_owner() {
            Some(apparent) if !players.is_allied(true_owner, viewer) => apparent,
            _ => true_owner,
        }
    }

    pub fn tooltip_description<'a>(&'a self, base: &'a Arc<TooltipInfo>) -> &'a Arc<TooltipInfo> {
        self.apparent_description().unwrap_or(base)
    }

    pub fn radar_color(
        &self,
        true_owner: PlayerId,
        viewer: PlayerId,
        base_color: PlayerColor,
        mode: RadarColorMode,
        players: &PlayerRegistry,
        stance_colors: &StanceColors,
    ) -> PlayerColor {
        let Some(apparent) = self.apparent_owner() else {
            return base_color;
        };
        if players.is_allied(true_owner, viewer) {
            return base_color;
        }
        match mode {
            RadarColorMode::Stance if apparent == viewer => stance_colors.own,
            RadarColorMode::Stance => {
                stance_colors.for_relationship(players.relationship(viewer, apparent))
            }
            RadarColorMode::Player => players.color_of(apparent).unwrap_or(base_color),
        }
    }

    pub fn attacking(&mut self, ctx: &mut TransitionContext) {
        self.reveal_if(RevealTrigger::Attack, ctx);
    }

    /// Lining up a shot does not reveal; only the committed attack does.
    pub fn preparing_attack(&mut self) {}

    pub fn damaged(&mut self, damage: i32, ctx: &mut TransitionContext) {
        if damage > 0 {
            self.reveal_if(RevealTrigger::Damaged, ctx);
        }
    }

    pub fn unloading(&mut self, ctx: &mut TransitionContext) {
        self.reveal_if(RevealTrigger::Unload, ctx);
    }

    pub fn demolishing(&mut self, ctx: &mut TransitionContext) {
        self.reveal_if(RevealTrigger::Demolish, ctx);
    }

    pub fn infiltrating(&mut self, ctx: &mut TransitionContext) {
        self.reveal_if(RevealTrigger::Infiltrate, ctx);
    }

    fn reveal_if(&mut self, trigger: RevealTrigger, ctx: &mut TransitionContext) {
        if self.profile.reveals_on(trigger) {
            self.disguise_as_actor(None, ctx);
        }
    }
}

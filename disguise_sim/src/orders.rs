use bevy::prelude::{Entity, Resource};

use crate::{
    catalog::DisguiseProfile,
    components::Targetable,
    players::{PlayerId, Relationship},
};

pub const DISGUISE_ORDER_ID: &str = "Disguise";

/// What the player pointed at when issuing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTarget {
    Actor(Entity),
    /// Ground, a frozen actor, or nothing at all.
    Invalid,
}

/// Orders resolved by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Disguise {
        actor: Entity,
        target: Option<Entity>,
        queued: bool,
    },
}

impl Order {
    pub fn order_id(&self) -> &'static str {
        match self {
            Order::Disguise { .. } => DISGUISE_ORDER_ID,
        }
    }

    pub fn actor(&self) -> Entity {
        match *self {
            Order::Disguise { actor, .. } => actor,
        }
    }

    pub fn queued(&self) -> bool {
        match *self {
            Order::Disguise { queued, .. } => queued,
        }
    }
}

/// Targeter advertised by actors that can disguise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisguiseOrderTargeter {
    pub order_id: &'static str,
    pub priority: i32,
    pub force_attack: bool,
}

impl Default for DisguiseOrderTargeter {
    fn default() -> Self {
        Self {
            order_id: DISGUISE_ORDER_ID,
            priority: 7,
            force_attack: false,
        }
    }
}

impl DisguiseOrderTargeter {
    /// Whether `target`, standing in `relationship` to the acting player, is a
    /// valid pick. Force-attack modifiers never produce a disguise order.
    pub fn can_target_actor(
        &self,
        profile: &DisguiseProfile,
        relationship: Relationship,
        target: &Targetable,
        force_attack: bool,
    ) -> bool {
        if force_attack != self.force_attack {
            return false;
        }
        profile.valid_relationships.intersects(relationship)
            && target.overlaps(&profile.target_types)
    }
}

/// Package a target selection into an order. Only actor targets under
/// `targeter`'s own order id produce one.
pub fn issue_order(
    targeter: &DisguiseOrderTargeter,
    order_id: &str,
    actor: Entity,
    target: OrderTarget,
    queued: bool,
) -> Option<Order> {
    if order_id != targeter.order_id {
        return None;
    }
    let OrderTarget::Actor(target) = target else {
        return None;
    };
    Some(Order::Disguise {
        actor,
        target: Some(target),
        queued,
    })
}

/// Disguise target after discarding self-targets and actors that left the world.
pub fn effective_disguise_target(
    actor: Entity,
    target: Option<Entity>,
    in_world: impl Fn(Entity) -> bool,
) -> Option<Entity> {
    target.filter(|&target| target != actor && in_world(target))
}

pub fn voice_phrase_for<'a>(profile: &'a DisguiseProfile, order_id: &str) -> Option<&'a str> {
    (order_id == DISGUISE_ORDER_ID).then_some(profile.voice.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedOrder {
    pub issuer: PlayerId,
    pub order: Order,
}

/// Result of submitting an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { pending: usize },
}

/// Error that can occur when submitting orders.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("player {0} is not registered")]
    UnknownPlayer(PlayerId),
    #[error("actor {actor:?} is not owned by player {issuer}")]
    NotOwner { issuer: PlayerId, actor: Entity },
    #[error("actor {0:?} cannot disguise")]
    CannotDisguise(Entity),
    #[error("actor {actor:?} cannot disguise as {target:?}")]
    InvalidTarget { actor: Entity, target: Entity },
}

/// Orders waiting for the next tick's resolution pass.
#[derive(Resource, Debug, Clone, Default)]
pub struct OrderQueue {
    pending: Vec<QueuedOrder>,
}

impl OrderQueue {
    /// Append an order. An unqueued order replaces the actor's pending ones.
    pub fn push(&mut self, issuer: PlayerId, order: Order) -> SubmitOutcome {
        if !order.queued() {
            let actor = order.actor();
            self.pending.retain(|queued| queued.order.actor() != actor);
        }
        self.pending.push(QueuedOrder { issuer, order });
        SubmitOutcome::Accepted {
            pending: self.pending.len(),
        }
    }

    pub fn pending(&self) -> &[QueuedOrder] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return pending orders in submission order.
    pub fn drain(&mut self) -> Vec<QueuedOrder> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn actor() -> Entity {
        Entity::from_raw(1)
    }

    fn other() -> Entity {
        Entity::from_raw(2)
    }

    fn third() -> Entity {
        Entity::from_raw(3)
    }

    fn targetable(types: &[&str]) -> Targetable {
        Targetable {
            types: types.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn disguise(actor: Entity, target: Option<Entity>, queued: bool) -> Order {
        Order::Disguise {
            actor,
            target,
            queued,
        }
    }

    #[test]
    fn targeter_advertises_disguise() {
        let targeter = DisguiseOrderTargeter::default();
        assert_eq!(targeter.order_id, "Disguise");
        assert_eq!(targeter.priority, 7);
        assert!(!targeter.force_attack);
    }

    #[test]
    fn issue_order_packages_actor_target() {
        let targeter = DisguiseOrderTargeter::default();
        let order = issue_order(
            &targeter,
            "Disguise",
            actor(),
            OrderTarget::Actor(other()),
            true,
        );
        assert_eq!(order, Some(disguise(actor(), Some(other()), true)));
    }

    #[test]
    fn issue_order_rejects_foreign_order_ids() {
        let targeter = DisguiseOrderTargeter::default();
        let order = issue_order(&targeter, "Move", actor(), OrderTarget::Actor(other()), false);
        assert!(order.is_none());
    }

    #[test]
    fn issue_order_ignores_non_actor_targets() {
        let targeter = DisguiseOrderTargeter::default();
        let order = issue_order(&targeter, "Disguise", actor(), OrderTarget::Invalid, false);
        assert!(order.is_none());
    }

    #[test]
    fn effective_target_drops_self_and_absent_targets() {
        assert_eq!(
            effective_disguise_target(actor(), Some(actor()), |_| true),
            None
        );
        assert_eq!(
            effective_disguise_target(actor(), Some(other()), |_| false),
            None
        );
        assert_eq!(effective_disguise_target(actor(), None, |_| true), None);
        assert_eq!(
            effective_disguise_target(actor(), Some(other()), |_| true),
            Some(other())
        );
    }

    #[test]
    fn voice_phrase_only_for_disguise_orders() {
        let profile = DisguiseProfile {
            voice: "Move".to_string(),
            ..DisguiseProfile::default()
        };
        let order = disguise(actor(), None, false);
        assert_eq!(voice_phrase_for(&profile, order.order_id()), Some("Move"));
        assert_eq!(voice_phrase_for(&profile, "Stop"), None);
    }

    #[test]
    fn can_target_checks_types_relationships_and_modifiers() {
        let targeter = DisguiseOrderTargeter::default();
        let profile = DisguiseProfile {
            valid_relationships: Relationship::ENEMY | Relationship::NEUTRAL,
            ..DisguiseProfile::default()
        };
        let rifleman = targetable(&["Ground", "Infantry", "Disguise"]);
        let jeep = targetable(&["Ground", "Vehicle"]);

        assert!(targeter.can_target_actor(&profile, Relationship::ENEMY, &rifleman, false));
        assert!(!targeter.can_target_actor(&profile, Relationship::ALLY, &rifleman, false));
        assert!(!targeter.can_target_actor(&profile, Relationship::ENEMY, &jeep, false));
        assert!(!targeter.can_target_actor(&profile, Relationship::ENEMY, &rifleman, true));
    }

    #[test]
    fn unqueued_orders_replace_pending_ones_for_same_actor() {
        let mut queue = OrderQueue::default();
        let issuer = PlayerId(1);
        queue.push(issuer, disguise(actor(), Some(other()), false));
        queue.push(issuer, disguise(third(), Some(other()), false));
        let outcome = queue.push(issuer, disguise(actor(), None, false));
        assert_eq!(outcome, SubmitOutcome::Accepted { pending: 2 });

        let drained = queue.drain();
        assert_eq!(drained[0].order, disguise(third(), Some(other()), false));
        assert_eq!(drained[1].order, disguise(actor(), None, false));
        assert!(queue.is_empty());
    }

    #[test]
    fn queued_orders_append() {
        let mut queue = OrderQueue::default();
        for target in [Some(other()), None] {
            queue.push(PlayerId(1), disguise(actor(), target, true));
        }
        assert_eq!(queue.pending().len(), 2);
    }
}

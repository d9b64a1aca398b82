//! Notifications flowing into and out of the disguise component.

use bevy::prelude::*;

use crate::players::PlayerId;

/// An attack was committed (the shot left the weapon).
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AttackCommitted {
    pub attacker: Entity,
    pub target: Option<Entity>,
    pub weapon: String,
    pub emitter: Option<Entity>,
}

/// The attacker is lining up a shot. Never reveals a disguise.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PreparingAttack {
    pub attacker: Entity,
    pub target: Option<Entity>,
    pub weapon: String,
}

/// Damage applied to an actor. Negative values are healing.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damaged {
    pub entity: Entity,
    pub damage: i32,
    pub attacker: Option<Entity>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CargoUnloading {
    pub carrier: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demolishing {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Infiltrating {
    pub entity: Entity,
    pub target: Option<Entity>,
}

/// Emitted on every disguise transition, including swaps between two
/// disguises and no-op clears.
///
/// `previous` and `current` are effective owners: the apparent owner while
/// disguised, the true owner otherwise.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApparentOwnerChanged {
    pub entity: Entity,
    pub previous: PlayerId,
    pub current: PlayerId,
}

/// Receiver for ownership-change notifications.
pub trait OwnerChangeSink {
    fn owner_changed(&mut self, change: ApparentOwnerChanged);
}

impl OwnerChangeSink for Vec<ApparentOwnerChanged> {
    fn owner_changed(&mut self, change: ApparentOwnerChanged) {
        self.push(change);
    }
}

impl OwnerChangeSink for EventWriter<'_, ApparentOwnerChanged> {
    fn owner_changed(&mut self, change: ApparentOwnerChanged) {
        self.send(change);
    }
}

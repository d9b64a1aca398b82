//! Minimal per-actor condition manager.
//!
//! Conditions are named, reference-counted modifiers. Each grant hands back a
//! token; revoking the token drops that one reference.

use std::collections::BTreeMap;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionToken(pub u32);

/// Grant/revoke surface other components use to toggle conditions.
pub trait ConditionManager {
    fn grant(&mut self, condition: &str) -> ConditionToken;

    /// Returns `false` if the token was not held.
    fn revoke(&mut self, token: ConditionToken) -> bool;
}

#[derive(Component, Debug, Clone, Default)]
pub struct Conditions {
    granted: BTreeMap<ConditionToken, String>,
    next_token: u32,
}

impl Conditions {
    /// Number of outstanding grants for `condition`.
    pub fn count(&self, condition: &str) -> usize {
        self.granted
            .values()
            .filter(|granted| granted.as_str() == condition)
            .count()
    }

    pub fn is_active(&self, condition: &str) -> bool {
        self.count(condition) > 0
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl ConditionManager for Conditions {
    fn grant(&mut self, condition: &str) -> ConditionToken {
        let token = ConditionToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.granted.insert(token, condition.to_string());
        token
    }

    fn revoke(&mut self, token: ConditionToken) -> bool {
        self.granted.remove(&token).is_some()
    }
}

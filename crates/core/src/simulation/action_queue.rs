//! Player action queue
//!
//! Mutation requests from input code can be applied immediately through the session's
//! `*_at` methods, or submitted here to be applied at the start of the next update in
//! submission order. Applied actions are kept in a bounded history, so a run can be
//! reproduced by feeding the same actions to a session built from the same seed.

use crate::core_types::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What a queued action does; discriminants are the FFI action codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerActionType {
    /// Plant a seedling on bare or burnt ground
    PlaceSeed = 0,
    /// Pour water onto a cell
    AddWater = 1,
    /// Start a ring spread
    Ignite = 2,
    /// Trample a plant, removing durability
    Stomp = 3,
}

impl PlayerActionType {
    pub const ALL: [PlayerActionType; 4] = [
        PlayerActionType::PlaceSeed,
        PlayerActionType::AddWater,
        PlayerActionType::Ignite,
        PlayerActionType::Stomp,
    ];

    /// Decode an FFI action code
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether [`PlayerAction::amount`] is read by this action
    pub fn uses_amount(self) -> bool {
        matches!(self, PlayerActionType::AddWater | PlayerActionType::Stomp)
    }
}

/// One queued mutation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAction {
    /// Type of action
    pub action_type: PlayerActionType,
    /// Session time when the action was submitted
    pub timestamp: f32,
    /// World position the action targets
    pub position: Vec3,
    /// Water amount or stomp damage; unused by the other actions
    pub amount: f32,
}

impl PlayerAction {
    pub fn new(action_type: PlayerActionType, timestamp: f32, position: Vec3, amount: f32) -> Self {
        Self {
            action_type,
            timestamp,
            position,
            amount,
        }
    }

    pub fn place_seed(timestamp: f32, position: Vec3) -> Self {
        Self::new(PlayerActionType::PlaceSeed, timestamp, position, 0.0)
    }

    /// Water `amount` is clamp-added to the target cell
    pub fn add_water(timestamp: f32, position: Vec3, amount: f32) -> Self {
        Self::new(PlayerActionType::AddWater, timestamp, position, amount)
    }

    pub fn ignite(timestamp: f32, position: Vec3) -> Self {
        Self::new(PlayerActionType::Ignite, timestamp, position, 0.0)
    }

    pub fn stomp(timestamp: f32, position: Vec3, damage: f32) -> Self {
        Self::new(PlayerActionType::Stomp, timestamp, position, damage)
    }
}

/// History bound used by [`ActionQueue::default`]
pub const DEFAULT_HISTORY: usize = 10_000;

/// Pending actions plus a bounded record of applied ones
#[derive(Debug, Clone)]
pub struct ActionQueue {
    /// Actions waiting for the next update
    pending: Vec<PlayerAction>,
    /// Actions applied during the last update
    applied_last_update: Vec<PlayerAction>,
    /// Applied actions, oldest first
    history: VecDeque<PlayerAction>,
    /// History bound; the oldest entry is dropped first
    max_history: usize,
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

impl ActionQueue {
    /// Queue keeping at most `max_history` applied actions (0 keeps none)
    pub fn new(max_history: usize) -> Self {
        Self {
            pending: Vec::new(),
            applied_last_update: Vec::new(),
            history: VecDeque::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    /// Append to the pending list; order is preserved when applied
    pub fn submit_action(&mut self, action: PlayerAction) {
        self.pending.push(action);
    }

    pub fn pending_actions(&self) -> &[PlayerAction] {
        &self.pending
    }

    /// Actions applied by the most recent update
    pub fn applied_last_update(&self) -> &[PlayerAction] {
        &self.applied_last_update
    }

    /// Applied actions, oldest first
    pub fn history(&self) -> impl Iterator<Item = &PlayerAction> {
        self.history.iter()
    }

    /// Forget the previous update's applied actions
    pub fn begin_update(&mut self) {
        self.applied_last_update.clear();
    }

    /// Record `action` as applied this update
    pub fn record_applied(&mut self, action: PlayerAction) {
        if self.max_history > 0 {
            if self.history.len() == self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(action.clone());
        }
        self.applied_last_update.push(action);
    }

    /// Remove and return the pending actions in submission order
    pub fn take_pending(&mut self) -> Vec<PlayerAction> {
        std::mem::take(&mut self.pending)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop pending actions and all history
    pub fn clear(&mut self) {
        self.pending.clear();
        self.applied_last_update.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes() {
        for kind in PlayerActionType::ALL {
            assert_eq!(PlayerActionType::from_u8(kind.as_u8()), Some(kind));
        }
        assert_eq!(PlayerActionType::from_u8(4), None);
        assert!(PlayerActionType::Stomp.uses_amount());
        assert!(!PlayerActionType::Ignite.uses_amount());
    }

    #[test]
    fn test_pending_actions_keep_submission_order() {
        let mut queue = ActionQueue::new(100);
        queue.submit_action(PlayerAction::add_water(0.0, Vec3::new(10.0, 0.0, 20.0), 0.5));
        queue.submit_action(PlayerAction::place_seed(0.0, Vec3::zeros()));
        assert_eq!(queue.pending_actions().len(), 2);

        let pending = queue.take_pending();
        assert_eq!(pending[0].action_type, PlayerActionType::AddWater);
        assert_eq!(pending[1].action_type, PlayerActionType::PlaceSeed);
        assert!(queue.pending_actions().is_empty());
    }

    #[test]
    fn test_history_drops_oldest_first() {
        let mut queue = ActionQueue::new(5);

        for i in 0..7 {
            queue.record_applied(PlayerAction::ignite(i as f32, Vec3::new(i as f32, 0.0, 0.0)));
        }

        assert_eq!(queue.history_len(), 5);
        assert_eq!(queue.history().next().map(|a| a.timestamp), Some(2.0));
    }

    #[test]
    fn test_zero_history_keeps_nothing() {
        let mut queue = ActionQueue::new(0);
        queue.record_applied(PlayerAction::stomp(0.0, Vec3::zeros(), 0.2));
        assert_eq!(queue.history_len(), 0);
        assert_eq!(queue.applied_last_update().len(), 1);
    }

    #[test]
    fn test_update_lifecycle() {
        let mut queue = ActionQueue::new(100);
        queue.record_applied(PlayerAction::ignite(0.0, Vec3::zeros()));
        assert_eq!(queue.applied_last_update().len(), 1);

        queue.begin_update();
        assert!(queue.applied_last_update().is_empty());
        assert_eq!(queue.history_len(), 1);

        queue.clear();
        assert_eq!(queue.history_len(), 0);
    }
}

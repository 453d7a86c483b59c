//! Unit state.

use serde::{Deserialize, Serialize};

use crate::game::constants::{
    COOLDOWN_LIMIT, COOLDOWNS_PER_TURN, INDICATOR_STRING_MAX_LENGTH, MESSAGE_ROUND_DURATION,
};
use crate::game::{MapLocation, Message, Team, UnitType};

/// Unique identifier of a unit. Never reused within a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A robot or tower.
#[derive(Debug, Clone)]
pub struct Unit {
    id: UnitId,
    team: Team,
    unit_type: UnitType,
    location: Option<MapLocation>,
    health: u32,
    paint: u32,
    movement_cooldown: u32,
    action_cooldown: u32,
    execution_cost: u32,
    messages_sent: u32,
    inbox: Vec<Message>,
    single_attacked: bool,
    area_attacked: bool,
    indicator: String,
}

impl Unit {
    /// Create a dormant unit with full health and no paint.
    #[must_use]
    pub fn new(id: UnitId, team: Team, unit_type: UnitType) -> Self {
        Self {
            id,
            team,
            unit_type,
            location: None,
            health: unit_type.profile().health,
            paint: 0,
            movement_cooldown: 0,
            action_cooldown: 0,
            execution_cost: 0,
            messages_sent: 0,
            inbox: Vec::new(),
            single_attacked: false,
            area_attacked: false,
            indicator: String::new(),
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Owning team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Current type.
    #[must_use]
    pub const fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    /// Location, `None` while dormant.
    #[must_use]
    pub const fn location(&self) -> Option<MapLocation> {
        self.location
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Paint held.
    #[must_use]
    pub const fn paint(&self) -> u32 {
        self.paint
    }

    /// Movement cooldown counter.
    #[must_use]
    pub const fn movement_cooldown(&self) -> u32 {
        self.movement_cooldown
    }

    /// Action cooldown counter.
    #[must_use]
    pub const fn action_cooldown(&self) -> u32 {
        self.action_cooldown
    }

    /// Execution cost reported this round.
    #[must_use]
    pub const fn execution_cost(&self) -> u32 {
        self.execution_cost
    }

    /// Messages sent this round.
    #[must_use]
    pub const fn messages_sent(&self) -> u32 {
        self.messages_sent
    }

    /// Messages currently readable.
    #[must_use]
    pub fn inbox(&self) -> &[Message] {
        &self.inbox
    }

    /// Debug indicator string set this round.
    #[must_use]
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// Whether the unit may move now.
    #[must_use]
    pub const fn is_movement_ready(&self) -> bool {
        self.movement_cooldown < COOLDOWN_LIMIT
    }

    /// Whether the unit may take a cooldown-bound action now.
    #[must_use]
    pub const fn is_action_ready(&self) -> bool {
        self.action_cooldown < COOLDOWN_LIMIT
    }

    /// Whether this tower already made its single-target attack this round.
    #[must_use]
    pub const fn has_single_attacked(&self) -> bool {
        self.single_attacked
    }

    /// Whether this tower already made its area attack this round.
    #[must_use]
    pub const fn has_area_attacked(&self) -> bool {
        self.area_attacked
    }

    /// Paint room left before reaching capacity.
    #[must_use]
    pub const fn paint_room(&self) -> u32 {
        self.unit_type.profile().paint_capacity.saturating_sub(self.paint)
    }

    /// Paint held as a percentage of capacity.
    #[must_use]
    pub const fn paint_percent(&self) -> u32 {
        let capacity = self.unit_type.profile().paint_capacity;
        if capacity == 0 {
            return 0;
        }
        self.paint * 100 / capacity
    }

    pub(crate) fn set_location(&mut self, location: Option<MapLocation>) {
        self.location = location;
    }

    pub(crate) fn set_unit_type(&mut self, unit_type: UnitType) {
        self.unit_type = unit_type;
    }

    /// Add paint up to capacity; returns the amount actually added.
    pub(crate) fn add_paint(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.paint_room());
        self.paint += added;
        added
    }

    /// Remove paint down to zero; returns the amount actually removed.
    pub(crate) fn remove_paint(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.paint);
        self.paint -= removed;
        removed
    }

    /// Remove health down to zero; returns the damage actually dealt.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Restore health up to the type maximum; returns the amount healed.
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        let max = self.unit_type.profile().health;
        let healed = amount.min(max.saturating_sub(self.health));
        self.health += healed;
        healed
    }

    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health;
    }

    pub(crate) fn add_movement_cooldown(&mut self, amount: u32) {
        self.movement_cooldown = self.movement_cooldown.saturating_add(amount);
    }

    pub(crate) fn add_action_cooldown(&mut self, amount: u32) {
        self.action_cooldown = self.action_cooldown.saturating_add(amount);
    }

    pub(crate) fn set_execution_cost(&mut self, cost: u32) {
        self.execution_cost = cost;
    }

    pub(crate) fn mark_single_attacked(&mut self) {
        self.single_attacked = true;
    }

    pub(crate) fn mark_area_attacked(&mut self) {
        self.area_attacked = true;
    }

    pub(crate) fn count_message_sent(&mut self) {
        self.messages_sent += 1;
    }

    pub(crate) fn receive(&mut self, message: Message) {
        self.inbox.push(message);
    }

    pub(crate) fn set_indicator(&mut self, text: &str) {
        self.indicator = text.chars().take(INDICATOR_STRING_MAX_LENGTH).collect();
    }

    /// Beginning-of-round bookkeeping: cooldown decay, quota reset, message
    /// expiry and tower production.
    pub(crate) fn begin_round(&mut self, round: u32) {
        self.movement_cooldown = self.movement_cooldown.saturating_sub(COOLDOWNS_PER_TURN);
        self.action_cooldown = self.action_cooldown.saturating_sub(COOLDOWNS_PER_TURN);
        self.messages_sent = 0;
        self.execution_cost = 0;
        self.single_attacked = false;
        self.area_attacked = false;
        self.indicator.clear();
        self.inbox
            .retain(|message| round.saturating_sub(message.round) < MESSAGE_ROUND_DURATION);
        if self.unit_type.is_tower() {
            self.add_paint(self.unit_type.profile().paint_per_turn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_defaults() {
        let unit = Unit::new(UnitId(7), Team::B, UnitType::Splasher);
        assert_eq!(unit.health(), 150);
        assert_eq!(unit.paint(), 0);
        assert!(unit.location().is_none());
        assert!(unit.is_movement_ready());
        assert!(unit.is_action_ready());
    }

    #[test]
    fn test_paint_bounds() {
        let mut unit = Unit::new(UnitId(1), Team::A, UnitType::Mopper);
        assert_eq!(unit.add_paint(150), 100);
        assert_eq!(unit.paint(), 100);
        assert_eq!(unit.remove_paint(120), 100);
        assert_eq!(unit.paint(), 0);
    }

    #[test]
    fn test_damage_and_heal_bounds() {
        let mut unit = Unit::new(UnitId(1), Team::A, UnitType::Soldier);
        assert_eq!(unit.take_damage(100), 100);
        assert_eq!(unit.heal(500), 100);
        assert_eq!(unit.health(), 250);
        assert_eq!(unit.take_damage(1000), 250);
        assert_eq!(unit.health(), 0);
    }

    #[test]
    fn test_begin_round_decays_cooldowns() {
        let mut unit = Unit::new(UnitId(1), Team::A, UnitType::Soldier);
        unit.add_movement_cooldown(25);
        unit.add_action_cooldown(5);
        assert!(!unit.is_movement_ready());
        unit.begin_round(2);
        assert_eq!(unit.movement_cooldown(), 15);
        assert_eq!(unit.action_cooldown(), 0);
        unit.begin_round(3);
        assert!(unit.is_movement_ready());
    }

    #[test]
    fn test_messages_expire() {
        let mut unit = Unit::new(UnitId(1), Team::A, UnitType::LevelOnePaintTower);
        unit.receive(Message {
            content: 42,
            sender: UnitId(2),
            round: 10,
        });
        unit.begin_round(14);
        assert_eq!(unit.inbox().len(), 1);
        unit.begin_round(15);
        assert!(unit.inbox().is_empty());
    }

    #[test]
    fn test_tower_produces_paint() {
        let mut unit = Unit::new(UnitId(1), Team::A, UnitType::LevelTwoPaintTower);
        unit.begin_round(1);
        assert_eq!(unit.paint(), 10);
    }

    #[test]
    fn test_indicator_truncated() {
        let mut unit = Unit::new(UnitId(1), Team::A, UnitType::Soldier);
        unit.set_indicator(&"x".repeat(100));
        assert_eq!(unit.indicator().len(), INDICATOR_STRING_MAX_LENGTH);
    }
}

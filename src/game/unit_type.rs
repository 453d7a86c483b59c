//! Unit types and their constant profiles.

use serde::{Deserialize, Serialize};

/// Numeric profile shared by every unit of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProfile {
    /// Paint a tower spends to build this robot.
    pub paint_cost: u32,
    /// Money spent to build this unit (or to upgrade a tower to it).
    pub money_cost: u32,
    /// Paint spent per attack.
    pub attack_cost: u32,
    /// Maximum and starting health.
    pub health: u32,
    /// Tower level, `None` for robots.
    pub level: Option<u8>,
    /// Maximum paint held.
    pub paint_capacity: u32,
    /// Action cooldown added by an attack.
    pub action_cooldown: u32,
    /// Attack reach.
    pub action_radius_squared: u32,
    /// Single-target damage, if the type has one.
    pub attack_strength: Option<u32>,
    /// Area damage, if the type has one.
    pub aoe_attack_strength: Option<u32>,
    /// Paint produced into the unit's own reserve each round.
    pub paint_per_turn: u32,
    /// Money produced for the team each round.
    pub money_per_turn: u32,
}

#[allow(clippy::too_many_arguments)]
const fn robot(
    paint_cost: u32,
    money_cost: u32,
    attack_cost: u32,
    health: u32,
    paint_capacity: u32,
    action_cooldown: u32,
    action_radius_squared: u32,
    attack_strength: Option<u32>,
    aoe_attack_strength: Option<u32>,
) -> UnitProfile {
    UnitProfile {
        paint_cost,
        money_cost,
        attack_cost,
        health,
        level: None,
        paint_capacity,
        action_cooldown,
        action_radius_squared,
        attack_strength,
        aoe_attack_strength,
        paint_per_turn: 0,
        money_per_turn: 0,
    }
}

#[allow(clippy::too_many_arguments)]
const fn tower(
    money_cost: u32,
    health: u32,
    level: u8,
    action_radius_squared: u32,
    attack_strength: u32,
    aoe_attack_strength: u32,
    paint_per_turn: u32,
    money_per_turn: u32,
) -> UnitProfile {
    UnitProfile {
        paint_cost: 0,
        money_cost,
        attack_cost: 0,
        health,
        level: Some(level),
        paint_capacity: 1000,
        action_cooldown: 10,
        action_radius_squared,
        attack_strength: Some(attack_strength),
        aoe_attack_strength: Some(aoe_attack_strength),
        paint_per_turn,
        money_per_turn,
    }
}

/// The family a tower belongs to, independent of level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Produces paint.
    Paint,
    /// Produces money.
    Money,
    /// Long reach and heavy damage.
    Defense,
}

/// Every kind of unit in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    /// Paints single cells and damages towers.
    Soldier,
    /// Paints an area.
    Splasher,
    /// Removes enemy paint and drains enemy robots.
    Mopper,
    /// Paint tower, level 1.
    LevelOnePaintTower,
    /// Paint tower, level 2.
    LevelTwoPaintTower,
    /// Paint tower, level 3.
    LevelThreePaintTower,
    /// Money tower, level 1.
    LevelOneMoneyTower,
    /// Money tower, level 2.
    LevelTwoMoneyTower,
    /// Money tower, level 3.
    LevelThreeMoneyTower,
    /// Defense tower, level 1.
    LevelOneDefenseTower,
    /// Defense tower, level 2.
    LevelTwoDefenseTower,
    /// Defense tower, level 3.
    LevelThreeDefenseTower,
}

impl UnitType {
    /// Every unit type.
    pub const ALL: [UnitType; 12] = [
        UnitType::Soldier,
        UnitType::Splasher,
        UnitType::Mopper,
        UnitType::LevelOnePaintTower,
        UnitType::LevelTwoPaintTower,
        UnitType::LevelThreePaintTower,
        UnitType::LevelOneMoneyTower,
        UnitType::LevelTwoMoneyTower,
        UnitType::LevelThreeMoneyTower,
        UnitType::LevelOneDefenseTower,
        UnitType::LevelTwoDefenseTower,
        UnitType::LevelThreeDefenseTower,
    ];

    /// The constant profile of this type.
    #[must_use]
    pub const fn profile(self) -> UnitProfile {
        match self {
            UnitType::Soldier => robot(100, 250, 5, 250, 200, 10, 20, Some(20), None),
            UnitType::Splasher => robot(150, 400, 50, 150, 300, 50, 9, None, Some(50)),
            UnitType::Mopper => robot(50, 300, 0, 50, 100, 30, 2, None, None),
            UnitType::LevelOnePaintTower => tower(25, 1000, 1, 9, 20, 10, 5, 0),
            UnitType::LevelTwoPaintTower => tower(100, 1500, 2, 9, 20, 10, 10, 0),
            UnitType::LevelThreePaintTower => tower(100, 2000, 3, 9, 20, 10, 15, 0),
            UnitType::LevelOneMoneyTower => tower(25, 1000, 1, 9, 20, 10, 0, 10),
            UnitType::LevelTwoMoneyTower => tower(100, 1500, 2, 9, 20, 10, 0, 15),
            UnitType::LevelThreeMoneyTower => tower(100, 2000, 3, 9, 20, 10, 0, 20),
            UnitType::LevelOneDefenseTower => tower(25, 2500, 1, 25, 60, 30, 0, 0),
            UnitType::LevelTwoDefenseTower => tower(50, 3000, 2, 25, 65, 35, 0, 0),
            UnitType::LevelThreeDefenseTower => tower(50, 3500, 3, 25, 70, 40, 0, 0),
        }
    }

    /// Whether this is a mobile unit.
    #[must_use]
    pub const fn is_robot(self) -> bool {
        matches!(self, UnitType::Soldier | UnitType::Splasher | UnitType::Mopper)
    }

    /// Whether this is an immobile structure.
    #[must_use]
    pub const fn is_tower(self) -> bool {
        !self.is_robot()
    }

    /// Tower family, `None` for robots.
    #[must_use]
    pub const fn tower_kind(self) -> Option<TowerKind> {
        match self {
            UnitType::Soldier | UnitType::Splasher | UnitType::Mopper => None,
            UnitType::LevelOnePaintTower
            | UnitType::LevelTwoPaintTower
            | UnitType::LevelThreePaintTower => Some(TowerKind::Paint),
            UnitType::LevelOneMoneyTower
            | UnitType::LevelTwoMoneyTower
            | UnitType::LevelThreeMoneyTower => Some(TowerKind::Money),
            UnitType::LevelOneDefenseTower
            | UnitType::LevelTwoDefenseTower
            | UnitType::LevelThreeDefenseTower => Some(TowerKind::Defense),
        }
    }

    /// The level-one tower of a family.
    #[must_use]
    pub const fn level_one(kind: TowerKind) -> Self {
        match kind {
            TowerKind::Paint => UnitType::LevelOnePaintTower,
            TowerKind::Money => UnitType::LevelOneMoneyTower,
            TowerKind::Defense => UnitType::LevelOneDefenseTower,
        }
    }

    /// Whether this is a level-one tower.
    #[must_use]
    pub const fn is_level_one_tower(self) -> bool {
        matches!(self.profile().level, Some(1))
    }

    /// Whether this tower can be upgraded further.
    #[must_use]
    pub const fn can_upgrade(self) -> bool {
        matches!(self.profile().level, Some(1 | 2))
    }

    /// The next tower level, if any.
    #[must_use]
    pub const fn next_level(self) -> Option<Self> {
        match self {
            UnitType::LevelOnePaintTower => Some(UnitType::LevelTwoPaintTower),
            UnitType::LevelTwoPaintTower => Some(UnitType::LevelThreePaintTower),
            UnitType::LevelOneMoneyTower => Some(UnitType::LevelTwoMoneyTower),
            UnitType::LevelTwoMoneyTower => Some(UnitType::LevelThreeMoneyTower),
            UnitType::LevelOneDefenseTower => Some(UnitType::LevelTwoDefenseTower),
            UnitType::LevelTwoDefenseTower => Some(UnitType::LevelThreeDefenseTower),
            _ => None,
        }
    }
}

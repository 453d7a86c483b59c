//! The seam between the engine and whatever decides what units do.

use crate::error::ActionError;
use crate::game::constants::VISION_RADIUS_SQUARED;
use crate::game::{
    Action, Direction, MapLocation, Message, Paint, PaintColor, PaintType, Symmetry, Team, Unit,
    UnitId, UnitType, World,
};

/// Debug annotation attached to a unit's turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indicator {
    /// Free text, truncated to 64 characters.
    String(String),
    /// A colored dot on a cell.
    Dot {
        /// Cell.
        location: MapLocation,
        /// RGB.
        color: [u8; 3],
    },
    /// A colored line between two cells.
    Line {
        /// Start.
        from: MapLocation,
        /// End.
        to: MapLocation,
        /// RGB.
        color: [u8; 3],
    },
}

/// What a unit chose to do this round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decision {
    /// Actions to attempt in order. Rejected ones are skipped.
    pub actions: Vec<Action>,
    /// Debug annotations.
    pub indicators: Vec<Indicator>,
    /// Execution cost the decision step used.
    pub execution_cost: u32,
    /// The decision step failed; the unit is destroyed and its actions are
    /// not applied.
    pub terminated: bool,
}

impl Decision {
    /// Do nothing.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// A single action.
    #[must_use]
    pub fn action(action: Action) -> Self {
        Self {
            actions: vec![action],
            ..Self::default()
        }
    }

    /// Append another action.
    #[must_use]
    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Attach an annotation.
    #[must_use]
    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// Report execution cost.
    #[must_use]
    pub const fn with_cost(mut self, cost: u32) -> Self {
        self.execution_cost = cost;
        self
    }

    /// Abnormal termination of the decision step.
    #[must_use]
    pub fn terminated() -> Self {
        Self {
            terminated: true,
            ..Self::default()
        }
    }
}

/// Read-only view of the world from one unit's position.
///
/// Sensing is limited to the vision radius; `can_*` queries answer exactly
/// what [`World::validate`] would.
#[derive(Debug, Clone, Copy)]
pub struct UnitView<'w> {
    world: &'w World,
    unit: &'w Unit,
    location: MapLocation,
}

impl<'w> UnitView<'w> {
    /// View for a placed unit, `None` if it does not exist or is dormant.
    #[must_use]
    pub fn new(world: &'w World, id: UnitId) -> Option<Self> {
        let unit = world.unit(id).ok()?;
        let location = unit.location()?;
        Some(Self {
            world,
            unit,
            location,
        })
    }

    /// The unit itself.
    #[must_use]
    pub const fn unit(&self) -> &'w Unit {
        self.unit
    }

    /// Unit id.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.unit.id()
    }

    /// Unit team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.unit.team()
    }

    /// Unit type.
    #[must_use]
    pub const fn unit_type(&self) -> UnitType {
        self.unit.unit_type()
    }

    /// Current location.
    #[must_use]
    pub const fn location(&self) -> MapLocation {
        self.location
    }

    /// Current round.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.world.round()
    }

    /// Map width.
    #[must_use]
    pub const fn map_width(&self) -> i32 {
        self.world.grid().width()
    }

    /// Map height.
    #[must_use]
    pub const fn map_height(&self) -> i32 {
        self.world.grid().height()
    }

    /// Team money.
    #[must_use]
    pub fn money(&self) -> u32 {
        self.world.ledger().money(self.team())
    }

    /// Number of towers the team owns.
    #[must_use]
    pub fn tower_count(&self) -> u32 {
        self.world.ledger().tower_count(self.team())
    }

    /// Messages still readable.
    #[must_use]
    pub fn messages(&self) -> &'w [Message] {
        self.unit.inbox()
    }

    /// One slot of the team's shared array.
    #[must_use]
    pub fn read_shared_array(&self, index: usize) -> Option<u16> {
        self.world.ledger().read_shared(self.team(), index)
    }

    /// Whether the unit can see `loc`.
    #[must_use]
    pub fn can_sense(&self, loc: MapLocation) -> bool {
        self.world.grid().on_map(loc)
            && self.location.is_within_distance_squared(loc, VISION_RADIUS_SQUARED)
    }

    /// Paint at a visible cell, relative to this unit's team.
    #[must_use]
    pub fn sense_paint(&self, loc: MapLocation) -> Option<PaintType> {
        self.can_sense(loc)
            .then(|| self.world.grid().paint(loc).relative_to(self.team()))
    }

    /// Raw paint at a visible cell.
    #[must_use]
    pub fn sense_raw_paint(&self, loc: MapLocation) -> Option<Paint> {
        self.can_sense(loc).then(|| self.world.grid().paint(loc))
    }

    /// Whether a visible cell can be entered by a robot.
    #[must_use]
    pub fn sense_passable(&self, loc: MapLocation) -> Option<bool> {
        self.can_sense(loc).then(|| self.world.grid().is_passable(loc))
    }

    /// Whether a visible cell is a ruin.
    #[must_use]
    pub fn sense_ruin(&self, loc: MapLocation) -> Option<bool> {
        self.can_sense(loc).then(|| self.world.grid().is_ruin(loc))
    }

    /// This team's marker at a visible cell.
    #[must_use]
    pub fn sense_marker(&self, loc: MapLocation) -> Option<PaintColor> {
        if !self.can_sense(loc) {
            return None;
        }
        self.world.grid().marker(loc, self.team())
    }

    /// Unit standing at a visible cell.
    #[must_use]
    pub fn sense_unit_at(&self, loc: MapLocation) -> Option<&'w Unit> {
        if !self.can_sense(loc) {
            return None;
        }
        self.world.unit_at(loc)
    }

    /// Units within `radius_squared` (capped at the vision radius), in
    /// x-major order, excluding this unit.
    #[must_use]
    pub fn sense_nearby_units(&self, radius_squared: u32) -> Vec<&'w Unit> {
        let radius_squared = radius_squared.min(VISION_RADIUS_SQUARED);
        self.world
            .grid()
            .locations_within_radius_squared(self.location, radius_squared)
            .into_iter()
            .filter(|&loc| loc != self.location)
            .filter_map(|loc| self.world.unit_at(loc))
            .collect()
    }

    /// Visible cells within `radius_squared`.
    #[must_use]
    pub fn nearby_locations(&self, radius_squared: u32) -> Vec<MapLocation> {
        self.world.grid().locations_within_radius_squared(
            self.location,
            radius_squared.min(VISION_RADIUS_SQUARED),
        )
    }

    /// Full check of an action.
    ///
    /// # Errors
    ///
    /// Returns the reason the action would be rejected.
    pub fn validate(&self, action: &Action) -> Result<(), ActionError> {
        self.world.validate(self.id(), action)
    }

    /// Whether an action would be accepted.
    #[must_use]
    pub fn can(&self, action: &Action) -> bool {
        self.world.can(self.id(), action)
    }

    /// Whether the unit may move at all this round.
    #[must_use]
    pub const fn is_movement_ready(&self) -> bool {
        self.unit.is_movement_ready()
    }

    /// Whether the unit may take a cooldown-bound action.
    #[must_use]
    pub const fn is_action_ready(&self) -> bool {
        self.unit.is_action_ready()
    }

    /// See [`Action::Move`].
    #[must_use]
    pub fn can_move(&self, dir: Direction) -> bool {
        self.can(&Action::Move(dir))
    }

    /// See [`Action::BuildRobot`].
    #[must_use]
    pub fn can_build_robot(&self, unit_type: UnitType, location: MapLocation) -> bool {
        self.can(&Action::BuildRobot {
            unit_type,
            location,
        })
    }

    /// See [`Action::Mark`].
    #[must_use]
    pub fn can_mark(&self, location: MapLocation) -> bool {
        self.can(&Action::Mark {
            location,
            color: PaintColor::Primary,
        })
    }

    /// See [`Action::RemoveMark`].
    #[must_use]
    pub fn can_remove_mark(&self, location: MapLocation) -> bool {
        self.can(&Action::RemoveMark { location })
    }

    /// See [`Action::MarkTowerPattern`].
    #[must_use]
    pub fn can_mark_tower_pattern(&self, unit_type: UnitType, location: MapLocation) -> bool {
        self.can(&Action::MarkTowerPattern {
            unit_type,
            location,
            symmetry: Symmetry::Identity,
        })
    }

    /// See [`Action::MarkResourcePattern`].
    #[must_use]
    pub fn can_mark_resource_pattern(&self, location: MapLocation) -> bool {
        self.can(&Action::MarkResourcePattern {
            location,
            symmetry: Symmetry::Identity,
        })
    }

    /// See [`Action::CompleteTowerPattern`].
    #[must_use]
    pub fn can_complete_tower_pattern(&self, unit_type: UnitType, location: MapLocation) -> bool {
        self.can(&Action::CompleteTowerPattern {
            unit_type,
            location,
        })
    }

    /// See [`Action::CompleteResourcePattern`].
    #[must_use]
    pub fn can_complete_resource_pattern(&self, location: MapLocation) -> bool {
        self.can(&Action::CompleteResourcePattern { location })
    }

    /// See [`Action::UpgradeTower`].
    #[must_use]
    pub fn can_upgrade_tower(&self, location: MapLocation) -> bool {
        self.can(&Action::UpgradeTower { location })
    }

    /// See [`Action::Attack`]; `None` asks about a tower's area attack.
    #[must_use]
    pub fn can_attack(&self, target: Option<MapLocation>) -> bool {
        self.can(&Action::Attack {
            target,
            color: PaintColor::Primary,
        })
    }

    /// See [`Action::MopSwing`].
    #[must_use]
    pub fn can_mop_swing(&self, dir: Direction) -> bool {
        self.can(&Action::MopSwing(dir))
    }

    /// See [`Action::Heal`].
    #[must_use]
    pub fn can_heal(&self, location: MapLocation) -> bool {
        self.can(&Action::Heal { location })
    }

    /// See [`Action::TransferPaint`].
    #[must_use]
    pub fn can_transfer_paint(&self, location: MapLocation, amount: i32) -> bool {
        self.can(&Action::TransferPaint { location, amount })
    }

    /// See [`Action::SendMessage`].
    #[must_use]
    pub fn can_send_message(&self, location: MapLocation) -> bool {
        self.can(&Action::SendMessage {
            location,
            content: 0,
        })
    }

    /// See [`Action::WriteSharedArray`].
    #[must_use]
    pub fn can_write_shared_array(&self, index: usize, value: i32) -> bool {
        self.can(&Action::WriteSharedArray { index, value })
    }
}

/// Supplies a decision for each unit turn.
pub trait DecisionProvider {
    /// Decide what the viewed unit does this round.
    fn step_unit(&mut self, view: &UnitView<'_>) -> Decision;

    /// A unit was removed from the match.
    fn unit_destroyed(&mut self, _id: UnitId) {}
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for &mut P {
    fn step_unit(&mut self, view: &UnitView<'_>) -> Decision {
        (**self).step_unit(view)
    }

    fn unit_destroyed(&mut self, id: UnitId) {
        (**self).unit_destroyed(id);
    }
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn step_unit(&mut self, view: &UnitView<'_>) -> Decision {
        (**self).step_unit(view)
    }

    fn unit_destroyed(&mut self, id: UnitId) {
        (**self).unit_destroyed(id);
    }
}

/// One provider per team.
#[derive(Debug, Clone, Default)]
pub struct TeamProviders<A, B> {
    /// Decides for team A.
    pub team_a: A,
    /// Decides for team B.
    pub team_b: B,
}

impl<A, B> TeamProviders<A, B> {
    /// Pair two providers.
    pub const fn new(team_a: A, team_b: B) -> Self {
        Self { team_a, team_b }
    }
}

impl<A: DecisionProvider, B: DecisionProvider> DecisionProvider for TeamProviders<A, B> {
    fn step_unit(&mut self, view: &UnitView<'_>) -> Decision {
        match view.team() {
            Team::A => self.team_a.step_unit(view),
            Team::B => self.team_b.step_unit(view),
        }
    }

    fn unit_destroyed(&mut self, id: UnitId) {
        self.team_a.unit_destroyed(id);
        self.team_b.unit_destroyed(id);
    }
}

/// Provider backed by a closure.
pub struct FnProvider<F>(pub F);

impl<F> std::fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnProvider")
    }
}

impl<F: FnMut(&UnitView<'_>) -> Decision> DecisionProvider for FnProvider<F> {
    fn step_unit(&mut self, view: &UnitView<'_>) -> Decision {
        (self.0)(view)
    }
}

/// Never acts.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleProvider;

impl DecisionProvider for IdleProvider {
    fn step_unit(&mut self, _view: &UnitView<'_>) -> Decision {
        Decision::idle()
    }
}

/// Fixed reference behavior for smoke tests and benchmarks.
///
/// Towers attack any enemy in reach, then build a soldier or splasher on
/// the first free adjacent cell. Robots refill from a nearby allied tower
/// when low, paint the cell they stand on, and wander in a direction that
/// rotates with their id and the round.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoamingPainter;

impl RoamingPainter {
    fn tower_turn(view: &UnitView<'_>) -> Decision {
        let mut decision = Decision::idle().with_cost(100);
        let enemy_near = view
            .sense_nearby_units(25)
            .iter()
            .any(|u| u.team() != view.team());
        if enemy_near && view.can_attack(None) {
            decision = decision.then(Action::Attack {
                target: None,
                color: PaintColor::Primary,
            });
        }
        let robot = if view.round() % 3 == 0 {
            UnitType::Splasher
        } else {
            UnitType::Soldier
        };
        if let Some(spot) = Direction::ALL
            .into_iter()
            .map(|dir| view.location().add(dir))
            .find(|&loc| view.can_build_robot(robot, loc))
        {
            decision = decision.then(Action::BuildRobot {
                unit_type: robot,
                location: spot,
            });
        }
        decision
    }

    fn robot_turn(view: &UnitView<'_>) -> Decision {
        let mut decision = Decision::idle().with_cost(250);
        let here = view.location();

        if view.unit().paint_percent() < 25 {
            let refill = view
                .sense_nearby_units(2)
                .into_iter()
                .filter(|u| u.team() == view.team() && u.unit_type().is_tower())
                .find_map(|tower| {
                    let location = tower.location()?;
                    let amount = -i32::try_from(tower.paint().min(view.unit().paint_room())).ok()?;
                    view.can_transfer_paint(location, amount)
                        .then_some(Action::TransferPaint { location, amount })
                });
            if let Some(action) = refill {
                decision = decision.then(action);
            }
        }

        let unpainted = !matches!(
            view.sense_paint(here),
            Some(PaintType::AllyPrimary | PaintType::AllySecondary)
        );
        if unpainted && view.can_attack(Some(here)) {
            decision = decision.then(Action::Attack {
                target: Some(here),
                color: PaintColor::Primary,
            });
        }

        let start = view.id().0.wrapping_add(view.round() / 8);
        if let Some(dir) = (0..8)
            .map(|step| Direction::ALL[((start + step) % 8) as usize])
            .find(|&dir| view.can_move(dir))
        {
            decision = decision.then(Action::Move(dir));
        }
        decision
    }
}

impl DecisionProvider for RoamingPainter {
    fn step_unit(&mut self, view: &UnitView<'_>) -> Decision {
        if view.unit_type().is_tower() {
            Self::tower_turn(view)
        } else {
            Self::robot_turn(view)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MapBuilder;

    fn world() -> World {
        let spec = MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
            .build();
        let mut world = World::new(&spec).unwrap();
        world.begin_round().unwrap();
        world
    }

    #[test]
    fn test_view_sensing_is_limited() {
        let world = world();
        let id = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        let view = UnitView::new(&world, id).unwrap();
        assert!(view.can_sense(MapLocation::new(7, 5)));
        assert!(!view.can_sense(MapLocation::new(8, 3)));
        assert_eq!(view.sense_paint(MapLocation::new(4, 4)), Some(PaintType::Empty));
        assert_eq!(view.sense_paint(MapLocation::new(16, 16)), None);
        assert!(view.sense_unit_at(MapLocation::new(16, 16)).is_none());
        assert!(view.sense_nearby_units(100).is_empty());
        assert_eq!(view.money(), 400);
    }

    #[test]
    fn test_view_queries_match_world() {
        let world = world();
        let id = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        let view = UnitView::new(&world, id).unwrap();
        let spot = MapLocation::new(4, 4);
        assert!(view.can_build_robot(UnitType::Soldier, spot));
        assert_eq!(
            view.can_build_robot(UnitType::Soldier, spot),
            world.can(id, &Action::BuildRobot {
                unit_type: UnitType::Soldier,
                location: spot
            })
        );
        assert!(!view.can_move(Direction::North));
        assert!(UnitView::new(&world, UnitId(77)).is_none());
    }

    #[test]
    fn test_team_providers_dispatch() {
        let world = world();
        let a = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        let b = world.grid().occupant(MapLocation::new(16, 16)).unwrap();
        let mut providers = TeamProviders::new(
            FnProvider(|_: &UnitView<'_>| Decision::action(Action::Resign)),
            IdleProvider,
        );
        let view_a = UnitView::new(&world, a).unwrap();
        let view_b = UnitView::new(&world, b).unwrap();
        assert_eq!(providers.step_unit(&view_a).actions, vec![Action::Resign]);
        assert!(providers.step_unit(&view_b).actions.is_empty());
    }

    #[test]
    fn test_roaming_painter_builds_from_towers() {
        let world = world();
        let id = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        let view = UnitView::new(&world, id).unwrap();
        let decision = RoamingPainter.step_unit(&view);
        assert!(
            decision
                .actions
                .iter()
                .any(|a| matches!(a, Action::BuildRobot { .. }))
        );
        assert!(!decision.terminated);
    }

    #[test]
    fn test_decision_builders() {
        let decision = Decision::action(Action::Resign)
            .then(Action::Move(Direction::East))
            .with_cost(7)
            .with_indicator(Indicator::String("hi".into()));
        assert_eq!(decision.actions.len(), 2);
        assert_eq!(decision.execution_cost, 7);
        assert!(Decision::terminated().terminated);
    }
}

//! Target selection over the live enemy set.
//!
//! Every query skips ships that are destroyed or have no health left.

use armada_core::math::Vec2;
use smallvec::SmallVec;

use crate::ship::{Faction, Ship, ShipId};

/// Default lock-on range
pub const DEFAULT_TARGETING_RANGE: f32 = 800.0;

/// Commands from the targeting collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCommand {
    Nearest,
    Weakest,
    Cycle,
    Clear,
}

/// Closest live ship strictly within `max_range`
pub fn find_nearest(ships: &[Ship], position: Vec2, max_range: f32) -> Option<&Ship> {
    ships
        .iter()
        .filter(|ship| ship.is_targetable())
        .map(|ship| (ship, ship.position().distance(position)))
        .filter(|(_, distance)| *distance < max_range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(ship, _)| ship)
}

/// Live ship with the lowest health fraction within `max_range`
pub fn find_weakest(ships: &[Ship], position: Vec2, max_range: f32) -> Option<&Ship> {
    ships
        .iter()
        .filter(|ship| ship.is_targetable())
        .filter(|ship| ship.position().distance(position) <= max_range)
        .min_by(|a, b| a.health_fraction().total_cmp(&b.health_fraction()))
}

/// Live ships within `radius`
pub fn find_in_radius(ships: &[Ship], position: Vec2, radius: f32) -> SmallVec<[&Ship; 8]> {
    ships
        .iter()
        .filter(|ship| ship.is_targetable())
        .filter(|ship| ship.position().distance(position) <= radius)
        .collect()
}

/// Ships ordered by distance from `position`, nearest first
pub fn sort_by_distance(ships: &[Ship], position: Vec2) -> Vec<&Ship> {
    let mut sorted: Vec<&Ship> = ships.iter().collect();
    sorted.sort_by(|a, b| {
        a.position()
            .distance_squared(position)
            .total_cmp(&b.position().distance_squared(position))
    });
    sorted
}

/// Ships flying for `faction`
pub fn filter_by_faction(ships: &[Ship], faction: Faction) -> impl Iterator<Item = &Ship> {
    ships.iter().filter(move |ship| ship.faction == faction)
}

/// Next live ship after `current`, wrapping around. Starts from the first
/// live ship when there is no current target or it is gone.
pub fn cycle_target(ships: &[Ship], current: Option<ShipId>) -> Option<ShipId> {
    let alive: SmallVec<[ShipId; 16]> = ships
        .iter()
        .filter(|ship| ship.is_targetable())
        .map(|ship| ship.id)
        .collect();

    if alive.is_empty() {
        return None;
    }

    let next = current
        .and_then(|id| alive.iter().position(|candidate| *candidate == id))
        .map_or(0, |index| (index + 1) % alive.len());
    Some(alive[next])
}

/// Look up a ship by id
pub fn find_by_id(ships: &[Ship], id: ShipId) -> Option<&Ship> {
    ships.iter().find(|ship| ship.id == id)
}

/// Mutable lookup by id
pub fn find_by_id_mut(ships: &mut [Ship], id: ShipId) -> Option<&mut Ship> {
    ships.iter_mut().find(|ship| ship.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::ShipClass;

    fn fleet() -> Vec<Ship> {
        vec![
            Ship::new(ShipId(1), ShipClass::Fighter, Vec2::new(300.0, 0.0)),
            Ship::new(ShipId(2), ShipClass::Heavy, Vec2::new(100.0, 0.0)).with_faction(Faction::Voinian),
            Ship::new(ShipId(3), ShipClass::Fighter, Vec2::new(900.0, 0.0)),
            Ship::new(ShipId(4), ShipClass::Boss, Vec2::new(-200.0, 0.0)),
        ]
    }

    fn destroy(ships: &mut [Ship], id: ShipId) {
        let ship = find_by_id_mut(ships, id).unwrap();
        ship.pools.armor = 0.0;
        ship.pools.shield = 0.0;
        ship.pools.destroyed = true;
    }

    #[test]
    fn test_find_nearest() {
        let mut ships = fleet();
        assert_eq!(find_nearest(&ships, Vec2::ZERO, DEFAULT_TARGETING_RANGE).unwrap().id, ShipId(2));

        destroy(&mut ships, ShipId(2));
        assert_eq!(find_nearest(&ships, Vec2::ZERO, DEFAULT_TARGETING_RANGE).unwrap().id, ShipId(4));

        assert!(find_nearest(&ships, Vec2::new(5000.0, 0.0), DEFAULT_TARGETING_RANGE).is_none());
    }

    #[test]
    fn test_find_weakest() {
        let mut ships = fleet();
        find_by_id_mut(&mut ships, ShipId(1)).unwrap().pools.shield = 0.0;
        // Ship 3 is weaker still but out of range
        let far = find_by_id_mut(&mut ships, ShipId(3)).unwrap();
        far.pools.shield = 0.0;
        far.pools.armor = 1.0;

        assert_eq!(find_weakest(&ships, Vec2::ZERO, DEFAULT_TARGETING_RANGE).unwrap().id, ShipId(1));
        assert_eq!(find_weakest(&ships, Vec2::ZERO, 2000.0).unwrap().id, ShipId(3));
    }

    #[test]
    fn test_find_in_radius_and_sort() {
        let ships = fleet();
        let near = find_in_radius(&ships, Vec2::ZERO, 300.0);
        assert_eq!(near.len(), 3);

        let order: Vec<ShipId> = sort_by_distance(&ships, Vec2::ZERO).iter().map(|s| s.id).collect();
        assert_eq!(order, vec![ShipId(2), ShipId(4), ShipId(1), ShipId(3)]);
    }

    #[test]
    fn test_filter_by_faction() {
        let ships = fleet();
        let voinian: Vec<ShipId> = filter_by_faction(&ships, Faction::Voinian).map(|s| s.id).collect();
        assert_eq!(voinian, vec![ShipId(2)]);
    }

    #[test]
    fn test_cycle_target_wraps_and_skips_dead() {
        let mut ships = fleet();
        assert_eq!(cycle_target(&ships, None), Some(ShipId(1)));
        assert_eq!(cycle_target(&ships, Some(ShipId(1))), Some(ShipId(2)));
        assert_eq!(cycle_target(&ships, Some(ShipId(4))), Some(ShipId(1)));

        destroy(&mut ships, ShipId(2));
        assert_eq!(cycle_target(&ships, Some(ShipId(1))), Some(ShipId(3)));
        // Current target gone: restart from the first live ship
        assert_eq!(cycle_target(&ships, Some(ShipId(2))), Some(ShipId(1)));

        assert_eq!(cycle_target(&[], Some(ShipId(1))), None);
    }
}

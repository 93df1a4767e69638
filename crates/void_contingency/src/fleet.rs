//! Fleet registry
//!
//! Ships live in a generational arena keyed by [`ShipId`]. A despawned
//! ship's id never resolves again, even after its slot is reused.

use crate::ship::Ship;
use rayon::prelude::*;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational handle to a ship in a [`Fleet`]
    pub struct ShipId;
}

/// Totals of one fleet-wide tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetTick {
    /// Ships updated
    pub ships: usize,
    /// Components that ran
    pub components_updated: usize,
    /// Components skipped, e.g. because they were never attached
    pub components_skipped: usize,
}

impl FleetTick {
    fn merge(self, other: Self) -> Self {
        Self {
            ships: self.ships + other.ships,
            components_updated: self.components_updated + other.components_updated,
            components_skipped: self.components_skipped + other.components_skipped,
        }
    }

    fn of_ship(ship: &mut Ship, delta_time: f32) -> Self {
        let report = ship.update(delta_time);
        let updated = report.updated_count();
        Self {
            ships: 1,
            components_updated: updated,
            components_skipped: report.outcomes().len() - updated,
        }
    }
}

/// Arena of ships
#[derive(Debug, Default)]
pub struct Fleet {
    ships: SlotMap<ShipId, Ship>,
}

impl Fleet {
    /// Create an empty fleet
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `ship` and return its handle
    pub fn spawn(&mut self, ship: Ship) -> ShipId {
        let id = self.ships.insert(ship);
        log::debug!("Spawned {} as {:?}", self.ships[id].name(), id);
        id
    }

    /// Remove a ship, handing it back to the caller
    pub fn despawn(&mut self, id: ShipId) -> Option<Ship> {
        self.ships.remove(id)
    }

    /// Ship behind `id`, if it is still alive
    pub fn get(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id)
    }

    /// Mutable ship behind `id`, if it is still alive
    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(id)
    }

    /// Whether `id` still resolves
    pub fn contains(&self, id: ShipId) -> bool {
        self.ships.contains_key(id)
    }

    /// All ships with their handles
    pub fn iter(&self) -> impl Iterator<Item = (ShipId, &Ship)> + '_ {
        self.ships.iter()
    }

    /// All ships, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ShipId, &mut Ship)> + '_ {
        self.ships.iter_mut()
    }

    /// Number of ships
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// True when the fleet has no ships
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Tick every ship on the calling thread
    pub fn update(&mut self, delta_time: f32) -> FleetTick {
        self.ships
            .values_mut()
            .map(|ship| FleetTick::of_ship(ship, delta_time))
            .fold(FleetTick::default(), FleetTick::merge)
    }

    /// Tick ships across the rayon thread pool.
    ///
    /// Ships share no state, so the result matches [`Self::update`].
    pub fn update_parallel(&mut self, delta_time: f32) -> FleetTick {
        let ships: Vec<&mut Ship> = self.ships.values_mut().collect();
        ships
            .into_par_iter()
            .map(|ship| FleetTick::of_ship(ship, delta_time))
            .reduce(FleetTick::default, FleetTick::merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::components::EngineComponent;
    use crate::ship::ShipBlueprint;
    use approx::assert_relative_eq;

    fn thrusting_ship(name: &str, heading: f32) -> Ship {
        let mut ship = Ship::new(name);
        let mut engine = EngineComponent::new();
        engine.set_thrust(100.0);
        ship.install(engine);
        ship.set_rotation(heading);
        ship
    }

    #[test]
    fn test_stale_ids_do_not_resolve() {
        let mut fleet = Fleet::new();
        let first = fleet.spawn(Ship::new("Alpha"));
        assert_eq!(fleet.despawn(first).unwrap().name(), "Alpha");

        let second = fleet.spawn(Ship::new("Beta"));
        assert!(fleet.get(first).is_none());
        assert!(!fleet.contains(first));
        assert_eq!(fleet.get(second).unwrap().name(), "Beta");
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn test_update_counts_components() {
        let mut fleet = Fleet::new();
        fleet.spawn(ShipBlueprint::default().build());
        let mut idle = Ship::new("Idle");
        idle.add_component(EngineComponent::new());
        fleet.spawn(idle);

        let tick = fleet.update(0.1);
        assert_eq!(tick.ships, 2);
        assert_eq!(tick.components_updated, 2);
        assert_eq!(tick.components_skipped, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut sequential = Fleet::new();
        let mut parallel = Fleet::new();
        let mut pairs = Vec::new();
        for i in 0..32 {
            let heading = i as f32 * 11.25;
            let a = sequential.spawn(thrusting_ship("S", heading));
            let b = parallel.spawn(thrusting_ship("P", heading));
            pairs.push((a, b));
        }

        for _ in 0..10 {
            let a = sequential.update(0.05);
            let b = parallel.update_parallel(0.05);
            assert_eq!(a, b);
        }

        for (a, b) in pairs {
            let a = sequential.get(a).unwrap();
            let b = parallel.get(b).unwrap();
            assert_relative_eq!(a.position(), b.position());
            assert_relative_eq!(a.velocity(), b.velocity());
        }
    }
}

//! Per-tick carcass calls between cooperators.
//!
//! The channel is owned by the orchestrator, cleared at the start of every
//! tick, and refilled with the calls of agents still waiting for help. A
//! call reaches every cooperator within earshot for that tick only.

use std::collections::{BTreeMap, BTreeSet};

use hominids_types::{CarcassId, Position};
use hominids_world::Grid;

/// Carcasses announced during the current tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunicationChannel {
    calls: BTreeMap<CarcassId, Position>,
}

impl CommunicationChannel {
    /// Create an empty channel.
    pub const fn new() -> Self {
        Self {
            calls: BTreeMap::new(),
        }
    }

    /// Announce carcass `id` lying at `position`. Returns `false` if it was
    /// already announced this tick.
    pub fn publish(&mut self, id: CarcassId, position: Position) -> bool {
        self.calls.insert(id, position).is_none()
    }

    /// The nearest announced carcass within Manhattan `earshot` of `from`
    /// that is not in `ignored`, ties broken by id.
    ///
    /// Agents that do not cooperate never hear calls.
    pub fn query(
        &self,
        grid: &Grid,
        from: Position,
        cooperates: bool,
        earshot: u32,
        ignored: &BTreeSet<CarcassId>,
    ) -> Option<(CarcassId, Position)> {
        if !cooperates {
            return None;
        }
        self.calls
            .iter()
            .filter(|(id, _)| !ignored.contains(id))
            .filter_map(|(id, at)| {
                let distance = grid.manhattan_distance(from, *at);
                (distance <= earshot).then_some((distance, *id, *at))
            })
            .min_by_key(|(distance, id, _)| (*distance, *id))
            .map(|(_, id, at)| (id, at))
    }

    /// Drop every call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of calls this tick.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether nobody called this tick.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hominids_types::{PlantSpeciesId, Zone};
    use hominids_world::{Landscape, PlantCatalog, PlantSpecies};

    use super::*;

    fn grid() -> Grid {
        let landscape = Landscape::uniform("test", 30, 30, Zone::Flooded).unwrap();
        let catalog =
            PlantCatalog::new("test", vec![PlantSpecies::new(PlantSpeciesId(1), "fig")], 0.0)
                .unwrap();
        Grid::new(&landscape, &catalog, 0.0).unwrap()
    }

    #[test]
    fn publish_is_idempotent() {
        let mut channel = CommunicationChannel::new();
        assert!(channel.publish(CarcassId(1), Position::new(0, 0)));
        assert!(!channel.publish(CarcassId(1), Position::new(0, 0)));
        assert_eq!(channel.len(), 1);
        channel.clear();
        assert!(channel.is_empty());
    }

    #[test]
    fn query_respects_earshot_across_the_seam() {
        let g = grid();
        let mut channel = CommunicationChannel::new();
        channel.publish(CarcassId(7), Position::new(27, 0));
        let none = BTreeSet::new();

        let heard = channel.query(&g, Position::new(2, 0), true, 5, &none);
        assert_eq!(heard, Some((CarcassId(7), Position::new(27, 0))));
        assert_eq!(channel.query(&g, Position::new(2, 0), true, 4, &none), None);
    }

    #[test]
    fn query_prefers_nearest_then_lowest_id() {
        let g = grid();
        let mut channel = CommunicationChannel::new();
        channel.publish(CarcassId(3), Position::new(4, 0));
        channel.publish(CarcassId(9), Position::new(0, 2));
        channel.publish(CarcassId(5), Position::new(2, 0));
        let none = BTreeSet::new();
        let heard = channel.query(&g, Position::new(0, 0), true, 10, &none);
        assert_eq!(heard.map(|(id, _)| id), Some(CarcassId(5)));
    }

    #[test]
    fn ignored_and_non_cooperators_hear_nothing() {
        let g = grid();
        let mut channel = CommunicationChannel::new();
        channel.publish(CarcassId(1), Position::new(1, 1));
        let ignored: BTreeSet<CarcassId> = [CarcassId(1)].into_iter().collect();
        assert_eq!(channel.query(&g, Position::new(0, 0), true, 10, &ignored), None);
        assert_eq!(
            channel.query(&g, Position::new(0, 0), false, 10, &BTreeSet::new()),
            None
        );
    }
}

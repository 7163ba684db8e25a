//! Live index of which agents stand on which cell.
//!
//! Rebuilt by the orchestrator at the start of every tick and updated in
//! place whenever an agent moves, so later agents in the same tick see
//! earlier agents' new positions.

use std::collections::BTreeMap;

use hominids_types::{AgentId, HominidSpecies, Position};

/// The facts about an agent that co-location queries need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    /// The agent.
    pub id: AgentId,
    /// Its species.
    pub species: HominidSpecies,
    /// Whether it cooperates on carcasses.
    pub cooperates: bool,
}

/// Agents per cell, each cell's list kept in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: BTreeMap<Position, Vec<Occupant>>,
}

impl Occupancy {
    /// Create an empty index.
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Replace the index with the given placements.
    pub fn rebuild<I>(&mut self, placements: I)
    where
        I: IntoIterator<Item = (Position, Occupant)>,
    {
        self.cells.clear();
        for (position, occupant) in placements {
            self.insert(position, occupant);
        }
    }

    fn insert(&mut self, position: Position, occupant: Occupant) {
        let here = self.cells.entry(position).or_default();
        let at = here.partition_point(|o| o.id < occupant.id);
        here.insert(at, occupant);
    }

    /// Drop agent `id` from `position`.
    pub fn remove(&mut self, position: Position, id: AgentId) {
        if let Some(here) = self.cells.get_mut(&position) {
            here.retain(|o| o.id != id);
            if here.is_empty() {
                self.cells.remove(&position);
            }
        }
    }

    /// Move `occupant` from `from` to `to`.
    pub fn relocate(&mut self, occupant: Occupant, from: Position, to: Position) {
        if from == to {
            return;
        }
        self.remove(from, occupant.id);
        self.insert(to, occupant);
    }

    /// Agents on `position`.
    pub fn at(&self, position: Position) -> &[Occupant] {
        self.cells
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cooperating agents of `species` on `position`.
    pub fn cooperators_at(&self, position: Position, species: HominidSpecies) -> u32 {
        let count = self
            .at(position)
            .iter()
            .filter(|o| o.species == species && o.cooperates)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Agents of `species` on `position`, optionally leaving one out.
    pub fn species_at(
        &self,
        position: Position,
        species: HominidSpecies,
        except: Option<AgentId>,
    ) -> u32 {
        let count = self
            .at(position)
            .iter()
            .filter(|o| o.species == species && Some(o.id) != except)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Occupied cells in position order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &[Occupant])> {
        self.cells.iter().map(|(p, v)| (*p, v.as_slice()))
    }

    /// Total agents indexed.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Whether no agent is indexed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupant(id: u32, species: HominidSpecies, cooperates: bool) -> Occupant {
        Occupant {
            id: AgentId(id),
            species,
            cooperates,
        }
    }

    #[test]
    fn counts_only_same_species_cooperators() {
        let here = Position::new(1, 1);
        let mut occ = Occupancy::new();
        occ.rebuild([
            (here, occupant(2, HominidSpecies::Boisei, true)),
            (here, occupant(0, HominidSpecies::Boisei, true)),
            (here, occupant(1, HominidSpecies::Boisei, false)),
            (here, occupant(3, HominidSpecies::Ergaster, true)),
        ]);
        assert_eq!(occ.cooperators_at(here, HominidSpecies::Boisei), 2);
        assert_eq!(occ.species_at(here, HominidSpecies::Boisei, Some(AgentId(0))), 2);
        let ids: Vec<u32> = occ.at(here).iter().map(|o| o.id.into_inner()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn relocate_moves_between_cells() {
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);
        let mut occ = Occupancy::new();
        let who = occupant(5, HominidSpecies::Ergaster, true);
        occ.rebuild([(a, who)]);
        occ.relocate(who, a, b);
        assert!(occ.at(a).is_empty());
        assert_eq!(occ.at(b), &[who]);
        assert_eq!(occ.len(), 1);
        assert_eq!(occ.occupied().count(), 1);
    }
}

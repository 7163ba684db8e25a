//! Enumeration types for the Hominids simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Topography
// ---------------------------------------------------------------------------

/// Topography zone of a grid cell. Immutable after the landscape is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Active river channel.
    Channel,
    /// Seasonally flooded plain next to the channel.
    Flooded,
    /// Dry ground that never floods.
    Unflooded,
}

impl Zone {
    /// All zones in declaration order.
    pub const ALL: [Self; 3] = [Self::Channel, Self::Flooded, Self::Unflooded];

    /// Parse a single-character topography label (`C`, `F`, `U`, any case).
    pub const fn from_label(label: char) -> Option<Self> {
        match label.to_ascii_uppercase() {
            'C' => Some(Self::Channel),
            'F' => Some(Self::Flooded),
            'U' => Some(Self::Unflooded),
            _ => None,
        }
    }

    /// The single-character label for this zone.
    pub const fn label(self) -> char {
        match self {
            Self::Channel => 'C',
            Self::Flooded => 'F',
            Self::Unflooded => 'U',
        }
    }
}

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// One of the four seasons of the simulated year.
///
/// Season boundaries are configured as day-of-year cutoffs, so the seasons
/// are not necessarily of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// First season of the year.
    First,
    /// Second season of the year.
    Second,
    /// Third season of the year.
    Third,
    /// Fourth season of the year.
    Fourth,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    /// Zero-based index of the season (0..4), used for per-season arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
        }
    }

    /// Season for a zero-based index. Returns `None` for indices above 3.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            3 => Some(Self::Fourth),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Hominid species
// ---------------------------------------------------------------------------

/// The hominid species an agent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HominidSpecies {
    /// *Paranthropus boisei*: robust, plant-focused.
    Boisei,
    /// *Homo ergaster*: larger daily requirement, frequently meat-eating.
    Ergaster,
}

impl HominidSpecies {
    /// All species in declaration order.
    pub const ALL: [Self; 2] = [Self::Boisei, Self::Ergaster];

    /// Zero-based index of the species, used for per-species arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Boisei => 0,
            Self::Ergaster => 1,
        }
    }

    /// Lowercase species name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boisei => "boisei",
            Self::Ergaster => "ergaster",
        }
    }
}

impl core::fmt::Display for HominidSpecies {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Carcasses
// ---------------------------------------------------------------------------

/// Size class of a carcass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarcassSize {
    /// Can be scavenged by a single agent.
    Small,
    /// Requires a group of cooperating agents.
    Medium,
    /// Requires a group of cooperating agents.
    Large,
}

impl CarcassSize {
    /// Whether scavenging this size requires a group of cooperators.
    pub const fn requires_cooperation(self) -> bool {
        !matches!(self, Self::Small)
    }
}

/// Discovery state of a carcass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryState {
    /// No agent has reached the carcass yet.
    Undiscovered,
    /// An agent has reached the carcass but nobody has eaten from it.
    Discovered,
    /// At least one agent has eaten from the carcass.
    BeingConsumed,
}

// ---------------------------------------------------------------------------
// Agent activity
// ---------------------------------------------------------------------------

/// What an agent did during its most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Looked around but took no action (nothing reachable, or gave up waiting).
    Scanning,
    /// Took one step toward a food option or a wander target.
    Moving,
    /// Ate plant food in its current cell.
    Eating,
    /// Ate meat from a carcass in its current cell.
    Scavenging,
    /// Waited at a carcass for cooperators to arrive.
    Waiting,
    /// Settled into its nest for the night.
    Nesting,
}

impl Activity {
    /// Whether the activity counts as travel in the spatial activity tally.
    pub const fn is_travel(self) -> bool {
        matches!(self, Self::Moving)
    }

    /// Whether the activity counts as feeding in the spatial activity tally.
    pub const fn is_feeding(self) -> bool {
        matches!(self, Self::Eating | Self::Scavenging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_labels_roundtrip() {
        for zone in Zone::ALL {
            assert_eq!(Zone::from_label(zone.label()), Some(zone));
        }
        assert_eq!(Zone::from_label('f'), Some(Zone::Flooded));
        assert_eq!(Zone::from_label('x'), None);
    }

    #[test]
    fn season_index_matches_order() {
        for (i, season) in Season::ALL.iter().enumerate() {
            assert_eq!(season.index(), i);
            assert_eq!(Season::from_index(i), Some(*season));
        }
        assert_eq!(Season::from_index(4), None);
    }

    #[test]
    fn only_small_carcasses_are_solo() {
        assert!(!CarcassSize::Small.requires_cooperation());
        assert!(CarcassSize::Medium.requires_cooperation());
        assert!(CarcassSize::Large.requires_cooperation());
    }

    #[test]
    fn species_serializes_snake_case() {
        let json = serde_json::to_string(&HominidSpecies::Ergaster).ok();
        assert_eq!(json.as_deref(), Some("\"ergaster\""));
    }
}

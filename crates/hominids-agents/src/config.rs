//! Foraging parameters and per-species traits.
//!
//! [`ForagingConfig`] bundles every tunable of the decision procedure so the
//! orchestrator (and tests) can override defaults. It is deserialised from
//! the `foraging` section of the simulation YAML; omitted fields keep the
//! defaults documented on each field.

use hominids_types::HominidSpecies;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Diet and body parameters of one hominid species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    /// Kilocalories needed per day.
    pub daily_calorie_requirement: f64,
    /// Gut capacity in grams.
    pub belly_capacity_grams: f64,
    /// Days kept in the rolling calorie history.
    pub diet_track_length: usize,
    /// Fraction of the daily requirement below which a day counts as short.
    pub diet_threshold: f64,
    /// Fraction of short days in a full window that marks starvation.
    pub starvation_proportion: f64,
    /// Fraction of other conspecifics a cell must hold to attract group
    /// nesters.
    pub group_nesting_threshold: f64,
}

impl SpeciesTraits {
    /// *Paranthropus boisei* defaults.
    pub const fn boisei() -> Self {
        Self {
            daily_calorie_requirement: 2500.0,
            belly_capacity_grams: 4500.0,
            diet_track_length: 14,
            diet_threshold: 0.5,
            starvation_proportion: 1.0,
            group_nesting_threshold: 0.25,
        }
    }

    /// *Homo ergaster* defaults.
    pub const fn ergaster() -> Self {
        Self {
            daily_calorie_requirement: 3500.0,
            belly_capacity_grams: 5000.0,
            ..Self::boisei()
        }
    }

    /// Kilocalories below which a day counts as short.
    pub fn short_day_calories(&self) -> f64 {
        self.daily_calorie_requirement * self.diet_threshold
    }

    fn validate(&self, species: &str) -> Result<(), AgentError> {
        let invalid = |field: &str, reason: String| AgentError::InvalidConfig {
            field: format!("{species}.{field}"),
            reason,
        };
        for (field, value) in [
            ("daily_calorie_requirement", self.daily_calorie_requirement),
            ("belly_capacity_grams", self.belly_capacity_grams),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        for (field, value) in [
            ("diet_threshold", self.diet_threshold),
            ("starvation_proportion", self.starvation_proportion),
            ("group_nesting_threshold", self.group_nesting_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be within [0, 1], got {value}")));
            }
        }
        if self.diet_track_length == 0 {
            return Err(invalid("diet_track_length", String::from("must be at least 1")));
        }
        Ok(())
    }
}

/// What happens to an agent flagged as starving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarvationPolicy {
    /// Only record the flag in the statistics.
    #[default]
    Record,
    /// Scale belly capacity by `fraction` while the flag is set.
    CapBelly {
        /// Multiplier in `(0, 1]`.
        fraction: f64,
    },
    /// Retire the agent; it stops acting but stays in reports.
    Remove,
}

/// Tunables of the per-minute decision procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForagingConfig {
    /// Chebyshev radius of the wander ring (default: 2).
    pub wandering_distance: u32,
    /// Manhattan radius within which carcass calls are heard (default: 10).
    pub earshot_distance: u32,
    /// Manhattan radius searched for a nest site (default: 10).
    pub nest_scan_distance: u32,
    /// Manhattan radius within which carcasses are seen (default: 5).
    pub carcass_detection_range: u32,
    /// Cooperators needed on a medium or large carcass (default: 3).
    pub agents_per_carcass: u32,
    /// Minutes a cooperator waits for help (default: 10).
    pub wait_minutes: u32,
    /// Grams of meat a lone scavenger eats per minute (default: 50).
    pub meat_grams_per_minute: f64,
    /// Kilocalories per gram of meat (default: 1.57).
    pub meat_calories_per_gram: f64,
    /// Traits of *boisei* agents.
    pub boisei: SpeciesTraits,
    /// Traits of *ergaster* agents.
    pub ergaster: SpeciesTraits,
    /// Consequence of starvation (default: record only).
    pub starvation: StarvationPolicy,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            wandering_distance: 2,
            earshot_distance: 10,
            nest_scan_distance: 10,
            carcass_detection_range: 5,
            agents_per_carcass: 3,
            wait_minutes: 10,
            meat_grams_per_minute: 50.0,
            meat_calories_per_gram: 1.57,
            boisei: SpeciesTraits::boisei(),
            ergaster: SpeciesTraits::ergaster(),
            starvation: StarvationPolicy::Record,
        }
    }
}

impl ForagingConfig {
    /// Traits for `species`.
    pub const fn traits(&self, species: HominidSpecies) -> &SpeciesTraits {
        match species {
            HominidSpecies::Boisei => &self.boisei,
            HominidSpecies::Ergaster => &self.ergaster,
        }
    }

    /// Grams a scavenger takes per minute from a carcass shared by
    /// `cooperators` agents.
    pub fn meat_ration(&self, shared: bool, cooperators: u32) -> f64 {
        if shared && cooperators > 1 {
            self.meat_grams_per_minute / f64::from(cooperators)
        } else {
            self.meat_grams_per_minute
        }
    }

    /// Expected kilocalories per minute from a carcass, used to rank it
    /// against plant food.
    pub fn meat_return_rate(&self, shared: bool) -> f64 {
        self.meat_calories_per_gram * self.meat_ration(shared, self.agents_per_carcass)
    }

    /// Check ranges and cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), AgentError> {
        let invalid = |field: &str, reason: String| {
            Err(AgentError::InvalidConfig {
                field: field.to_owned(),
                reason,
            })
        };
        if self.wandering_distance == 0 {
            return invalid("wandering_distance", String::from("must be at least 1"));
        }
        if self.agents_per_carcass == 0 {
            return invalid("agents_per_carcass", String::from("must be at least 1"));
        }
        if self.carcass_detection_range > self.earshot_distance {
            return invalid(
                "carcass_detection_range",
                format!(
                    "{} exceeds earshot_distance {}",
                    self.carcass_detection_range, self.earshot_distance
                ),
            );
        }
        for (field, value) in [
            ("meat_grams_per_minute", self.meat_grams_per_minute),
            ("meat_calories_per_gram", self.meat_calories_per_gram),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(field, format!("must be positive, got {value}"));
            }
        }
        if let StarvationPolicy::CapBelly { fraction } = self.starvation
            && !(fraction > 0.0 && fraction <= 1.0)
        {
            return invalid(
                "starvation.cap_belly.fraction",
                format!("must be within (0, 1], got {fraction}"),
            );
        }
        self.boisei.validate("boisei")?;
        self.ergaster.validate("ergaster")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ForagingConfig::default().validate().is_ok());
    }

    #[test]
    fn species_defaults_differ_in_body_size() {
        let config = ForagingConfig::default();
        assert!((config.traits(HominidSpecies::Boisei).belly_capacity_grams - 4500.0).abs() < 1e-9);
        assert!(
            (config.traits(HominidSpecies::Ergaster).daily_calorie_requirement - 3500.0).abs()
                < 1e-9
        );
        assert_eq!(config.ergaster.diet_track_length, 14);
    }

    #[test]
    fn detection_beyond_earshot_rejected() {
        let config = ForagingConfig {
            carcass_detection_range: 11,
            ..ForagingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AgentError::InvalidConfig { field, .. }) if field == "carcass_detection_range"
        ));
    }

    #[test]
    fn cap_belly_fraction_checked() {
        let config = ForagingConfig {
            starvation: StarvationPolicy::CapBelly { fraction: 0.0 },
            ..ForagingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn meat_ration_splits_shared_carcasses() {
        let config = ForagingConfig::default();
        assert!((config.meat_ration(false, 4) - 50.0).abs() < 1e-9);
        assert!((config.meat_ration(true, 4) - 12.5).abs() < 1e-9);
        assert!((config.meat_ration(true, 0) - 50.0).abs() < 1e-9);
        assert!((config.meat_return_rate(false) - 78.5).abs() < 1e-9);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ForagingConfig =
            serde_json::from_str(r#"{"earshot_distance": 12, "starvation": "remove"}"#).unwrap();
        assert_eq!(config.earshot_distance, 12);
        assert_eq!(config.wait_minutes, 10);
        assert_eq!(config.starvation, StarvationPolicy::Remove);
    }
}

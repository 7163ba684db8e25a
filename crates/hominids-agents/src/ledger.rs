//! Per-agent calorie accounting.
//!
//! The ledger splits every meal into season buckets (plant, meat, root,
//! non-root), keeps today's running totals until the day closes, and tracks
//! the grams taken from each kind of source for conservation checks.

use hominids_types::{DailyCalories, Season, SeasonCalories};
use serde::{Deserialize, Serialize};

/// Calorie and gram totals for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieLedger {
    seasons: [SeasonCalories; 4],
    today_plant: f64,
    today_meat: f64,
    daily: Vec<DailyCalories>,
    plant_grams: f64,
    meat_grams: f64,
}

impl Default for CalorieLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CalorieLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self {
            seasons: Season::ALL.map(|season| SeasonCalories {
                season,
                plant: 0.0,
                meat: 0.0,
                root: 0.0,
                non_root: 0.0,
            }),
            today_plant: 0.0,
            today_meat: 0.0,
            daily: Vec::new(),
            plant_grams: 0.0,
            meat_grams: 0.0,
        }
    }

    /// Record a plant meal.
    pub fn record_plant(&mut self, season: Season, calories: f64, grams: f64, is_root: bool) {
        if let Some(bucket) = self.seasons.get_mut(season.index()) {
            bucket.plant += calories;
            if is_root {
                bucket.root += calories;
            } else {
                bucket.non_root += calories;
            }
        }
        self.today_plant += calories;
        self.plant_grams += grams;
    }

    /// Record a meat meal.
    pub fn record_meat(&mut self, season: Season, calories: f64, grams: f64) {
        if let Some(bucket) = self.seasons.get_mut(season.index()) {
            bucket.meat += calories;
        }
        self.today_meat += calories;
        self.meat_grams += grams;
    }

    /// Kilocalories eaten so far today.
    pub fn today(&self) -> f64 {
        self.today_plant + self.today_meat
    }

    /// Seal today's totals as absolute day `day` and start a new day.
    pub fn close_day(&mut self, day: u64) -> DailyCalories {
        let record = DailyCalories {
            day,
            plant: self.today_plant,
            meat: self.today_meat,
        };
        self.daily.push(record.clone());
        self.today_plant = 0.0;
        self.today_meat = 0.0;
        record
    }

    /// Season buckets in season order.
    pub fn seasons(&self) -> &[SeasonCalories] {
        &self.seasons
    }

    /// Closed days in order.
    pub fn daily(&self) -> &[DailyCalories] {
        &self.daily
    }

    /// Mean kilocalories per closed day; zero before the first day closes.
    pub fn mean_daily_calories(&self) -> f64 {
        if self.daily.is_empty() {
            return 0.0;
        }
        let total: f64 = self.daily.iter().map(DailyCalories::total).sum();
        #[allow(clippy::cast_precision_loss)]
        let days = self.daily.len() as f64;
        total / days
    }

    /// Grams eaten from plants over the run.
    pub const fn plant_grams(&self) -> f64 {
        self.plant_grams
    }

    /// Grams eaten from carcasses over the run.
    pub const fn meat_grams(&self) -> f64 {
        self.meat_grams
    }
}

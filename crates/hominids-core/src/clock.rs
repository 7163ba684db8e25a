//! Simulation clock for the Hominids simulation.
//!
//! One tick is one active minute of daylight. Day, season, and year are
//! derived from the tick counter and the [`TimeConfig`] on demand; the tick
//! number is the only stored temporal state.
//!
//! # Design Principles
//!
//! - All temporal derivations use checked arithmetic (no silent overflow).
//! - Seasons are configured as cumulative day-of-year cutoffs, so they may
//!   have unequal lengths.

use hominids_types::Season;
use serde::Serialize;

use crate::config::TimeConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero minutes per day).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Calendar position derived from a tick number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeReading {
    /// The tick this reading was taken for.
    pub tick: u64,
    /// Minute within the active day (0-based).
    pub minute_of_day: u32,
    /// Absolute day since the start of the run (0-based).
    pub day: u64,
    /// Day within the current year (0-based).
    pub day_of_year: u32,
    /// Season containing `day_of_year`.
    pub season: Season,
    /// Year since the start of the run (0-based).
    pub year: u64,
    /// First minute of the day.
    pub is_day_start: bool,
    /// Last minute of the day (nesting minute).
    pub is_last_minute: bool,
    /// Last minute of the last day of a season.
    pub is_season_end: bool,
}

/// Simulation clock.
///
/// Advances once per tick. All other readings are computed from the tick
/// counter by [`SimClock::reading_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    /// Current tick number (0-indexed).
    tick: u64,
    /// Active minutes (ticks) per day.
    minutes_per_day: u32,
    /// Days per simulated year.
    days_per_year: u32,
    /// Cumulative day-of-year at which each season ends (exclusive).
    season_end_days: [u32; 4],
}

impl SimClock {
    /// Create a clock at tick 0 from a time configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the day is empty, the year is
    /// empty, or the season cutoffs are not strictly increasing and ending on
    /// `days_per_year`.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        if config.minutes_per_day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "minutes_per_day must be at least 1".to_owned(),
            });
        }
        if config.days_per_year == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "days_per_year must be at least 1".to_owned(),
            });
        }

        let mut previous = 0_u32;
        for (index, &end) in config.season_end_days.iter().enumerate() {
            if end <= previous {
                return Err(ClockError::InvalidConfig {
                    reason: format!(
                        "season_end_days must be strictly increasing (entry {index} is {end})"
                    ),
                });
            }
            previous = end;
        }
        if previous != config.days_per_year {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "last season must end on day {} (found {previous})",
                    config.days_per_year
                ),
            });
        }

        Ok(Self {
            tick: 0,
            minutes_per_day: config.minutes_per_day,
            days_per_year: config.days_per_year,
            season_end_days: config.season_end_days,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the configured active minutes per day.
    pub const fn minutes_per_day(&self) -> u32 {
        self.minutes_per_day
    }

    /// Return the configured days per year.
    pub const fn days_per_year(&self) -> u32 {
        self.days_per_year
    }

    /// Reading for the current tick.
    pub fn reading(&self) -> TimeReading {
        self.reading_at(self.tick)
    }

    /// Reading for an arbitrary tick. Pure: does not touch the counter.
    pub fn reading_at(&self, tick: u64) -> TimeReading {
        let minutes = u64::from(self.minutes_per_day);
        let days = u64::from(self.days_per_year);

        // Divisors are non-zero by construction.
        let day = tick.checked_div(minutes).unwrap_or(0);
        let minute_of_day = u32::try_from(tick.checked_rem(minutes).unwrap_or(0)).unwrap_or(0);
        let year = day.checked_div(days).unwrap_or(0);
        let day_of_year = u32::try_from(day.checked_rem(days).unwrap_or(0)).unwrap_or(0);

        let season = self.season_for_day(day_of_year);
        let is_last_minute = minute_of_day.saturating_add(1) == self.minutes_per_day;
        let is_season_end =
            is_last_minute && day_of_year.saturating_add(1) == self.season_end_day(season);

        TimeReading {
            tick,
            minute_of_day,
            day,
            day_of_year,
            season,
            year,
            is_day_start: minute_of_day == 0,
            is_last_minute,
            is_season_end,
        }
    }

    /// Season containing a zero-based day of the year.
    pub fn season_for_day(&self, day_of_year: u32) -> Season {
        Season::ALL
            .into_iter()
            .zip(self.season_end_days)
            .find(|&(_, end)| day_of_year < end)
            .map_or(Season::Fourth, |(season, _)| season)
    }

    /// Exclusive end day-of-year of a season.
    pub fn season_end_day(&self, season: Season) -> u32 {
        self.season_end_days
            .get(season.index())
            .copied()
            .unwrap_or(self.days_per_year)
    }

    /// Number of days in a season.
    pub fn season_length(&self, season: Season) -> u32 {
        let start = season
            .index()
            .checked_sub(1)
            .and_then(|previous| self.season_end_days.get(previous))
            .copied()
            .unwrap_or(0);
        self.season_end_day(season).saturating_sub(start)
    }

    /// Number of ticks in one simulated year.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the multiplication overflows.
    pub fn ticks_per_year(&self) -> Result<u64, ClockError> {
        u64::from(self.minutes_per_day)
            .checked_mul(u64::from(self.days_per_year))
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: "ticks_per_year overflow".to_owned(),
            })
    }

    /// Number of ticks needed to simulate `years` full years.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the multiplication overflows.
    pub fn ticks_for_years(&self, years: u32) -> Result<u64, ClockError> {
        self.ticks_per_year()?
            .checked_mul(u64::from(years))
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: format!("tick budget for {years} years overflows"),
            })
    }
}

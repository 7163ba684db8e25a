//! Capability strings.
//!
//! Each population is configured with a short option string whose
//! characters switch on one behaviour apiece:
//!
//! | Char | Capability |
//! |------|------------|
//! | `i`  | nests individually (the default) |
//! | `g`  | nests in groups |
//! | `d`  | digs for roots and tubers |
//! | `m`  | eats meat |
//! | `c`  | cooperates on large carcasses |
//!
//! Parsing is case-insensitive, so `"gdMc"` and `"GDMC"` are equivalent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Behavioural switches of one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Can eat plants that require a digging stick.
    pub can_dig: bool,
    /// Can scavenge carcasses.
    pub can_eat_meat: bool,
    /// Waits for and answers calls about large carcasses.
    pub cooperates: bool,
    /// Nests with conspecifics rather than alone.
    pub nests_in_group: bool,
}

impl Capabilities {
    /// Parse an option string.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::EmptyCapabilities`] for an empty string,
    /// [`AgentError::UnknownCapability`] for characters outside `igdmc`,
    /// [`AgentError::ConflictingNesting`] when both `i` and `g` appear, and
    /// [`AgentError::CooperationWithoutMeat`] for `c` without `m`.
    pub fn parse(input: &str) -> Result<Self, AgentError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AgentError::EmptyCapabilities);
        }
        let mut caps = Self::default();
        let mut individual = false;
        for ch in trimmed.chars() {
            match ch.to_ascii_lowercase() {
                'i' => individual = true,
                'g' => caps.nests_in_group = true,
                'd' => caps.can_dig = true,
                'm' => caps.can_eat_meat = true,
                'c' => caps.cooperates = true,
                _ => {
                    return Err(AgentError::UnknownCapability {
                        found: ch,
                        input: input.to_owned(),
                    });
                }
            }
        }
        if individual && caps.nests_in_group {
            return Err(AgentError::ConflictingNesting(input.to_owned()));
        }
        if caps.cooperates && !caps.can_eat_meat {
            return Err(AgentError::CooperationWithoutMeat(input.to_owned()));
        }
        Ok(caps)
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.nests_in_group { "g" } else { "i" })?;
        if self.can_dig {
            f.write_str("d")?;
        }
        if self.can_eat_meat {
            f.write_str("m")?;
        }
        if self.cooperates {
            f.write_str("c")?;
        }
        Ok(())
    }
}

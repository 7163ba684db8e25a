//! Type-safe identifier wrappers around plain integers.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. IDs are assigned
//! sequentially by their owners so that two runs with the same seed
//! produce the same identifiers.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around an integer with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Return the inner integer value.
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a hominid agent. Agents are stepped in
    /// ascending id order.
    AgentId(u32)
}

define_id! {
    /// Unique identifier for a carcass, assigned at spawn.
    CarcassId(u64)
}

define_id! {
    /// Identifier of a plant species in the catalog.
    PlantSpeciesId(u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_inner_value() {
        assert!(AgentId(1) < AgentId(2));
        assert!(CarcassId(7) > CarcassId(3));
    }

    #[test]
    fn id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&PlantSpeciesId(12)).ok();
        assert_eq!(json.as_deref(), Some("12"));
    }

    #[test]
    fn id_display_matches_inner() {
        assert_eq!(AgentId(42).to_string(), "42");
    }
}

//! Error types for the hominids-agents crate.
//!
//! Only construction can fail. Running out of food, a full gut, or a
//! carcass nobody helps with are decision outcomes, not errors.

/// Errors raised while configuring agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The capability string was empty.
    #[error("capability string is empty")]
    EmptyCapabilities,

    /// The capability string contains a character with no meaning.
    #[error("unknown capability {found:?} in {input:?}")]
    UnknownCapability {
        /// The offending character.
        found: char,
        /// The full string.
        input: String,
    },

    /// Both individual (`i`) and group (`g`) nesting were requested.
    #[error("capability string {0:?} asks for both individual and group nesting")]
    ConflictingNesting(String),

    /// Cooperation (`c`) was requested without meat-eating (`m`).
    #[error("capability string {0:?} cooperates without eating meat")]
    CooperationWithoutMeat(String),

    /// A foraging or species parameter is out of range.
    #[error("invalid foraging config: {field}: {reason}")]
    InvalidConfig {
        /// Dotted path of the field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

//! Error types.

use thiserror::Error;

/// Reasons a target date string could not be turned into a [`crate::target::TargetMoment`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// The input was empty or only whitespace.
    #[error("target datetime is empty")]
    Empty,

    /// The input matched none of the accepted date formats.
    #[error("invalid target datetime {input:?}")]
    Invalid {
        /// The rejected input.
        input: String,
    },

    /// A local date-time that falls into a gap in the local time zone,
    /// e.g. during a daylight-saving jump.
    #[error("target datetime {input:?} does not exist in the local time zone")]
    NonexistentLocalTime {
        /// The rejected input.
        input: String,
    },
}

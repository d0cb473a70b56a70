use thiserror::Error;

use crate::types::Step;

/// Failures surfaced by the simulation engine.
///
/// Every variant is fatal for the run that produced it; no partial series
/// are ever handed back alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A parameter violates the model's preconditions. Raised before any
    /// step is computed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A step produced a non-finite intermediate value.
    #[error("numeric overflow computing {quantity} at step {step}")]
    NumericOverflow { quantity: &'static str, step: Step },

    /// The cancellation flag was observed between steps.
    #[error("simulation cancelled before step {step}")]
    Cancelled { step: Step },
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;

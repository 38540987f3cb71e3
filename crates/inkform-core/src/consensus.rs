//! Reduce per-element values to a single representative value.

use thiserror::Error;

/// Why a set of values has no single representative.
///
/// Both variants render the same neutral display value, but callers that
/// care (e.g. to enable or disable a control) can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// There were no values at all.
    #[error("no values to resolve")]
    Empty,
    /// At least two values were not equal.
    #[error("values disagree")]
    Indeterminate,
}

/// Resolve a sequence of values to the one value they all share.
///
/// Values must already be normalized (e.g. lower-cased colors); comparison
/// is plain `PartialEq`, so `NaN` never agrees with anything.
pub fn consensus<T, I>(values: I) -> Result<T, ConsensusError>
where
    I: IntoIterator<Item = T>,
    T: PartialEq,
{
    let mut values = values.into_iter();
    let first = values.next().ok_or(ConsensusError::Empty)?;
    for value in values {
        if value != first {
            return Err(ConsensusError::Indeterminate);
        }
    }
    Ok(first)
}

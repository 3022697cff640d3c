use thiserror::Error;

/// Failures surfaced by the type algebra.
///
/// Internal consistency assumptions (substitution arity, bound well-formedness)
/// are `debug_assert!`s rather than error variants: they indicate a bug in the
/// engine, not a recoverable caller mistake.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The input is not one of the shapes the operation accepts.
    #[error("{operation} does not accept a {found} type")]
    InvalidShape {
        operation: &'static str,
        found: &'static str,
    },

    /// A rule the algebra deliberately leaves open, surfaced explicitly
    /// instead of computing a wrong answer.
    #[error("{operation} is not supported")]
    Unsupported { operation: &'static str },
}

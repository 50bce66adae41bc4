use thiserror::Error;

use crate::session::Phase;

/// Result alias for `kstep`.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], as reported to callers of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input value (k, seed count, config field).
    InvalidParameter,
    /// Operation invoked out of sequence.
    InvalidState,
    /// Initialization method name not recognized.
    UnknownMethod,
    /// A run was stopped through its cancel token.
    Cancelled,
}

/// Errors returned by the clustering steps and the session.
///
/// Every error is raised before any state mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} points")]
    InvalidClusterCount {
        /// Requested count (as supplied, may be non-positive).
        requested: i64,
        /// Number of points in the dataset.
        n_items: usize,
    },

    /// Too many manual seed centroids.
    #[error("expected at most {expected} manual centroids, got {found}")]
    SeedCountMismatch {
        /// Number of centroids the session wants (k).
        expected: usize,
        /// Number supplied, including previously collected ones.
        found: usize,
    },

    /// Operation not valid in the current phase.
    #[error("'{operation}' is not valid while the session is {phase}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the session was in.
        phase: Phase,
    },

    /// Initialization method name not recognized.
    #[error("unknown initialization method '{0}'")]
    UnknownMethod(String),

    /// A run was cancelled between iterations.
    #[error("run cancelled after {iterations} iterations")]
    Cancelled {
        /// Iterations completed before the cancel flag was observed.
        iterations: usize,
    },
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Map onto the caller-visible error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. }
            | Error::InvalidClusterCount { .. }
            | Error::SeedCountMismatch { .. } => ErrorKind::InvalidParameter,
            Error::InvalidState { .. } => ErrorKind::InvalidState,
            Error::UnknownMethod(_) => ErrorKind::UnknownMethod,
            Error::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_parameter_errors() {
        let errs = [
            Error::invalid_parameter("k", "must be an integer"),
            Error::InvalidClusterCount {
                requested: 0,
                n_items: 4,
            },
            Error::SeedCountMismatch {
                expected: 2,
                found: 3,
            },
        ];
        for e in &errs {
            assert_eq!(e.kind(), ErrorKind::InvalidParameter, "{e}");
        }
        assert_eq!(
            Error::UnknownMethod("ward".into()).kind(),
            ErrorKind::UnknownMethod
        );
    }

    #[test]
    fn display_mentions_values() {
        let e = Error::InvalidClusterCount {
            requested: 3,
            n_items: 2,
        };
        assert_eq!(e.to_string(), "cannot create 3 clusters from 2 points");

        let e = Error::InvalidState {
            operation: "step",
            phase: Phase::Uninitialized,
        };
        assert_eq!(
            e.to_string(),
            "'step' is not valid while the session is uninitialized"
        );
    }
}

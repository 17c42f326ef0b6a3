//! Error types for progression and the services built on it.

use vocalboost_core::{AssignmentId, SubmissionId, SubmissionKind};
use vocalboost_storage::StorageError;

/// Result type for engine lookups.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// The engine's only failure: an id that is not in the course tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// Unknown module, lesson, assignment, learner, ...
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up
        kind: &'static str,
        /// The id that missed
        id: String,
    },
}

impl ProgressError {
    /// Build a NotFound for `kind`.
    pub fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        ProgressError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Errors raised by the storage-backed services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Lookup failed
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The assignment does not take this kind of submission
    #[error("assignment {assignment} does not accept {kind} submissions")]
    UnsupportedKind {
        /// Target assignment
        assignment: AssignmentId,
        /// Rejected kind
        kind: &'static str,
    },

    /// Text body or media reference was blank
    #[error("submission for assignment {0} is empty")]
    EmptySubmission(AssignmentId),

    /// The assignment's lesson has not been reached yet
    #[error("assignment {0} is locked until the lessons before it are complete")]
    AssignmentLocked(AssignmentId),

    /// The learner may not review peers' work on this assignment yet
    #[error("peer review of assignment {0} is locked")]
    ReviewLocked(AssignmentId),

    /// Learners review other people's work, not their own
    #[error("cannot review your own submission {0}")]
    OwnSubmission(SubmissionId),

    /// Ratings are whole stars from 1 to 5
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// Review feedback was blank or too long
    #[error("review feedback must be 1 to {max} characters")]
    InvalidFeedback {
        /// Longest accepted feedback
        max: usize,
    },

    /// The reviewer already reviewed this submission
    #[error("submission {0} already has your review")]
    AlreadyReviewed(SubmissionId),
}

impl ServiceError {
    pub(crate) fn unsupported(assignment: &AssignmentId, kind: SubmissionKind) -> Self {
        ServiceError::UnsupportedKind {
            assignment: assignment.clone(),
            kind: kind.as_str(),
        }
    }

    /// Whether this wraps a NotFound lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Progress(ProgressError::NotFound { .. }))
            || matches!(self, ServiceError::Storage(StorageError::NotFound(_)))
    }
}

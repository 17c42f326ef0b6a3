//! Storage trait abstraction.

use async_trait::async_trait;
use vocalboost_core::{
    AssignmentCatalog, AssignmentId, CompletionSet, Course, Learner, Notification, NotificationId,
    PeerReview, Submission, SubmissionFilter, SubmissionId, UserId,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored data is inconsistent
    #[error("Invalid data: {0}")]
    Invalid(String),
}

/// Storage abstraction for Vocal Boost data.
///
/// The course tree and assignment catalog are written once (seeding) and read
/// many times. Completion sets only grow.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Course content ===

    /// Load the course tree.
    async fn load_course(&self) -> Result<Course>;

    /// Replace the course tree.
    async fn save_course(&mut self, course: &Course) -> Result<()>;

    /// Load the assignment catalog.
    async fn load_assignments(&self) -> Result<AssignmentCatalog>;

    /// Replace the assignment catalog.
    async fn save_assignments(&mut self, catalog: &AssignmentCatalog) -> Result<()>;

    // === Learners ===

    /// Save a learner (create or update).
    async fn save_learner(&mut self, learner: &Learner) -> Result<()>;

    /// Load a learner by ID.
    async fn load_learner(&self, id: &UserId) -> Result<Option<Learner>>;

    /// List all learners.
    async fn list_learners(&self) -> Result<Vec<Learner>>;

    // === Completions ===

    /// Load a learner's completion set. Unknown learners have an empty set.
    async fn load_completions(&self, user: &UserId) -> Result<CompletionSet>;

    /// Add an assignment to a learner's completion set.
    ///
    /// Returns `true` if it was newly added.
    async fn record_completion(&mut self, user: &UserId, assignment: &AssignmentId) -> Result<bool>;

    // === Submissions ===

    /// Save a submission (create or update).
    async fn save_submission(&mut self, submission: &Submission) -> Result<()>;

    /// Load a submission by ID.
    async fn load_submission(&self, id: SubmissionId) -> Result<Option<Submission>>;

    /// List submissions matching the filter, oldest first.
    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>>;

    // === Notifications ===

    /// Save a notification (create or update).
    async fn save_notification(&mut self, notification: &Notification) -> Result<()>;

    /// Load a notification by ID.
    async fn load_notification(&self, id: NotificationId) -> Result<Option<Notification>>;

    /// List a learner's notifications, newest first.
    async fn list_notifications(&self, user: &UserId) -> Result<Vec<Notification>>;

    // === Peer reviews ===

    /// Save a peer review (create or update).
    async fn save_peer_review(&mut self, review: &PeerReview) -> Result<()>;

    /// Reviews left on a submission, oldest first.
    async fn list_peer_reviews(&self, submission: SubmissionId) -> Result<Vec<PeerReview>>;
}

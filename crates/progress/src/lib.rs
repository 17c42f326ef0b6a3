//! Course progression (Layer 2)
//!
//! Lesson traversal, module completion, unlock gating and peer review
//! access, plus the storage-backed services that feed them: progress
//! tracking, submissions, peer reviews and the notification inbox.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod engine;
pub mod tracker;
pub mod submission;
pub mod inbox;
pub mod peer;

pub use config::{ConfigError, ProgressionConfig, DEFAULT_PEER_REVIEW_THRESHOLD};
pub use error::{ProgressError, ServiceError, Result};
pub use engine::{CourseProgression, PeerReviewEntry};
pub use tracker::{ProgressTracker, BasicProgressTracker, LearnerSnapshot, LearnerSummary, ModuleSnapshot, LessonSnapshot};
pub use submission::{SubmissionRecorder, SubmissionReceipt};
pub use inbox::NotificationInbox;
pub use peer::{PeerReviewService, PeerSubmission};

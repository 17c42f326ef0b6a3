//! Vocal Boost core data models.
//!
//! This crate defines the course tree, assignments, learners and the records
//! that track their work. It performs no I/O.

#![warn(missing_docs)]

// Core identities
mod id;

// Course content
mod course;
mod assignment;

// Learner state
mod completion;
mod learner;
mod submission;
mod notification;
mod review;
mod progress;

// Re-exports
pub use id::*;

// Course
pub use course::{Course, CourseError, Module, Lesson, LessonKind, LessonContent, ChecklistItem, LessonRef};
pub use assignment::{Assignment, AssignmentCatalog, SubmissionKind};

// Learner
pub use completion::CompletionSet;
pub use learner::{Learner, LearnerProgress, ExperienceLevel, Preferences};
pub use submission::{Submission, SubmissionPayload, SubmissionStatus, SubmissionFilter};
pub use notification::{Notification, NotificationKind};
pub use review::{average_rating, PeerReview, MAX_FEEDBACK_CHARS, MAX_RATING, MIN_RATING};
pub use progress::{LessonState, AssignmentStatus, ModuleProgress};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

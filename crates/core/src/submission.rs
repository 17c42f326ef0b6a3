//! Submission model - a learner's answer to an assignment.

use serde::{Deserialize, Serialize};
use crate::assignment::SubmissionKind;
use crate::id::{AssignmentId, SubmissionId, UserId};
use crate::Time;

/// A learner's submission for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier
    pub id: SubmissionId,

    /// Who submitted
    pub user_id: UserId,

    /// Which assignment it answers
    pub assignment_id: AssignmentId,

    /// Submission payload
    pub payload: SubmissionPayload,

    /// Free-form notes from the learner
    #[serde(default)]
    pub notes: Option<String>,

    /// Review status
    pub status: SubmissionStatus,

    /// When it was submitted
    pub submitted_at: Time,
}

impl Submission {
    /// Create a new submission awaiting review.
    pub fn new(user_id: UserId, assignment_id: AssignmentId, payload: SubmissionPayload) -> Self {
        Self {
            id: SubmissionId::new(),
            user_id,
            assignment_id,
            payload,
            notes: None,
            status: SubmissionStatus::PendingReview,
            submitted_at: chrono::Utc::now(),
        }
    }

    /// Kind of the payload.
    pub fn kind(&self) -> SubmissionKind {
        self.payload.kind()
    }
}

/// Submitted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionPayload {
    /// Recorded audio, stored elsewhere
    Audio {
        /// Where the recording lives
        media_url: String,
        /// Length in seconds
        #[serde(default)]
        duration_secs: Option<u32>,
    },

    /// Recorded video, stored elsewhere
    Video {
        /// Where the recording lives
        media_url: String,
        /// Length in seconds
        #[serde(default)]
        duration_secs: Option<u32>,
    },

    /// Written answer
    Text {
        /// Answer text
        body: String,
    },
}

impl SubmissionPayload {
    /// Kind of this payload.
    pub fn kind(&self) -> SubmissionKind {
        match self {
            SubmissionPayload::Audio { .. } => SubmissionKind::Audio,
            SubmissionPayload::Video { .. } => SubmissionKind::Video,
            SubmissionPayload::Text { .. } => SubmissionKind::Text,
        }
    }

    /// Whether there is nothing to look at.
    pub fn is_empty(&self) -> bool {
        match self {
            SubmissionPayload::Audio { media_url, .. } | SubmissionPayload::Video { media_url, .. } => {
                media_url.trim().is_empty()
            }
            SubmissionPayload::Text { body } => body.trim().is_empty(),
        }
    }
}

/// Review status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Waiting for the instructor
    PendingReview,
    /// Instructor is reviewing
    InReview,
    /// Feedback given
    Reviewed,
    /// Instructor asked for another take
    NeedsRevision,
}

impl SubmissionStatus {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::PendingReview => "pending_review",
            SubmissionStatus::InReview => "in_review",
            SubmissionStatus::Reviewed => "reviewed",
            SubmissionStatus::NeedsRevision => "needs_revision",
        }
    }
}

/// Filter for querying submissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionFilter {
    /// Only this learner's submissions
    pub user_id: Option<UserId>,

    /// Only submissions for this assignment
    pub assignment_id: Option<AssignmentId>,
}

impl SubmissionFilter {
    /// Whether a submission passes the filter.
    pub fn matches(&self, submission: &Submission) -> bool {
        self.user_id.as_ref().map_or(true, |u| &submission.user_id == u)
            && self
                .assignment_id
                .as_ref()
                .map_or(true, |a| &submission.assignment_id == a)
    }
}

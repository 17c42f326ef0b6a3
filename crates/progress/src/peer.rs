//! Peer review service.
//!
//! Learners who have unlocked peer review and completed an assignment can
//! browse classmates' submissions for it and leave a star rating with
//! written feedback.

use serde::Serialize;
use tracing::info;
use vocalboost_core::{
    average_rating, AssignmentId, Learner, Notification, NotificationKind, PeerReview, Submission,
    SubmissionFilter, SubmissionId, UserId, MAX_FEEDBACK_CHARS,
};
use vocalboost_storage::Storage;
use crate::config::ProgressionConfig;
use crate::engine::CourseProgression;
use crate::error::{ProgressError, ServiceError};

/// A classmate's submission as shown to a reviewer.
#[derive(Debug, Clone, Serialize)]
pub struct PeerSubmission {
    /// The submission
    pub submission: Submission,

    /// Author's display name
    pub author_name: String,

    /// Reviews so far, oldest first
    pub reviews: Vec<PeerReview>,

    /// Mean star rating
    pub average_rating: Option<f32>,

    /// The viewing learner already reviewed it
    pub reviewed_by_me: bool,
}

/// Browses and reviews classmates' submissions.
pub struct PeerReviewService<'a, S: Storage + ?Sized> {
    storage: &'a mut S,
    config: ProgressionConfig,
}

impl<'a, S: Storage + ?Sized> PeerReviewService<'a, S> {
    /// Create a service over `storage`.
    pub fn new(storage: &'a mut S) -> Self {
        Self {
            storage,
            config: ProgressionConfig::default(),
        }
    }

    /// Replace the progression policy.
    pub fn with_config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    /// Other learners' submissions for an assignment, newest first.
    pub async fn submissions_for(
        &self,
        reviewer: &UserId,
        assignment_id: &AssignmentId,
    ) -> Result<Vec<PeerSubmission>, ServiceError> {
        self.ensure_can_review(reviewer, assignment_id).await?;

        let filter = SubmissionFilter {
            user_id: None,
            assignment_id: Some(assignment_id.clone()),
        };
        let mut found = Vec::new();
        for submission in self.storage.list_submissions(&filter).await? {
            if &submission.user_id == reviewer {
                continue;
            }
            let author_name = match self.storage.load_learner(&submission.user_id).await? {
                Some(author) => author.name,
                None => submission.user_id.to_string(),
            };
            let reviews = self.storage.list_peer_reviews(submission.id).await?;
            found.push(PeerSubmission {
                author_name,
                average_rating: average_rating(&reviews),
                reviewed_by_me: reviews.iter().any(|r| &r.reviewer_id == reviewer),
                reviews,
                submission,
            });
        }
        found.reverse();
        Ok(found)
    }

    /// Reviews left on a submission, oldest first.
    pub async fn reviews_of(&self, submission: SubmissionId) -> Result<Vec<PeerReview>, ServiceError> {
        Ok(self.storage.list_peer_reviews(submission).await?)
    }

    /// Rate a classmate's submission and tell its author.
    pub async fn review(
        &mut self,
        reviewer: &UserId,
        submission_id: SubmissionId,
        rating: u8,
        feedback: &str,
    ) -> Result<PeerReview, ServiceError> {
        if !PeerReview::is_valid_rating(rating) {
            return Err(ServiceError::InvalidRating(rating));
        }
        let feedback = feedback.trim();
        if feedback.is_empty() || feedback.chars().count() > MAX_FEEDBACK_CHARS {
            return Err(ServiceError::InvalidFeedback { max: MAX_FEEDBACK_CHARS });
        }

        let submission = self
            .storage
            .load_submission(submission_id)
            .await?
            .ok_or_else(|| ProgressError::not_found("submission", submission_id))?;
        if &submission.user_id == reviewer {
            return Err(ServiceError::OwnSubmission(submission_id));
        }
        let learner = self.ensure_can_review(reviewer, &submission.assignment_id).await?;

        let existing = self.storage.list_peer_reviews(submission_id).await?;
        if existing.iter().any(|r| &r.reviewer_id == reviewer) {
            return Err(ServiceError::AlreadyReviewed(submission_id));
        }

        let review = PeerReview::new(
            submission_id,
            submission.assignment_id.clone(),
            reviewer.clone(),
            submission.user_id.clone(),
            rating,
            feedback,
        );
        self.storage.save_peer_review(&review).await?;

        let note = Notification::new(
            submission.user_id.clone(),
            NotificationKind::PeerReview,
            "New Peer Review",
            format!("{} left a {}-star review on your assignment {}", learner.name, rating, submission.assignment_id),
        )
        .with_sender(learner.name.clone())
        .with_action_url(format!("/peer-review/{}", submission.assignment_id));
        self.storage.save_notification(&note).await?;

        info!(
            reviewer = %reviewer,
            author = %submission.user_id,
            submission = %submission_id,
            rating,
            "Recorded peer review"
        );
        Ok(review)
    }

    /// Peer review must be unlocked and the assignment completed by the reviewer.
    async fn ensure_can_review(&self, reviewer: &UserId, assignment_id: &AssignmentId) -> Result<Learner, ServiceError> {
        let learner = self
            .storage
            .load_learner(reviewer)
            .await?
            .ok_or_else(|| ProgressError::not_found("learner", reviewer))?;
        if self.storage.load_assignments().await?.get(assignment_id).is_none() {
            return Err(ProgressError::not_found("assignment", assignment_id).into());
        }

        let engine = CourseProgression::new(self.storage.load_course().await?).with_config(self.config.clone());
        let completion = self.storage.load_completions(reviewer).await?;
        if !engine.is_peer_review_unlocked(&learner) || !engine.can_review_assignment(assignment_id, &completion) {
            return Err(ServiceError::ReviewLocked(assignment_id.clone()));
        }
        Ok(learner)
    }
}

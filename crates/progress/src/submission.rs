//! Submission recording.
//!
//! A submission counts as completing its assignment the moment it is stored;
//! instructor review runs afterwards and never gates progression.

use tracing::{debug, info};
use vocalboost_core::{
    AssignmentId, LessonRef, Notification, NotificationKind, Submission, SubmissionId,
    SubmissionPayload, SubmissionStatus, UserId,
};
use vocalboost_storage::Storage;
use crate::config::ProgressionConfig;
use crate::engine::CourseProgression;
use crate::error::{ProgressError, ServiceError};

/// What happened when a submission was recorded.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    /// The stored submission
    pub submission: Submission,

    /// First completion of this assignment
    pub newly_completed: bool,

    /// This submission finished the assignment's module
    pub module_completed: bool,

    /// Lesson after the assignment's lesson
    pub next: Option<LessonRef>,
}

/// Records learner submissions and instructor review outcomes.
pub struct SubmissionRecorder<'a, S: Storage + ?Sized> {
    storage: &'a mut S,
    config: ProgressionConfig,
}

impl<'a, S: Storage + ?Sized> SubmissionRecorder<'a, S> {
    /// Create a recorder over `storage`.
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

    /// Store a submission and mark its assignment complete.
    pub async fn submit(
        &mut self,
        user: &UserId,
        assignment_id: &AssignmentId,
        payload: SubmissionPayload,
        notes: Option<String>,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let catalog = self.storage.load_assignments().await?;
        let assignment = catalog
            .get(assignment_id)
            .ok_or_else(|| ProgressError::not_found("assignment", assignment_id))?;
        let mut learner = self
            .storage
            .load_learner(user)
            .await?
            .ok_or_else(|| ProgressError::not_found("learner", user))?;

        let kind = payload.kind();
        if !assignment.accepts(kind) {
            return Err(ServiceError::unsupported(assignment_id, kind));
        }
        if payload.is_empty() {
            return Err(ServiceError::EmptySubmission(assignment_id.clone()));
        }

        let engine = CourseProgression::new(self.storage.load_course().await?).with_config(self.config.clone());
        let before = self.storage.load_completions(user).await?;
        if !engine.is_assignment_open(assignment_id, &before) {
            return Err(ServiceError::AssignmentLocked(assignment_id.clone()));
        }
        let location = engine.lesson_for_assignment(assignment_id);
        let was_complete = match &location {
            Some(at) => engine.is_module_complete(&at.module_id, &before)?,
            None => false,
        };

        let mut submission = Submission::new(user.clone(), assignment_id.clone(), payload);
        submission.notes = notes.filter(|n| !n.trim().is_empty());

        // The submission is stored before the completion. If recording the
        // completion fails the lesson reads as Pending, and resubmitting
        // finishes it.
        self.storage.save_submission(&submission).await?;

        let newly_completed = self.storage.record_completion(user, assignment_id).await?;
        if newly_completed {
            learner.progress.lessons_completed += 1;
            self.storage.save_learner(&learner).await?;
        }

        let completion = self.storage.load_completions(user).await?;
        let (module_completed, next) = match &location {
            Some(at) => (
                !was_complete && engine.is_module_complete(&at.module_id, &completion)?,
                engine.next_lesson(&at.module_id, &at.lesson_id)?,
            ),
            None => (false, None),
        };

        let receipt_note = Notification::new(
            user.clone(),
            NotificationKind::System,
            format!("{} submitted", assignment.title),
            "Your submission was received and is waiting for instructor review.",
        )
        .with_action_url(format!("/assignment/{}", assignment_id));
        self.storage.save_notification(&receipt_note).await?;

        if module_completed {
            if let Some(at) = &location {
                let module = engine.module_by_id(&at.module_id)?;
                let note = Notification::new(
                    user.clone(),
                    NotificationKind::System,
                    format!("Module {} complete", module.id),
                    format!("You finished every assignment in \"{}\".", module.title),
                )
                .with_action_url("/dashboard");
                self.storage.save_notification(&note).await?;
            }
        }

        info!(
            %user,
            assignment = %assignment_id,
            submission = %submission.id,
            kind = kind.as_str(),
            newly_completed,
            module_completed,
            "Recorded submission"
        );

        Ok(SubmissionReceipt {
            submission,
            newly_completed,
            module_completed,
            next,
        })
    }

    /// Move a submission through review and tell its author.
    pub async fn set_status(
        &mut self,
        id: SubmissionId,
        status: SubmissionStatus,
        reviewer: &str,
        feedback: Option<String>,
    ) -> Result<Submission, ServiceError> {
        let mut submission = self
            .storage
            .load_submission(id)
            .await?
            .ok_or_else(|| ProgressError::not_found("submission", id))?;

        if submission.status == status {
            debug!(submission = %id, status = status.as_str(), "Status unchanged");
            return Ok(submission);
        }
        submission.status = status;
        self.storage.save_submission(&submission).await?;

        if matches!(status, SubmissionStatus::Reviewed | SubmissionStatus::NeedsRevision) {
            let title = match status {
                SubmissionStatus::NeedsRevision => "Revision Requested",
                _ => "Instructor Feedback Available",
            };
            let message = feedback.unwrap_or_else(|| {
                format!("{} reviewed your submission for assignment {}", reviewer, submission.assignment_id)
            });
            let note = Notification::new(submission.user_id.clone(), NotificationKind::AssignmentFeedback, title, message)
                .with_sender(reviewer)
                .with_action_url(format!("/assignment/{}#instructor-feedback", submission.assignment_id));
            self.storage.save_notification(&note).await?;
        }

        info!(submission = %id, status = status.as_str(), reviewer, "Updated submission status");
        Ok(submission)
    }
}

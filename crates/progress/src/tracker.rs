//! Learner progress tracking service.

use std::collections::HashSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use vocalboost_core::{
    AssignmentId, AssignmentStatus, CompletionSet, LessonId, LessonKind, LessonRef, LessonState,
    ModuleId, ModuleProgress, SubmissionFilter, SubmissionStatus, UserId,
};
use vocalboost_storage::Storage;
use crate::config::ProgressionConfig;
use crate::engine::CourseProgression;
use crate::error::{ProgressError, ServiceError};

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Progress through one module.
    async fn get_module_progress(&self, user: &UserId, module_id: &ModuleId) -> Result<ModuleProgress, ServiceError>;

    /// Where the learner should continue.
    async fn get_resume_point(&self, user: &UserId) -> Result<Option<LessonRef>, ServiceError>;

    /// Take a progress snapshot.
    async fn snapshot(&self, user: &UserId) -> Result<LearnerSnapshot, ServiceError>;

    /// One summary row per enrolled learner, by name.
    async fn overview(&self) -> Result<Vec<LearnerSummary>, ServiceError>;
}

/// A learner's position in the course at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct LearnerSnapshot {
    /// When snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Learner
    pub user_id: UserId,

    /// Learner display name
    pub name: String,

    /// Per-module breakdown, in course order
    pub modules: Vec<ModuleSnapshot>,

    /// Assignments completed across the course
    pub overall: ModuleProgress,

    /// First uncompleted assignment lesson
    pub resume_at: Option<LessonRef>,

    /// Whether peer review is open to the learner
    pub peer_review_unlocked: bool,

    /// Lessons left before peer review opens
    pub lessons_until_peer_review: usize,
}

/// One module inside a [`LearnerSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSnapshot {
    /// Module id
    pub module_id: ModuleId,
    /// Module title
    pub title: String,
    /// Whether the module is open
    pub unlocked: bool,
    /// Whether every assignment is done
    pub complete: bool,
    /// Counts
    pub progress: ModuleProgress,
    /// Lessons in order
    pub lessons: Vec<LessonSnapshot>,
}

/// One lesson inside a [`ModuleSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct LessonSnapshot {
    /// Lesson id
    pub lesson_id: LessonId,
    /// Lesson title
    pub title: String,
    /// Lesson kind
    pub kind: LessonKind,
    /// Learner-facing state
    pub state: LessonState,
    /// Assignment status, for assignment lessons
    pub status: Option<AssignmentStatus>,
}

/// One learner's row in the instructor overview.
#[derive(Debug, Clone, Serialize)]
pub struct LearnerSummary {
    /// Learner
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Assignments completed across the course
    pub overall: ModuleProgress,
    /// Where the learner should continue
    pub resume_at: Option<LessonRef>,
    /// Submissions made
    pub submissions: usize,
    /// Submissions still waiting on the instructor
    pub awaiting_review: usize,
    /// Latest submission time
    pub last_active: Option<DateTime<Utc>>,
    /// Whether peer review is open to the learner
    pub peer_review_unlocked: bool,
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<'a, S: Storage + ?Sized> {
    storage: &'a S,
    config: ProgressionConfig,
}

impl<'a, S: Storage + ?Sized> BasicProgressTracker<'a, S> {
    /// Create a new progress tracker.
    pub fn new(storage: &'a S) -> Self {
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

    /// Build the engine over the stored course.
    pub async fn engine(&self) -> Result<CourseProgression, ServiceError> {
        let course = self.storage.load_course().await?;
        Ok(CourseProgression::new(course).with_config(self.config.clone()))
    }

    /// Assignments submitted but not yet in the completion set.
    async fn in_flight(&self, user: &UserId, completion: &CompletionSet) -> Result<HashSet<AssignmentId>, ServiceError> {
        let filter = SubmissionFilter {
            user_id: Some(user.clone()),
            assignment_id: None,
        };
        Ok(self
            .storage
            .list_submissions(&filter)
            .await?
            .into_iter()
            .map(|s| s.assignment_id)
            .filter(|id| !completion.contains(id))
            .collect())
    }
}

#[async_trait]
impl<'a, S: Storage + ?Sized> ProgressTracker for BasicProgressTracker<'a, S> {
    async fn get_module_progress(&self, user: &UserId, module_id: &ModuleId) -> Result<ModuleProgress, ServiceError> {
        let engine = self.engine().await?;
        let completion = self.storage.load_completions(user).await?;
        Ok(engine.module_progress(module_id, &completion)?)
    }

    async fn get_resume_point(&self, user: &UserId) -> Result<Option<LessonRef>, ServiceError> {
        let engine = self.engine().await?;
        let completion = self.storage.load_completions(user).await?;
        Ok(engine.resume_point(&completion))
    }

    async fn snapshot(&self, user: &UserId) -> Result<LearnerSnapshot, ServiceError> {
        let learner = self
            .storage
            .load_learner(user)
            .await?
            .ok_or_else(|| ProgressError::not_found("learner", user))?;
        let engine = self.engine().await?;
        let completion = self.storage.load_completions(user).await?;
        let submitted = self.in_flight(user, &completion).await?;

        let mut modules = Vec::new();
        for module in &engine.course().modules {
            let mut lessons = Vec::new();
            for lesson in &module.lessons {
                lessons.push(LessonSnapshot {
                    lesson_id: lesson.id.clone(),
                    title: lesson.title.clone(),
                    kind: lesson.kind(),
                    state: engine.lesson_state(&module.id, &lesson.id, &completion, &submitted)?,
                    status: engine.assignment_status(lesson, &completion),
                });
            }

            modules.push(ModuleSnapshot {
                module_id: module.id.clone(),
                title: module.title.clone(),
                unlocked: engine.is_module_unlocked(&module.id, &completion)?,
                complete: engine.is_module_complete(&module.id, &completion)?,
                progress: engine.module_progress(&module.id, &completion)?,
                lessons,
            });
        }

        debug!(%user, completed = completion.len(), "Built progress snapshot");

        Ok(LearnerSnapshot {
            timestamp: Utc::now(),
            user_id: learner.id.clone(),
            name: learner.name.clone(),
            modules,
            overall: engine.course_progress(&completion),
            resume_at: engine.resume_point(&completion),
            peer_review_unlocked: engine.is_peer_review_unlocked(&learner),
            lessons_until_peer_review: engine.lessons_until_peer_review(&learner),
        })
    }

    async fn overview(&self) -> Result<Vec<LearnerSummary>, ServiceError> {
        let engine = self.engine().await?;
        let mut learners = self.storage.list_learners().await?;
        learners.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let mut rows = Vec::with_capacity(learners.len());
        for learner in learners {
            let completion = self.storage.load_completions(&learner.id).await?;
            let filter = SubmissionFilter {
                user_id: Some(learner.id.clone()),
                assignment_id: None,
            };
            let submissions = self.storage.list_submissions(&filter).await?;

            rows.push(LearnerSummary {
                overall: engine.course_progress(&completion),
                resume_at: engine.resume_point(&completion),
                submissions: submissions.len(),
                awaiting_review: submissions
                    .iter()
                    .filter(|s| matches!(s.status, SubmissionStatus::PendingReview | SubmissionStatus::InReview))
                    .count(),
                last_active: submissions.iter().map(|s| s.submitted_at).max(),
                peer_review_unlocked: engine.is_peer_review_unlocked(&learner),
                user_id: learner.id,
                name: learner.name,
                email: learner.email,
            });
        }
        debug!(learners = rows.len(), "Built learner overview");
        Ok(rows)
    }
}

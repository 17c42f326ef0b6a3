//! In-process storage.
//!
//! Owns all state in plain collections. Callers hand it to services
//! explicitly; nothing is shared through globals.

use std::collections::HashMap;
use async_trait::async_trait;
use tracing::debug;
use vocalboost_core::{
    AssignmentCatalog, AssignmentId, CompletionSet, Course, Learner, Notification, NotificationId,
    PeerReview, Submission, SubmissionFilter, SubmissionId, UserId,
};
use super::{Result, Storage, StorageError};

/// In-memory storage backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    course: Option<Course>,
    assignments: AssignmentCatalog,
    learners: HashMap<UserId, Learner>,
    completions: HashMap<UserId, CompletionSet>,
    submissions: Vec<Submission>,
    notifications: Vec<Notification>,
    reviews: Vec<PeerReview>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the built-in course and demo learner.
    pub async fn with_fixtures() -> Result<Self> {
        let mut storage = Self::new();
        crate::fixtures::seed(&mut storage).await?;
        Ok(storage)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load_course(&self) -> Result<Course> {
        self.course
            .clone()
            .ok_or_else(|| StorageError::NotFound("course".to_string()))
    }

    async fn save_course(&mut self, course: &Course) -> Result<()> {
        course
            .validate()
            .map_err(|e| StorageError::Invalid(e.to_string()))?;
        self.course = Some(course.clone());
        Ok(())
    }

    async fn load_assignments(&self) -> Result<AssignmentCatalog> {
        Ok(self.assignments.clone())
    }

    async fn save_assignments(&mut self, catalog: &AssignmentCatalog) -> Result<()> {
        self.assignments = catalog.clone();
        Ok(())
    }

    async fn save_learner(&mut self, learner: &Learner) -> Result<()> {
        self.learners.insert(learner.id.clone(), learner.clone());
        Ok(())
    }

    async fn load_learner(&self, id: &UserId) -> Result<Option<Learner>> {
        Ok(self.learners.get(id).cloned())
    }

    async fn list_learners(&self) -> Result<Vec<Learner>> {
        let mut learners: Vec<_> = self.learners.values().cloned().collect();
        learners.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(learners)
    }

    async fn load_completions(&self, user: &UserId) -> Result<CompletionSet> {
        Ok(self.completions.get(user).cloned().unwrap_or_default())
    }

    async fn record_completion(&mut self, user: &UserId, assignment: &AssignmentId) -> Result<bool> {
        let added = self
            .completions
            .entry(user.clone())
            .or_default()
            .insert(assignment.clone());
        debug!(%user, %assignment, added, "Recorded completion");
        Ok(added)
    }

    async fn save_submission(&mut self, submission: &Submission) -> Result<()> {
        match self.submissions.iter_mut().find(|s| s.id == submission.id) {
            Some(existing) => *existing = submission.clone(),
            None => self.submissions.push(submission.clone()),
        }
        Ok(())
    }

    async fn load_submission(&self, id: SubmissionId) -> Result<Option<Submission>> {
        Ok(self.submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        let mut found: Vec<_> = self
            .submissions
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(found)
    }

    async fn save_notification(&mut self, notification: &Notification) -> Result<()> {
        match self.notifications.iter_mut().find(|n| n.id == notification.id) {
            Some(existing) => *existing = notification.clone(),
            None => self.notifications.push(notification.clone()),
        }
        Ok(())
    }

    async fn load_notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        Ok(self.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list_notifications(&self, user: &UserId) -> Result<Vec<Notification>> {
        let mut found: Vec<_> = self
            .notifications
            .iter()
            .filter(|n| &n.user_id == user)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found)
    }

    async fn save_peer_review(&mut self, review: &PeerReview) -> Result<()> {
        match self.reviews.iter_mut().find(|r| r.id == review.id) {
            Some(existing) => *existing = review.clone(),
            None => self.reviews.push(review.clone()),
        }
        Ok(())
    }

    async fn list_peer_reviews(&self, submission: SubmissionId) -> Result<Vec<PeerReview>> {
        let mut found: Vec<_> = self
            .reviews
            .iter()
            .filter(|r| r.submission_id == submission)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }
}

//! JSON file storage implementation.
//!
//! Stores data as JSON files under a data directory (`.vocalboost` by
//! default):
//!
//! ```text
//! course.json
//! assignments.json
//! learners/<user>.json
//! completions/<user>.json
//! submissions/<id>.json
//! notifications/<id>.json
//! reviews/<id>.json
//! ```

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use vocalboost_core::{
    AssignmentCatalog, AssignmentId, CompletionSet, Course, Learner, Notification, NotificationId,
    PeerReview, PeerReviewId, Submission, SubmissionFilter, SubmissionId, UserId,
};
use super::{Result, Storage, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Open storage rooted at `root`, creating the subdirectories it needs.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("learners")).await?;
        fs::create_dir_all(root.join("completions")).await?;
        fs::create_dir_all(root.join("submissions")).await?;
        fs::create_dir_all(root.join("notifications")).await?;
        fs::create_dir_all(root.join("reviews")).await?;

        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a course has been written yet.
    pub async fn is_seeded(&self) -> bool {
        fs::metadata(self.course_path()).await.is_ok()
    }

    fn course_path(&self) -> PathBuf {
        self.root.join("course.json")
    }
    fn assignments_path(&self) -> PathBuf {
        self.root.join("assignments.json")
    }
    fn learner_path(&self, id: &UserId) -> PathBuf {
        self.root.join("learners").join(format!("{}.json", file_stem(id.as_str())))
    }
    fn completions_path(&self, id: &UserId) -> PathBuf {
        self.root.join("completions").join(format!("{}.json", file_stem(id.as_str())))
    }
    fn submission_path(&self, id: SubmissionId) -> PathBuf {
        self.root.join("submissions").join(format!("{}.json", id))
    }
    fn notification_path(&self, id: NotificationId) -> PathBuf {
        self.root.join("notifications").join(format!("{}.json", id))
    }
    fn review_path(&self, id: PeerReviewId) -> PathBuf {
        self.root.join("reviews").join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_course(&self) -> Result<Course> {
        let course: Course = read_json(&self.course_path())
            .await?
            .ok_or_else(|| StorageError::NotFound("course".to_string()))?;
        course
            .validate()
            .map_err(|e| StorageError::Invalid(e.to_string()))?;
        Ok(course)
    }

    async fn save_course(&mut self, course: &Course) -> Result<()> {
        course
            .validate()
            .map_err(|e| StorageError::Invalid(e.to_string()))?;
        write_json(&self.course_path(), course).await
    }

    async fn load_assignments(&self) -> Result<AssignmentCatalog> {
        Ok(read_json(&self.assignments_path()).await?.unwrap_or_default())
    }

    async fn save_assignments(&mut self, catalog: &AssignmentCatalog) -> Result<()> {
        write_json(&self.assignments_path(), catalog).await
    }

    async fn save_learner(&mut self, learner: &Learner) -> Result<()> {
        write_json(&self.learner_path(&learner.id), learner).await
    }

    async fn load_learner(&self, id: &UserId) -> Result<Option<Learner>> {
        read_json(&self.learner_path(id)).await
    }

    async fn list_learners(&self) -> Result<Vec<Learner>> {
        let mut learners: Vec<Learner> = list_dir(&self.root.join("learners")).await?;
        learners.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(learners)
    }

    async fn load_completions(&self, user: &UserId) -> Result<CompletionSet> {
        Ok(read_json(&self.completions_path(user)).await?.unwrap_or_default())
    }

    async fn record_completion(&mut self, user: &UserId, assignment: &AssignmentId) -> Result<bool> {
        let mut set = self.load_completions(user).await?;
        if !set.insert(assignment.clone()) {
            return Ok(false);
        }
        write_json(&self.completions_path(user), &set).await?;
        debug!(%user, %assignment, "Recorded completion");
        Ok(true)
    }

    async fn save_submission(&mut self, submission: &Submission) -> Result<()> {
        write_json(&self.submission_path(submission.id), submission).await
    }

    async fn load_submission(&self, id: SubmissionId) -> Result<Option<Submission>> {
        read_json(&self.submission_path(id)).await
    }

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        let all: Vec<Submission> = list_dir(&self.root.join("submissions")).await?;
        let mut found: Vec<_> = all.into_iter().filter(|s| filter.matches(s)).collect();
        found.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(found)
    }

    async fn save_notification(&mut self, notification: &Notification) -> Result<()> {
        write_json(&self.notification_path(notification.id), notification).await
    }

    async fn load_notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        read_json(&self.notification_path(id)).await
    }

    async fn list_notifications(&self, user: &UserId) -> Result<Vec<Notification>> {
        let all: Vec<Notification> = list_dir(&self.root.join("notifications")).await?;
        let mut found: Vec<_> = all.into_iter().filter(|n| &n.user_id == user).collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found)
    }

    async fn save_peer_review(&mut self, review: &PeerReview) -> Result<()> {
        write_json(&self.review_path(review.id), review).await
    }

    async fn list_peer_reviews(&self, submission: SubmissionId) -> Result<Vec<PeerReview>> {
        let all: Vec<PeerReview> = list_dir(&self.root.join("reviews")).await?;
        let mut found: Vec<_> = all.into_iter().filter(|r| r.submission_id == submission).collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }
}

/// Percent-encode a user-chosen id into a file stem. Distinct ids give
/// distinct stems and no stem can contain a path separator.
fn file_stem(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes()).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable {}: {}", entry.path().display(), e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use vocalboost_core::{NotificationKind, SubmissionPayload};

    #[tokio::test]
    async fn test_unseeded_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(!storage.is_seeded().await);
        assert!(matches!(storage.load_course().await, Err(StorageError::NotFound(_))));
        assert!(storage.load_assignments().await.unwrap().is_empty());
        assert!(storage.load_learner(&"user-1".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = JsonStorage::new(dir.path()).await.unwrap();
            fixtures::seed(&mut storage).await.unwrap();
        }

        let storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(storage.is_seeded().await);
        assert_eq!(storage.load_course().await.unwrap(), fixtures::vocal_boost_course());
        assert_eq!(storage.load_assignments().await.unwrap().len(), 10);

        let user = UserId::new(fixtures::DEMO_USER);
        let completions = storage.load_completions(&user).await.unwrap();
        assert!(completions.contains(&"1a".into()));
        assert!(completions.contains(&"1b".into()));
        assert_eq!(storage.list_learners().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_completion_persists_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let user = UserId::new("user-2");

        assert!(storage.record_completion(&user, &"2a".into()).await.unwrap());
        assert!(!storage.record_completion(&user, &"2a".into()).await.unwrap());
        assert_eq!(storage.load_completions(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submissions_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        for (user, assignment) in [("user-1", "1a"), ("user-1", "1b"), ("user-2", "1a")] {
            let sub = Submission::new(user.into(), assignment.into(), SubmissionPayload::Text { body: "take".into() });
            storage.save_submission(&sub).await.unwrap();
        }

        let filter = SubmissionFilter { user_id: None, assignment_id: Some("1a".into()) };
        assert_eq!(storage.list_submissions(&filter).await.unwrap().len(), 2);
        let filter = SubmissionFilter { user_id: Some("user-1".into()), assignment_id: None };
        let mine = storage.list_submissions(&filter).await.unwrap();
        assert_eq!(mine.len(), 2);

        let loaded = storage.load_submission(mine[0].id).await.unwrap().unwrap();
        assert_eq!(loaded, mine[0]);
    }

    #[tokio::test]
    async fn test_peer_reviews_persist_per_submission() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let reviewed = SubmissionId::new();

        let mut first = PeerReview::new(reviewed, "1a".into(), "user-2".into(), "user-1".into(), 4, "Steady tone");
        storage.save_peer_review(&first).await.unwrap();
        let other = PeerReview::new(SubmissionId::new(), "1a".into(), "user-2".into(), "user-3".into(), 2, "Rushed");
        storage.save_peer_review(&other).await.unwrap();

        first.is_helpful = true;
        storage.save_peer_review(&first).await.unwrap();

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        let found = reopened.list_peer_reviews(reviewed).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].is_helpful);
        assert_eq!(found[0].rating, 4);
    }

    #[tokio::test]
    async fn test_notification_roundtrip_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let mut note = Notification::new("user-1".into(), NotificationKind::PeerReview, "New review", "Sarah left a review");
        storage.save_notification(&note).await.unwrap();

        note.is_read = true;
        storage.save_notification(&note).await.unwrap();

        let loaded = storage.load_notification(note.id).await.unwrap().unwrap();
        assert!(loaded.is_read);
        assert_eq!(storage.list_notifications(&"user-1".into()).await.unwrap().len(), 1);
        assert!(storage.list_notifications(&"user-2".into()).await.unwrap().is_empty());
    }

    #[test]
    fn test_file_stem_stays_in_directory() {
        assert_eq!(file_stem("user-1"), "user-1");
        assert!(!file_stem("../etc/passwd").contains('/'));
        assert_ne!(file_stem("a.b"), file_stem("a_b"));
        assert_ne!(file_stem("a/b"), file_stem("a%2Fb"));
    }

    #[tokio::test]
    async fn test_similar_user_ids_do_not_share_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let dotted = UserId::new("a.b");
        let underscored = UserId::new("a_b");

        storage.record_completion(&dotted, &"1a".into()).await.unwrap();
        assert!(storage.load_completions(&underscored).await.unwrap().is_empty());
        assert_eq!(storage.load_completions(&dotted).await.unwrap().len(), 1);

        let mut learner = fixtures::demo_learner();
        learner.id = dotted.clone();
        storage.save_learner(&learner).await.unwrap();
        assert!(storage.load_learner(&underscored).await.unwrap().is_none());
        assert!(storage.load_learner(&dotted).await.unwrap().is_some());

        let mut escaping = fixtures::demo_learner();
        escaping.id = "../outside".into();
        storage.save_learner(&escaping).await.unwrap();
        assert!(storage.root().join("learners").join("..%2Foutside.json").exists());
        assert!(!dir.path().join("outside.json").exists());
    }
}

//! Learner model - profile and progress counters.

use serde::{Deserialize, Serialize};
use crate::id::UserId;

/// A learner enrolled in the course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learner {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Self-reported level
    pub experience_level: ExperienceLevel,

    /// Enrollment date
    pub enrolled_on: chrono::NaiveDate,

    /// Short profile text
    #[serde(default)]
    pub bio: Option<String>,

    /// Progress counters
    #[serde(default)]
    pub progress: LearnerProgress,

    /// Profile preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Learner experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// New to singing lessons
    Beginner,
    /// Some training
    Intermediate,
    /// Years of training
    Advanced,
    /// Sings for a living
    Professional,
}

/// Progress counters kept on the learner profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerProgress {
    /// Lessons completed so far
    pub lessons_completed: usize,

    /// Total hours of practice
    pub practice_hours: f32,

    /// Consecutive practice days
    pub current_streak: u32,
}

/// Profile preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Receive notifications
    pub notifications: bool,

    /// Profile visible to other learners
    pub public_profile: bool,

    /// Take part in peer review
    pub peer_review: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            public_profile: true,
            peer_review: true,
        }
    }
}

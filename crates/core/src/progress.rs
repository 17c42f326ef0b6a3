//! Derived progress values. Nothing here is stored.

use serde::{Deserialize, Serialize};

/// Where a lesson stands from the learner's point of view.
///
/// `Locked -> Available -> Pending -> Completed`. Lessons unlock strictly in
/// course order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonState {
    /// Not reachable yet
    Locked,
    /// Reachable, nothing submitted
    Available,
    /// Submitted, not yet counted as complete
    Pending,
    /// Assignment completed
    Completed,
}

impl LessonState {
    /// Uppercase label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            LessonState::Locked => "LOCKED",
            LessonState::Available => "AVAILABLE",
            LessonState::Pending => "PENDING",
            LessonState::Completed => "COMPLETED",
        }
    }
}

/// Status of an assignment lesson. Intro-style lessons have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Assignment id is in the completion set
    Completed,
    /// Not completed yet
    Pending,
}

impl AssignmentStatus {
    /// Uppercase label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentStatus::Completed => "COMPLETED",
            AssignmentStatus::Pending => "PENDING",
        }
    }
}

/// Progress through one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProgress {
    /// Completed assignment lessons
    pub completed_assignments: usize,

    /// Total assignment lessons
    pub total_assignments: usize,

    /// Percentage complete
    pub percentage: f32,
}

impl ModuleProgress {
    /// Build from counts.
    pub fn from_counts(completed: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            (completed as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        Self {
            completed_assignments: completed,
            total_assignments: total,
            percentage,
        }
    }

    /// Whether every assignment in the module is done.
    pub fn is_complete(&self) -> bool {
        self.completed_assignments == self.total_assignments
    }
}

impl Default for ModuleProgress {
    fn default() -> Self {
        Self::from_counts(0, 0)
    }
}

//! Notification model.

use serde::{Deserialize, Serialize};
use crate::id::{NotificationId, UserId};
use crate::Time;

/// A message shown in a learner's notification inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier
    pub id: NotificationId,

    /// Recipient
    pub user_id: UserId,

    /// Category
    pub kind: NotificationKind,

    /// Headline
    pub title: String,

    /// Body text
    pub message: String,

    /// When it was raised
    pub timestamp: Time,

    /// Read flag
    pub is_read: bool,

    /// Where clicking it leads
    #[serde(default)]
    pub action_url: Option<String>,

    /// Who caused it, if a person
    #[serde(default)]
    pub sender_name: Option<String>,
}

impl Notification {
    /// Create an unread notification.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: chrono::Utc::now(),
            is_read: false,
            action_url: None,
            sender_name: None,
        }
    }

    /// Set the action url.
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Set the sender.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender_name = Some(sender.into());
        self
    }
}

/// Notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A classmate reviewed your work
    PeerReview,
    /// The instructor reviewed your work
    AssignmentFeedback,
    /// Community board activity
    CommunityPost,
    /// Course events
    System,
}

impl NotificationKind {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PeerReview => "peer_review",
            NotificationKind::AssignmentFeedback => "assignment_feedback",
            NotificationKind::CommunityPost => "community_post",
            NotificationKind::System => "system",
        }
    }
}

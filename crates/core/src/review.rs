//! Peer review model - one learner's rating of another's submission.

use serde::{Deserialize, Serialize};
use crate::id::{AssignmentId, PeerReviewId, SubmissionId, UserId};
use crate::Time;

/// Lowest star rating.
pub const MIN_RATING: u8 = 1;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Longest accepted feedback, in characters.
pub const MAX_FEEDBACK_CHARS: usize = 500;

/// A star rating and written feedback left on a peer's submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReview {
    /// Unique identifier
    pub id: PeerReviewId,

    /// Reviewed submission
    pub submission_id: SubmissionId,

    /// Assignment the submission answers
    pub assignment_id: AssignmentId,

    /// Learner who wrote the review
    pub reviewer_id: UserId,

    /// Learner whose work was reviewed
    pub author_id: UserId,

    /// Stars, 1 to 5
    pub rating: u8,

    /// Written feedback
    pub feedback: String,

    /// Author marked the review as helpful
    #[serde(default)]
    pub is_helpful: bool,

    /// When it was written
    pub created_at: Time,
}

impl PeerReview {
    /// Create a review dated now.
    pub fn new(
        submission_id: SubmissionId,
        assignment_id: AssignmentId,
        reviewer_id: UserId,
        author_id: UserId,
        rating: u8,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            id: PeerReviewId::new(),
            submission_id,
            assignment_id,
            reviewer_id,
            author_id,
            rating,
            feedback: feedback.into(),
            is_helpful: false,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whether `rating` is a whole number of stars in range.
    pub fn is_valid_rating(rating: u8) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }
}

/// Mean star rating, or `None` without reviews.
pub fn average_rating<'a>(reviews: impl IntoIterator<Item = &'a PeerReview>) -> Option<f32> {
    let (sum, count) = reviews
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), r| (sum + u32::from(r.rating), count + 1));
    (count > 0).then(|| sum as f32 / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> PeerReview {
        PeerReview::new(SubmissionId::new(), "1a".into(), "user-2".into(), "user-1".into(), rating, "Nice breath support")
    }

    #[test]
    fn test_rating_bounds() {
        assert!(!PeerReview::is_valid_rating(0));
        assert!(PeerReview::is_valid_rating(1));
        assert!(PeerReview::is_valid_rating(5));
        assert!(!PeerReview::is_valid_rating(6));
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&Vec::<PeerReview>::new()), None);
        let reviews = vec![review(5), review(4), review(3)];
        assert_eq!(average_rating(&reviews), Some(4.0));
    }
}

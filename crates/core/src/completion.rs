//! Completion set - the assignments a learner has finished.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::id::AssignmentId;

/// Set of completed assignment ids for one learner.
///
/// Grows monotonically; only the submission recorder inserts into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeSet<AssignmentId>);

impl CompletionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been completed.
    pub fn contains(&self, id: &AssignmentId) -> bool {
        self.0.contains(id)
    }

    /// Record a completion. Returns `true` if it was not already present.
    pub fn insert(&mut self, id: AssignmentId) -> bool {
        self.0.insert(id)
    }

    /// Number of completed assignments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is completed yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate completed ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &AssignmentId> {
        self.0.iter()
    }
}

impl<I: Into<AssignmentId>> FromIterator<I> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_novelty() {
        let mut set = CompletionSet::new();
        assert!(set.insert("1a".into()));
        assert!(!set.insert("1a".into()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_collect_from_strs() {
        let set: CompletionSet = ["1a", "1b"].into_iter().collect();
        assert!(set.contains(&"1b".into()));
        assert!(!set.contains(&"1c".into()));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["1a","1b"]"#);
    }
}

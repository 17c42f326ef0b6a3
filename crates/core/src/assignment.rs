//! Assignment model - the submittable tasks behind assignment lessons.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::id::{AssignmentId, ModuleId};

/// A submittable task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier
    pub id: AssignmentId,

    /// Owning module
    pub module_id: ModuleId,

    /// Title
    pub title: String,

    /// What the learner is asked to do
    pub description: String,

    /// Submission kinds the assignment accepts
    pub accepted_kinds: Vec<SubmissionKind>,
}

impl Assignment {
    /// Whether a submission of `kind` is accepted.
    pub fn accepts(&self, kind: SubmissionKind) -> bool {
        self.accepted_kinds.contains(&kind)
    }
}

/// Media kinds a learner can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    /// Audio recording
    Audio,
    /// Video recording
    Video,
    /// Written answer
    Text,
}

impl SubmissionKind {
    /// Every kind, in display order.
    pub const ALL: [SubmissionKind; 3] = [SubmissionKind::Audio, SubmissionKind::Video, SubmissionKind::Text];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Audio => "audio",
            SubmissionKind::Video => "video",
            SubmissionKind::Text => "text",
        }
    }
}

impl std::str::FromStr for SubmissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "audio" => Ok(SubmissionKind::Audio),
            "video" => Ok(SubmissionKind::Video),
            "text" => Ok(SubmissionKind::Text),
            other => Err(format!("unknown submission kind: {}", other)),
        }
    }
}

/// All assignment definitions, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentCatalog {
    assignments: Vec<Assignment>,
}

impl AssignmentCatalog {
    /// Wrap a list of assignments.
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Look up an assignment.
    pub fn get(&self, id: &AssignmentId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| &a.id == id)
    }

    /// Assignments owned by a module, in declared order.
    pub fn by_module<'a>(&'a self, module_id: &'a ModuleId) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments.iter().filter(move |a| &a.module_id == module_id)
    }

    /// Distinct module ids, sorted.
    pub fn module_ids(&self) -> Vec<ModuleId> {
        self.assignments
            .iter()
            .map(|a| a.module_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Iterate all assignments.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: &str, module: &str, kinds: &[SubmissionKind]) -> Assignment {
        Assignment {
            id: id.into(),
            module_id: module.into(),
            title: format!("Assignment {}", id),
            description: String::new(),
            accepted_kinds: kinds.to_vec(),
        }
    }

    #[test]
    fn test_catalog_lookup_and_grouping() {
        let catalog = AssignmentCatalog::new(vec![
            assignment("2a", "2", &SubmissionKind::ALL),
            assignment("1a", "1", &SubmissionKind::ALL),
            assignment("1b", "1", &[SubmissionKind::Text]),
        ]);

        assert_eq!(catalog.get(&"1b".into()).unwrap().title, "Assignment 1b");
        assert!(catalog.get(&"9z".into()).is_none());

        let module_one = ModuleId::new("1");
        let ids: Vec<_> = catalog.by_module(&module_one).map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1a", "1b"]);
        assert_eq!(catalog.module_ids(), vec![ModuleId::new("1"), ModuleId::new("2")]);
    }

    #[test]
    fn test_accepts_only_declared_kinds() {
        let a = assignment("1b", "1", &[SubmissionKind::Text]);
        assert!(a.accepts(SubmissionKind::Text));
        assert!(!a.accepts(SubmissionKind::Audio));
    }

    #[test]
    fn test_parse_submission_kind() {
        assert_eq!("Video".parse::<SubmissionKind>().unwrap(), SubmissionKind::Video);
        assert!("podcast".parse::<SubmissionKind>().is_err());
    }
}

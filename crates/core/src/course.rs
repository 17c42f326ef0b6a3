//! Course model - modules and their ordered lessons.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::assignment::SubmissionKind;
use crate::id::{AssignmentId, LessonId, ModuleId};

/// Errors found while validating a course definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseError {
    /// Two modules share the same id
    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    /// Two lessons in one module share the same id
    #[error("duplicate lesson id {lesson} in module {module}")]
    DuplicateLesson {
        /// Owning module
        module: ModuleId,
        /// Repeated lesson id
        lesson: LessonId,
    },

    /// A module or lesson id is blank
    #[error("blank {0} id")]
    BlankId(&'static str),
}

/// A course: the ordered list of modules a learner works through.
///
/// Module order is the declared order. A course is immutable once built;
/// deserialized courses should go through [`Course::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course title
    pub title: String,

    /// Modules in curriculum order
    pub modules: Vec<Module>,
}

impl Course {
    /// Build a validated course.
    pub fn new(title: impl Into<String>, modules: Vec<Module>) -> Result<Self, CourseError> {
        let course = Self {
            title: title.into(),
            modules,
        };
        course.validate()?;
        Ok(course)
    }

    /// Check id uniqueness rules.
    pub fn validate(&self) -> Result<(), CourseError> {
        let mut module_ids = HashSet::new();
        for module in &self.modules {
            if module.id.as_str().trim().is_empty() {
                return Err(CourseError::BlankId("module"));
            }
            if !module_ids.insert(&module.id) {
                return Err(CourseError::DuplicateModule(module.id.clone()));
            }

            let mut lesson_ids = HashSet::new();
            for lesson in &module.lessons {
                if lesson.id.as_str().trim().is_empty() {
                    return Err(CourseError::BlankId("lesson"));
                }
                if !lesson_ids.insert(&lesson.id) {
                    return Err(CourseError::DuplicateLesson {
                        module: module.id.clone(),
                        lesson: lesson.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Iterate every lesson in global order, paired with its module.
    pub fn lessons(&self) -> impl Iterator<Item = (&Module, &Lesson)> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter().map(move |l| (m, l)))
    }

    /// Total number of assignment lessons in the course.
    pub fn assignment_count(&self) -> usize {
        self.lessons().filter(|(_, l)| l.is_assignment()).count()
    }
}

/// A named, ordered group of lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module identifier
    pub id: ModuleId,

    /// Module title
    pub title: String,

    /// Lessons in order
    pub lessons: Vec<Lesson>,
}

impl Module {
    /// Create an empty module.
    pub fn new(id: impl Into<ModuleId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lessons: Vec::new(),
        }
    }

    /// Append a lesson.
    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Assignment ids referenced by this module's lessons, in order.
    pub fn assignment_ids(&self) -> impl Iterator<Item = &AssignmentId> {
        self.lessons.iter().filter_map(Lesson::assignment_id)
    }
}

/// The smallest navigable unit of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson identifier (unique within its module)
    pub id: LessonId,

    /// Lesson title
    pub title: String,

    /// Kind-specific payload
    pub content: LessonContent,
}

impl Lesson {
    /// Create an intro lesson.
    pub fn intro(id: impl Into<LessonId>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: LessonContent::Intro { text: text.into() },
        }
    }

    /// Create an assignment lesson.
    pub fn assignment(
        id: impl Into<LessonId>,
        title: impl Into<String>,
        assignment_id: impl Into<AssignmentId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: LessonContent::Assignment {
                assignment_id: assignment_id.into(),
            },
        }
    }

    /// Lesson kind.
    pub fn kind(&self) -> LessonKind {
        self.content.kind()
    }

    /// The referenced assignment, for assignment lessons.
    pub fn assignment_id(&self) -> Option<&AssignmentId> {
        match &self.content {
            LessonContent::Assignment { assignment_id } => Some(assignment_id),
            _ => None,
        }
    }

    /// Whether this lesson requires a submission.
    pub fn is_assignment(&self) -> bool {
        self.assignment_id().is_some()
    }
}

/// Lesson kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    /// Informational text
    Intro,
    /// Video walkthrough
    Video,
    /// Practice checklist
    Checklist,
    /// Self-assessment form
    Form,
    /// Submittable assignment
    Assignment,
}

impl LessonKind {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonKind::Intro => "intro",
            LessonKind::Video => "video",
            LessonKind::Checklist => "checklist",
            LessonKind::Form => "form",
            LessonKind::Assignment => "assignment",
        }
    }
}

/// Lesson payload, one variant per lesson kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonContent {
    /// Informational text
    Intro {
        /// Body text
        text: String,
    },

    /// Video walkthrough
    Video {
        /// Where the video is hosted
        video_url: String,
        /// Spoken text, when available
        #[serde(default)]
        transcript: Option<String>,
        /// Takeaways listed under the video
        #[serde(default)]
        key_points: Vec<String>,
        /// Exercises to practise afterwards
        #[serde(default)]
        exercises: Vec<String>,
    },

    /// Practice routine to tick off
    Checklist {
        /// Steps in order
        items: Vec<ChecklistItem>,
    },

    /// Self-assessment recording
    Form {
        /// What to record
        instructions: String,
        /// Expected recording kind
        submission_kind: SubmissionKind,
        /// Longest accepted recording
        #[serde(default)]
        max_duration_secs: Option<u32>,
        /// Points to self-assess against
        #[serde(default)]
        criteria: Vec<String>,
    },

    /// Submittable task
    Assignment {
        /// Catalog entry this lesson submits to
        assignment_id: AssignmentId,
    },
}

impl LessonContent {
    /// Kind of this payload.
    pub fn kind(&self) -> LessonKind {
        match self {
            LessonContent::Intro { .. } => LessonKind::Intro,
            LessonContent::Video { .. } => LessonKind::Video,
            LessonContent::Checklist { .. } => LessonKind::Checklist,
            LessonContent::Form { .. } => LessonKind::Form,
            LessonContent::Assignment { .. } => LessonKind::Assignment,
        }
    }
}

/// One line of a checklist lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Position within the checklist
    pub id: u32,
    /// What to do
    pub text: String,
}

/// Position of a lesson in the course tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonRef {
    /// Module holding the lesson
    pub module_id: ModuleId,

    /// Lesson within that module
    pub lesson_id: LessonId,
}

impl LessonRef {
    /// Create a lesson reference.
    pub fn new(module_id: impl Into<ModuleId>, lesson_id: impl Into<LessonId>) -> Self {
        Self {
            module_id: module_id.into(),
            lesson_id: lesson_id.into(),
        }
    }
}

impl std::fmt::Display for LessonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.module_id, self.lesson_id)
    }
}

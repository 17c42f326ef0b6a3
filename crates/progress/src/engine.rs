//! Course progression engine.
//!
//! Pure traversal and gating over a static course tree and a learner's
//! completion set. Nothing here performs I/O or mutates the completion set;
//! the only failure is [`ProgressError::NotFound`] for ids outside the tree.
//!
//! Order is always the declared order: modules as listed in the course,
//! lessons as listed in their module.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use tracing::trace;
use vocalboost_core::{
    AssignmentId, AssignmentStatus, CompletionSet, Course, Learner, Lesson, LessonId, LessonRef,
    LessonState, Module, ModuleId, ModuleProgress,
};
use crate::config::ProgressionConfig;
use crate::error::{ProgressError, Result};

/// One row of the peer review menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerReviewEntry {
    /// Module the assignment lesson sits in
    pub module_id: ModuleId,
    /// That module's title
    pub module_title: String,
    /// Lesson id
    pub lesson_id: LessonId,
    /// Lesson title
    pub title: String,
    /// Assignment behind the lesson
    pub assignment_id: AssignmentId,
    /// Whether the learner may review peers' work on it
    pub unlocked: bool,
}

/// Progression over one course.
#[derive(Debug, Clone)]
pub struct CourseProgression {
    course: Course,
    config: ProgressionConfig,
}

impl CourseProgression {
    /// Create an engine with the default policy.
    pub fn new(course: Course) -> Self {
        Self {
            course,
            config: ProgressionConfig::default(),
        }
    }

    /// Replace the policy.
    pub fn with_config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    /// The course tree.
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// The active policy.
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    // === Lookup ===

    /// Look up a module.
    pub fn module_by_id(&self, module_id: &ModuleId) -> Result<&Module> {
        self.module_index(module_id).map(|i| &self.course.modules[i])
    }

    /// Look up a lesson within a module.
    pub fn lesson_by_id(&self, module_id: &ModuleId, lesson_id: &LessonId) -> Result<&Lesson> {
        let (mi, li) = self.position(module_id, lesson_id)?;
        Ok(&self.course.modules[mi].lessons[li])
    }

    /// Where the lesson for an assignment sits, if any lesson references it.
    pub fn lesson_for_assignment(&self, assignment_id: &AssignmentId) -> Option<LessonRef> {
        self.course
            .lessons()
            .find(|(_, l)| l.assignment_id() == Some(assignment_id))
            .map(|(m, l)| LessonRef::new(m.id.clone(), l.id.clone()))
    }

    // === Traversal ===

    /// The first lesson of the course.
    pub fn first_lesson(&self) -> Option<LessonRef> {
        self.first_lesson_from(0)
    }

    /// The lesson after `lesson_id`: the next one in its module, else the
    /// first lesson of the following module. `None` at the end of the course.
    ///
    /// Modules without lessons are stepped over.
    pub fn next_lesson(&self, module_id: &ModuleId, lesson_id: &LessonId) -> Result<Option<LessonRef>> {
        let (mi, li) = self.position(module_id, lesson_id)?;
        let module = &self.course.modules[mi];

        let next = match module.lessons.get(li + 1) {
            Some(lesson) => Some(LessonRef::new(module.id.clone(), lesson.id.clone())),
            None => self.first_lesson_from(mi + 1),
        };
        trace!(%module_id, %lesson_id, next = ?next, "next lesson");
        Ok(next)
    }

    /// The first uncompleted assignment lesson in course order, which is
    /// where the learner should pick up. `None` once everything is done.
    pub fn resume_point(&self, completion: &CompletionSet) -> Option<LessonRef> {
        self.frontier(completion)
            .map(|(m, l)| LessonRef::new(m.id.clone(), l.id.clone()))
    }

    // === Completion ===

    /// Whether every assignment lesson in the module is completed.
    /// Intro-style lessons never block.
    pub fn is_module_complete(&self, module_id: &ModuleId, completion: &CompletionSet) -> Result<bool> {
        let module = self.module_by_id(module_id)?;
        Ok(module.assignment_ids().all(|id| completion.contains(id)))
    }

    /// Status of a lesson's assignment. `None` for lessons without one.
    pub fn assignment_status(&self, lesson: &Lesson, completion: &CompletionSet) -> Option<AssignmentStatus> {
        lesson.assignment_id().map(|id| {
            if completion.contains(id) {
                AssignmentStatus::Completed
            } else {
                AssignmentStatus::Pending
            }
        })
    }

    /// [`assignment_status`](Self::assignment_status) addressed by ids.
    pub fn assignment_status_at(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        completion: &CompletionSet,
    ) -> Result<Option<AssignmentStatus>> {
        let lesson = self.lesson_by_id(module_id, lesson_id)?;
        Ok(self.assignment_status(lesson, completion))
    }

    /// Completed / total assignment lessons in a module.
    pub fn module_progress(&self, module_id: &ModuleId, completion: &CompletionSet) -> Result<ModuleProgress> {
        let module = self.module_by_id(module_id)?;
        Ok(Self::progress_of(module.assignment_ids(), completion))
    }

    /// Completed / total assignment lessons across the course.
    pub fn course_progress(&self, completion: &CompletionSet) -> ModuleProgress {
        Self::progress_of(
            self.course.modules.iter().flat_map(Module::assignment_ids),
            completion,
        )
    }

    // === Gating ===

    /// The first module is always open; every later one opens once every
    /// module before it is complete.
    pub fn is_module_unlocked(&self, module_id: &ModuleId, completion: &CompletionSet) -> Result<bool> {
        let mi = self.module_index(module_id)?;
        Ok(self.course.modules[..mi]
            .iter()
            .flat_map(Module::assignment_ids)
            .all(|id| completion.contains(id)))
    }

    /// Whether the learner may submit work for an assignment: its lesson is
    /// not locked. Assignments with no lesson in the course are never gated.
    pub fn is_assignment_open(&self, assignment_id: &AssignmentId, completion: &CompletionSet) -> bool {
        if completion.contains(assignment_id) {
            return true;
        }
        let Some(index) = self
            .course
            .lessons()
            .position(|(_, l)| l.assignment_id() == Some(assignment_id))
        else {
            return true;
        };
        match self.frontier_index(completion) {
            Some(frontier) => index <= frontier,
            None => true,
        }
    }

    /// Where a lesson stands for the learner.
    ///
    /// Completed assignments are `Completed` wherever they sit. Everything up
    /// to and including the first uncompleted assignment is reachable: that
    /// assignment is `Pending` when its id is in `submitted`, otherwise
    /// `Available`, and reachable lessons without an assignment are
    /// `Available`. Everything past it is `Locked`.
    pub fn lesson_state(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        completion: &CompletionSet,
        submitted: &HashSet<AssignmentId>,
    ) -> Result<LessonState> {
        let (mi, li) = self.position(module_id, lesson_id)?;
        let lesson = &self.course.modules[mi].lessons[li];

        if let Some(id) = lesson.assignment_id() {
            if completion.contains(id) {
                return Ok(LessonState::Completed);
            }
        }

        let index = self.global_index(mi, li);
        let reachable = match self.frontier_index(completion) {
            Some(frontier) => index <= frontier,
            None => true,
        };
        if !reachable {
            return Ok(LessonState::Locked);
        }

        Ok(match lesson.assignment_id() {
            Some(id) if submitted.contains(id) => LessonState::Pending,
            _ => LessonState::Available,
        })
    }

    // === Peer review ===

    /// Whether the learner has completed enough lessons to join peer review.
    pub fn is_peer_review_unlocked(&self, learner: &Learner) -> bool {
        learner.progress.lessons_completed >= self.config.peer_review_threshold
    }

    /// Lessons still needed before peer review opens (0 once open).
    pub fn lessons_until_peer_review(&self, learner: &Learner) -> usize {
        self.config
            .peer_review_threshold
            .saturating_sub(learner.progress.lessons_completed)
    }

    /// A learner may review others' work on an assignment once they have
    /// completed it themselves.
    pub fn can_review_assignment(&self, assignment_id: &AssignmentId, completion: &CompletionSet) -> bool {
        completion.contains(assignment_id)
    }

    /// Every assignment lesson in course order, with its review gate.
    pub fn peer_review_catalog(&self, completion: &CompletionSet) -> Vec<PeerReviewEntry> {
        self.course
            .lessons()
            .filter_map(|(module, lesson)| {
                let assignment_id = lesson.assignment_id()?;
                Some(PeerReviewEntry {
                    module_id: module.id.clone(),
                    module_title: module.title.clone(),
                    lesson_id: lesson.id.clone(),
                    title: lesson.title.clone(),
                    assignment_id: assignment_id.clone(),
                    unlocked: self.can_review_assignment(assignment_id, completion),
                })
            })
            .collect()
    }

    // === Internals ===

    fn module_index(&self, module_id: &ModuleId) -> Result<usize> {
        self.course
            .modules
            .iter()
            .position(|m| &m.id == module_id)
            .ok_or_else(|| ProgressError::not_found("module", module_id))
    }

    fn position(&self, module_id: &ModuleId, lesson_id: &LessonId) -> Result<(usize, usize)> {
        let mi = self.module_index(module_id)?;
        let li = self.course.modules[mi]
            .lessons
            .iter()
            .position(|l| &l.id == lesson_id)
            .ok_or_else(|| ProgressError::not_found("lesson", LessonRef::new(module_id.clone(), lesson_id.clone())))?;
        Ok((mi, li))
    }

    fn first_lesson_from(&self, start: usize) -> Option<LessonRef> {
        self.course
            .modules
            .iter()
            .skip(start)
            .find_map(|m| m.lessons.first().map(|l| LessonRef::new(m.id.clone(), l.id.clone())))
    }

    fn global_index(&self, mi: usize, li: usize) -> usize {
        self.course.modules[..mi].iter().map(|m| m.lessons.len()).sum::<usize>() + li
    }

    fn frontier(&self, completion: &CompletionSet) -> Option<(&Module, &Lesson)> {
        self.course
            .lessons()
            .find(|(_, l)| matches!(l.assignment_id(), Some(id) if !completion.contains(id)))
    }

    fn frontier_index(&self, completion: &CompletionSet) -> Option<usize> {
        self.course
            .lessons()
            .position(|(_, l)| matches!(l.assignment_id(), Some(id) if !completion.contains(id)))
    }

    fn progress_of<'a>(ids: impl Iterator<Item = &'a AssignmentId>, completion: &CompletionSet) -> ModuleProgress {
        let (done, total) = ids.fold((0, 0), |(done, total), id| {
            (done + usize::from(completion.contains(id)), total + 1)
        });
        ModuleProgress::from_counts(done, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocalboost_core::{ExperienceLevel, LearnerProgress, LessonContent, Preferences, SubmissionKind};

    fn module(id: &str, intro: bool, assignments: &[&str]) -> Module {
        let mut m = Module::new(id, format!("Module {}", id));
        if intro {
            m = m.with_lesson(Lesson::intro(format!("{}-intro", id), "Intro", "Welcome"));
        }
        for a in assignments {
            m = m.with_lesson(Lesson::assignment(*a, format!("Assignment {}", a), *a));
        }
        m
    }

    fn vocal_course() -> Course {
        Course::new(
            "Vocal Boost",
            vec![
                module("1", true, &["1a", "1b", "1c"]),
                module("2", true, &["2a", "2b", "2c", "2d"]),
                module("3", true, &["3a", "3b", "3c"]),
            ],
        )
        .unwrap()
    }

    fn engine() -> CourseProgression {
        CourseProgression::new(vocal_course())
    }

    fn done(ids: &[&str]) -> CompletionSet {
        ids.iter().copied().collect()
    }

    fn learner(lessons_completed: usize) -> Learner {
        Learner {
            id: "user-1".into(),
            name: "Alex Johnson".to_string(),
            email: "alex@example.com".to_string(),
            experience_level: ExperienceLevel::Beginner,
            enrolled_on: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            bio: None,
            progress: LearnerProgress {
                lessons_completed,
                ..Default::default()
            },
            preferences: Preferences::default(),
        }
    }

    fn at(m: &str, l: &str) -> (ModuleId, LessonId) {
        (ModuleId::new(m), LessonId::new(l))
    }

    #[test]
    fn test_lesson_by_id() {
        let engine = engine();
        let (m, l) = at("1", "1b");
        let lesson = engine.lesson_by_id(&m, &l).unwrap();
        assert_eq!(lesson.title, "Assignment 1b");
        assert_eq!(lesson.assignment_id(), Some(&AssignmentId::new("1b")));
    }

    #[test]
    fn test_lesson_by_id_unknown_lesson() {
        let (m, l) = at("1", "9z");
        let err = engine().lesson_by_id(&m, &l).unwrap_err();
        assert!(matches!(err, ProgressError::NotFound { kind: "lesson", .. }));
    }

    #[test]
    fn test_lesson_by_id_unknown_module() {
        let (m, l) = at("7", "1a");
        let err = engine().lesson_by_id(&m, &l).unwrap_err();
        assert_eq!(err, ProgressError::not_found("module", "7"));
    }

    #[test]
    fn test_lesson_ids_are_scoped_to_their_module() {
        let (m, l) = at("2", "1a");
        assert!(engine().lesson_by_id(&m, &l).is_err());
    }

    #[test]
    fn test_next_lesson_within_module() {
        let engine = engine();
        let course = engine.course().clone();
        for module in &course.modules {
            for pair in module.lessons.windows(2) {
                let next = engine.next_lesson(&module.id, &pair[0].id).unwrap();
                assert_eq!(next, Some(LessonRef::new(module.id.clone(), pair[1].id.clone())));
            }
        }
    }

    #[test]
    fn test_next_lesson_crosses_modules() {
        let engine = engine();
        let (m, l) = at("1", "1c");
        assert_eq!(engine.next_lesson(&m, &l).unwrap(), Some(LessonRef::new("2", "2-intro")));
        let (m, l) = at("2", "2d");
        assert_eq!(engine.next_lesson(&m, &l).unwrap(), Some(LessonRef::new("3", "3-intro")));
    }

    #[test]
    fn test_next_lesson_terminal() {
        let (m, l) = at("3", "3c");
        assert_eq!(engine().next_lesson(&m, &l).unwrap(), None);
    }

    #[test]
    fn test_next_lesson_unknown_ids() {
        let engine = engine();
        let (m, l) = at("1", "nope");
        assert!(engine.next_lesson(&m, &l).is_err());
        let (m, l) = at("nope", "1a");
        assert!(engine.next_lesson(&m, &l).is_err());
    }

    #[test]
    fn test_next_lesson_skips_empty_module() {
        let course = Course::new(
            "c",
            vec![module("1", false, &["1a"]), module("2", false, &[]), module("3", false, &["3a"])],
        )
        .unwrap();
        let engine = CourseProgression::new(course);
        let (m, l) = at("1", "1a");
        assert_eq!(engine.next_lesson(&m, &l).unwrap(), Some(LessonRef::new("3", "3a")));
    }

    #[test]
    fn test_first_lesson() {
        assert_eq!(engine().first_lesson(), Some(LessonRef::new("1", "1-intro")));
        let empty = CourseProgression::new(Course::new("empty", vec![]).unwrap());
        assert_eq!(empty.first_lesson(), None);
    }

    #[test]
    fn test_walking_next_visits_every_lesson_once() {
        let engine = engine();
        let mut cursor = engine.first_lesson();
        let mut visited = Vec::new();
        while let Some(at) = cursor {
            visited.push(at.lesson_id.to_string());
            cursor = engine.next_lesson(&at.module_id, &at.lesson_id).unwrap();
        }
        let expected: Vec<_> = engine.course().lessons().map(|(_, l)| l.id.to_string()).collect();
        assert_eq!(visited, expected);
        assert_eq!(visited.len(), 14);
    }

    #[test]
    fn test_module_complete_requires_every_assignment() {
        let engine = engine();
        let m = ModuleId::new("1");
        assert!(!engine.is_module_complete(&m, &done(&[])).unwrap());
        assert!(!engine.is_module_complete(&m, &done(&["1a", "1b"])).unwrap());
        assert!(engine.is_module_complete(&m, &done(&["1a", "1b", "1c"])).unwrap());
    }

    #[test]
    fn test_module_complete_flips_once_as_ids_are_added() {
        let engine = engine();
        let m = ModuleId::new("2");
        let mut completion = CompletionSet::new();
        let mut flips = 0;
        let mut last = engine.is_module_complete(&m, &completion).unwrap();
        for id in ["2c", "1a", "2a", "2d", "2b", "3a"] {
            completion.insert(id.into());
            let now = engine.is_module_complete(&m, &completion).unwrap();
            assert!(now || !last, "completeness must never go back to false");
            if now != last {
                flips += 1;
            }
            last = now;
        }
        assert!(last);
        assert_eq!(flips, 1);
    }

    #[test]
    fn test_module_without_assignments_is_complete() {
        let course = Course::new("c", vec![module("1", true, &[])]).unwrap();
        let engine = CourseProgression::new(course);
        assert!(engine.is_module_complete(&"1".into(), &CompletionSet::new()).unwrap());
    }

    #[test]
    fn test_module_complete_unknown_module() {
        assert!(engine().is_module_complete(&"9".into(), &CompletionSet::new()).is_err());
    }

    #[test]
    fn test_assignment_status_none_for_intro() {
        let engine = engine();
        let everything = done(&["1a", "1b", "1c", "2a", "2b", "2c", "2d", "3a", "3b", "3c", "1-intro"]);
        for (_, lesson) in engine.course().lessons().filter(|(_, l)| !l.is_assignment()) {
            assert_eq!(engine.assignment_status(lesson, &CompletionSet::new()), None);
            assert_eq!(engine.assignment_status(lesson, &everything), None);
        }
    }

    #[test]
    fn test_assignment_status_for_other_non_assignment_kinds() {
        let video = Lesson {
            id: "warmup".into(),
            title: "Warm-up".to_string(),
            content: LessonContent::Video {
                video_url: "/videos/warmups.mp4".to_string(),
                transcript: None,
                key_points: vec![],
                exercises: vec!["Lip trills".to_string()],
            },
        };
        let form = Lesson {
            id: "assessment".into(),
            title: "Breathing Assessment".to_string(),
            content: LessonContent::Form {
                instructions: "Record yourself".to_string(),
                submission_kind: SubmissionKind::Audio,
                max_duration_secs: Some(300),
                criteria: vec![],
            },
        };
        assert_eq!(engine().assignment_status(&video, &CompletionSet::new()), None);
        assert_eq!(engine().assignment_status(&form, &CompletionSet::new()), None);
    }

    #[test]
    fn test_assignment_status_pending_then_completed() {
        let engine = engine();
        let (m, l) = at("1", "1c");
        assert_eq!(
            engine.assignment_status_at(&m, &l, &done(&["1a"])).unwrap(),
            Some(AssignmentStatus::Pending)
        );
        assert_eq!(
            engine.assignment_status_at(&m, &l, &done(&["1c"])).unwrap(),
            Some(AssignmentStatus::Completed)
        );
        let (m, l) = at("1", "zz");
        assert!(engine.assignment_status_at(&m, &l, &done(&[])).is_err());
    }

    #[test]
    fn test_peer_review_threshold_boundary() {
        let engine = engine();
        assert!(!engine.is_peer_review_unlocked(&learner(0)));
        assert!(!engine.is_peer_review_unlocked(&learner(2)));
        assert!(engine.is_peer_review_unlocked(&learner(3)));
        assert!(engine.is_peer_review_unlocked(&learner(12)));

        assert_eq!(engine.lessons_until_peer_review(&learner(2)), 1);
        assert_eq!(engine.lessons_until_peer_review(&learner(3)), 0);
        assert_eq!(engine.lessons_until_peer_review(&learner(40)), 0);
    }

    #[test]
    fn test_peer_review_threshold_is_configurable() {
        let engine = engine().with_config(ProgressionConfig { peer_review_threshold: 5 });
        assert!(!engine.is_peer_review_unlocked(&learner(4)));
        assert!(engine.is_peer_review_unlocked(&learner(5)));
    }

    #[test]
    fn test_module_unlock_follows_previous_module() {
        let engine = engine();
        let none = done(&[]);
        assert!(engine.is_module_unlocked(&"1".into(), &none).unwrap());
        assert!(!engine.is_module_unlocked(&"2".into(), &none).unwrap());

        let module_one = done(&["1a", "1b", "1c"]);
        assert!(engine.is_module_unlocked(&"2".into(), &module_one).unwrap());
        assert!(!engine.is_module_unlocked(&"3".into(), &module_one).unwrap());
        assert!(engine.is_module_unlocked(&"9".into(), &module_one).is_err());
    }

    #[test]
    fn test_module_unlock_needs_every_earlier_module() {
        let engine = engine();
        let submitted = HashSet::new();
        let module_two_only = done(&["2a", "2b", "2c", "2d"]);

        assert!(!engine.is_module_unlocked(&"2".into(), &module_two_only).unwrap());
        assert!(!engine.is_module_unlocked(&"3".into(), &module_two_only).unwrap());

        // Unlocked modules always have a reachable first lesson, and locked ones never do.
        for completion in [done(&[]), done(&["1a", "1b", "1c"]), module_two_only, done(&["1a", "1b", "1c", "2a", "2b", "2c", "2d"])] {
            for module in &engine.course().modules {
                let first = &module.lessons[0];
                let state = engine.lesson_state(&module.id, &first.id, &completion, &submitted).unwrap();
                let unlocked = engine.is_module_unlocked(&module.id, &completion).unwrap();
                assert_eq!(unlocked, state != LessonState::Locked, "module {}", module.id);
            }
        }
    }

    #[test]
    fn test_assignment_open_follows_frontier() {
        let engine = engine();
        let completion = done(&["1a"]);
        assert!(engine.is_assignment_open(&"1a".into(), &completion));
        assert!(engine.is_assignment_open(&"1b".into(), &completion));
        assert!(!engine.is_assignment_open(&"1c".into(), &completion));
        assert!(!engine.is_assignment_open(&"2a".into(), &completion));
        // Not referenced by any lesson.
        assert!(engine.is_assignment_open(&"9z".into(), &completion));

        let all = done(&["1a", "1b", "1c", "2a", "2b", "2c", "2d", "3a", "3b", "3c"]);
        assert!(engine.is_assignment_open(&"3c".into(), &all));
    }

    #[test]
    fn test_lesson_states_unlock_in_order() {
        let engine = engine();
        let completion = done(&["1a", "1b"]);
        let submitted = HashSet::new();
        let state = |m: &str, l: &str| {
            let (m, l) = at(m, l);
            engine.lesson_state(&m, &l, &completion, &submitted).unwrap()
        };

        assert_eq!(state("1", "1-intro"), LessonState::Available);
        assert_eq!(state("1", "1a"), LessonState::Completed);
        assert_eq!(state("1", "1b"), LessonState::Completed);
        assert_eq!(state("1", "1c"), LessonState::Available);
        assert_eq!(state("2", "2-intro"), LessonState::Locked);
        assert_eq!(state("2", "2a"), LessonState::Locked);
        assert_eq!(state("3", "3c"), LessonState::Locked);
    }

    #[test]
    fn test_lesson_state_pending_after_submission() {
        let engine = engine();
        let submitted: HashSet<AssignmentId> = ["1a".into()].into_iter().collect();
        let (m, l) = at("1", "1a");
        assert_eq!(
            engine.lesson_state(&m, &l, &CompletionSet::new(), &submitted).unwrap(),
            LessonState::Pending
        );
        // Completion wins over a lingering submission.
        assert_eq!(
            engine.lesson_state(&m, &l, &done(&["1a"]), &submitted).unwrap(),
            LessonState::Completed
        );
    }

    #[test]
    fn test_lesson_state_no_skip_ahead() {
        let engine = engine();
        let submitted: HashSet<AssignmentId> = ["2a".into()].into_iter().collect();
        let (m, l) = at("2", "2a");
        assert_eq!(
            engine.lesson_state(&m, &l, &done(&["1a"]), &submitted).unwrap(),
            LessonState::Locked
        );
    }

    #[test]
    fn test_lesson_state_everything_done() {
        let engine = engine();
        let all = done(&["1a", "1b", "1c", "2a", "2b", "2c", "2d", "3a", "3b", "3c"]);
        let (m, l) = at("3", "3-intro");
        assert_eq!(
            engine.lesson_state(&m, &l, &all, &HashSet::new()).unwrap(),
            LessonState::Available
        );
        assert_eq!(engine.resume_point(&all), None);
    }

    #[test]
    fn test_resume_point_is_first_uncompleted_assignment() {
        let engine = engine();
        assert_eq!(engine.resume_point(&done(&[])), Some(LessonRef::new("1", "1a")));
        assert_eq!(engine.resume_point(&done(&["1a", "1b"])), Some(LessonRef::new("1", "1c")));
        assert_eq!(engine.resume_point(&done(&["1a", "1b", "1c"])), Some(LessonRef::new("2", "2a")));
    }

    #[test]
    fn test_module_and_course_progress() {
        let engine = engine();
        let completion = done(&["1a", "1b", "2a"]);

        let one = engine.module_progress(&"1".into(), &completion).unwrap();
        assert_eq!((one.completed_assignments, one.total_assignments), (2, 3));
        assert!(!one.is_complete());

        let two = engine.module_progress(&"2".into(), &completion).unwrap();
        assert_eq!(two.percentage, 25.0);

        let overall = engine.course_progress(&completion);
        assert_eq!((overall.completed_assignments, overall.total_assignments), (3, 10));
        assert_eq!(overall.percentage, 30.0);
    }

    #[test]
    fn test_peer_review_catalog() {
        let engine = engine();
        let catalog = engine.peer_review_catalog(&done(&["1a", "1b"]));
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog[0].assignment_id, AssignmentId::new("1a"));
        assert_eq!(catalog[0].module_title, "Module 1");
        let unlocked: Vec<_> = catalog.iter().filter(|e| e.unlocked).map(|e| e.assignment_id.as_str()).collect();
        assert_eq!(unlocked, vec!["1a", "1b"]);

        assert!(engine.can_review_assignment(&"1b".into(), &done(&["1b"])));
        assert!(!engine.can_review_assignment(&"1c".into(), &done(&["1b"])));
    }

    #[test]
    fn test_lesson_for_assignment() {
        let engine = engine();
        assert_eq!(engine.lesson_for_assignment(&"2c".into()), Some(LessonRef::new("2", "2c")));
        assert_eq!(engine.lesson_for_assignment(&"9z".into()), None);
    }

    #[test]
    fn test_end_to_end_module_one() {
        let engine = engine();
        let one = ModuleId::new("1");
        let lessons: Vec<_> = engine
            .module_by_id(&one)
            .unwrap()
            .lessons
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(lessons, vec!["1-intro", "1a", "1b", "1c"]);

        assert_eq!(
            engine.next_lesson(&one, &"1-intro".into()).unwrap(),
            Some(LessonRef::new("1", "1a"))
        );
        assert_eq!(
            engine.next_lesson(&one, &"1c".into()).unwrap(),
            Some(LessonRef::new("2", "2-intro"))
        );
        assert!(engine.is_module_complete(&one, &done(&["1a", "1b", "1c"])).unwrap());
        assert!(!engine.is_module_complete(&one, &done(&["1a", "1b"])).unwrap());
    }
}

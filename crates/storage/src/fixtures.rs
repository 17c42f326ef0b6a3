//! Built-in Vocal Boost course content and demo data.

use tracing::info;
use vocalboost_core::{
    Assignment, AssignmentCatalog, Course, ExperienceLevel, Learner, LearnerProgress, Lesson, Module,
    Notification, NotificationKind, Preferences, SubmissionKind, UserId,
};
use crate::{Result, Storage};

/// Id of the demo learner.
pub const DEMO_USER: &str = "user-1";

/// The three-module Vocal Boost course.
pub fn vocal_boost_course() -> Course {
    Course {
        title: "Vocal Boost".to_string(),
        modules: vec![
            Module::new("1", "Foundation of Singing, Listening and Your Voice")
                .with_lesson(Lesson::intro(
                    "1-intro",
                    "Welcome to the Vocal Boost",
                    "Welcome to your first day of the vocal boost! You should have already done your \
                     daily warm ups. Today we start with understanding your voice and building the \
                     foundation for your vocal journey through listening and mimicking exercises.",
                ))
                .with_lesson(Lesson::assignment("1a", "Sharing Your Voice and Story", "1a"))
                .with_lesson(Lesson::assignment("1b", "Listening and Mimicking", "1b"))
                .with_lesson(Lesson::assignment("1c", "Mimicking Advanced", "1c")),
            Module::new("2", "Storytelling, Soul and Intention")
                .with_lesson(Lesson::intro(
                    "2-intro",
                    "Introduction to Soul Singing",
                    "In this part of the cycle we explore how to connect with a song and with an \
                     audience, infusing performances with genuine emotion and intention.",
                ))
                .with_lesson(Lesson::assignment("2a", "Techniques of Soul", "2a"))
                .with_lesson(Lesson::assignment("2b", "Uncovering Soul", "2b"))
                .with_lesson(Lesson::assignment("2c", "Connecting with Emotion", "2c"))
                .with_lesson(Lesson::assignment("2d", "Song Selection and Storytelling", "2d")),
            Module::new("3", "Learning Your Final Song")
                .with_lesson(Lesson::intro(
                    "3-intro",
                    "Getting Ready for Your Final Performance",
                    "In this part of the class you focus on perfecting one song, working through \
                     checkpoints until your final performance brings everything together.",
                ))
                .with_lesson(Lesson::assignment("3a", "Final Song - Checkpoint 1", "3a"))
                .with_lesson(Lesson::assignment("3b", "Final Song - Checkpoint 2", "3b"))
                .with_lesson(Lesson::assignment("3c", "Your Final Performance", "3c")),
        ],
    }
}

/// Assignment definitions for [`vocal_boost_course`].
pub fn vocal_boost_assignments() -> AssignmentCatalog {
    let defs = [
        ("1a", "1", "Sharing Your Voice and Story",
         "Introduce yourself via text or video, share your vocal journey, and sing a small section of a song you love."),
        ("1b", "1", "Listening and Mimicking",
         "Choose 6 artists and mimic short sections from their songs. Describe what was easy, hard, and what you learned."),
        ("1c", "1", "Mimicking Advanced",
         "Pick 3 artists that stretch your voice and record 3 separate sessions mimicking them."),
        ("2a", "2", "Techniques of Soul",
         "Apply soul techniques (volume, pitch, breath, vibrato) to a song and describe the choices you made."),
        ("2b", "2", "Uncovering Soul",
         "Perform a section of a song in your own voice, focusing on expression and delivery."),
        ("2c", "2", "Connecting With Emotion",
         "Pick a song that connects to your personal story and explain how your interpretation relates to it."),
        ("2d", "2", "Song Selection and Storytelling",
         "Select 4 songs for your voice and explain why each one fits your vocal identity."),
        ("3a", "3", "Final Song - Checkpoint 1",
         "Start breaking down your final song and submit a first draft of your performance."),
        ("3b", "3", "Final Song - Checkpoint 2",
         "Keep practicing and submit your second checkpoint performance."),
        ("3c", "3", "Your Final Performance",
         "Upload your complete final performance: vocals, performance, and story."),
    ];

    AssignmentCatalog::new(
        defs.iter()
            .map(|(id, module, title, description)| Assignment {
                id: (*id).into(),
                module_id: (*module).into(),
                title: title.to_string(),
                description: description.to_string(),
                accepted_kinds: SubmissionKind::ALL.to_vec(),
            })
            .collect(),
    )
}

/// The demo learner, two assignments into module 1.
pub fn demo_learner() -> Learner {
    Learner {
        id: DEMO_USER.into(),
        name: "Alex Johnson".to_string(),
        email: "alex.johnson@email.com".to_string(),
        experience_level: ExperienceLevel::Intermediate,
        enrolled_on: chrono::NaiveDate::from_ymd_opt(2023, 12, 1).unwrap_or_default(),
        bio: Some("Passionate about vocal performance and always looking to improve my technique.".to_string()),
        progress: LearnerProgress {
            lessons_completed: 2,
            practice_hours: 45.0,
            current_streak: 7,
        },
        preferences: Preferences::default(),
    }
}

/// Welcome message for a new learner.
pub fn welcome_notification(user: &UserId) -> Notification {
    Notification::new(
        user.clone(),
        NotificationKind::System,
        "Welcome to Vocal Boost!",
        "Complete your first warmup session to unlock advanced features",
    )
    .with_action_url("/warmup")
}

/// Write the built-in course, assignments and demo learner into `storage`.
pub async fn seed<S: Storage + ?Sized>(storage: &mut S) -> Result<()> {
    let learner = demo_learner();

    storage.save_course(&vocal_boost_course()).await?;
    storage.save_assignments(&vocal_boost_assignments()).await?;
    storage.save_learner(&learner).await?;
    for assignment in ["1a", "1b"] {
        storage.record_completion(&learner.id, &assignment.into()).await?;
    }
    storage.save_notification(&welcome_notification(&learner.id)).await?;

    info!("Seeded Vocal Boost course and demo learner {}", learner.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_course_is_valid() {
        let course = vocal_boost_course();
        course.validate().unwrap();
        assert_eq!(course.modules.len(), 3);
        assert_eq!(course.assignment_count(), 10);
    }

    #[test]
    fn test_every_assignment_lesson_has_a_definition() {
        let course = vocal_boost_course();
        let catalog = vocal_boost_assignments();
        for (module, lesson) in course.lessons() {
            if let Some(id) = lesson.assignment_id() {
                let assignment = catalog.get(id).unwrap();
                assert_eq!(assignment.module_id, module.id);
            }
        }
        assert_eq!(catalog.len(), 10);
    }
}

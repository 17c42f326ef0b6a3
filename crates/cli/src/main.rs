//! Vocal Boost CLI - course progress for the vocal training class.

use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vocalboost_core::{
    AssignmentId, LessonContent, LessonId, ModuleId, NotificationId, SubmissionFilter, SubmissionId, SubmissionKind,
    SubmissionPayload, SubmissionStatus, UserId,
};
use vocalboost_progress::{
    BasicProgressTracker, NotificationInbox, PeerReviewService, ProgressError, ProgressTracker,
    ProgressionConfig, ServiceError, SubmissionRecorder,
};
use vocalboost_storage::{fixtures, JsonStorage, MemoryStorage, Storage};

#[derive(Parser)]
#[command(name = "vocalboost")]
#[command(about = "Vocal training course progress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory
    #[arg(short, long, global = true, default_value = ".vocalboost")]
    data_dir: PathBuf,

    /// Use the built-in course in memory instead of the data directory
    #[arg(long, global = true)]
    demo: bool,

    /// Learner to act as
    #[arg(short, long, global = true, default_value = fixtures::DEMO_USER)]
    user: String,

    /// Config file (defaults to <data-dir>/config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the peer review unlock threshold
    #[arg(long, global = true)]
    peer_review_threshold: Option<usize>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in course and demo learner into the data directory
    Init {
        /// Overwrite existing course data
        #[arg(long)]
        force: bool,
    },
    /// List modules with progress
    Modules,
    /// List assignments
    Assignments {
        /// Only this module
        #[arg(long)]
        module: Option<String>,
    },
    /// Show a lesson
    Lesson {
        /// Module ID
        module: String,
        /// Lesson ID
        lesson: String,
    },
    /// Show the lesson after the given one
    Next {
        /// Module ID
        module: String,
        /// Lesson ID
        lesson: String,
    },
    /// Show learner progress
    Status,
    /// Submit work for an assignment
    Submit {
        /// Assignment ID
        assignment: String,
        /// Submission kind (audio, video, text)
        #[arg(long, default_value = "text")]
        kind: String,
        /// Text answer
        #[arg(long)]
        text: Option<String>,
        /// Media reference for audio/video
        #[arg(long)]
        media: Option<String>,
        /// Recording length in seconds
        #[arg(long)]
        duration: Option<u32>,
        /// Notes for the reviewer
        #[arg(long)]
        notes: Option<String>,
    },
    /// List submissions
    Submissions {
        /// Only this assignment
        #[arg(long)]
        assignment: Option<String>,
        /// Every learner, not just --user
        #[arg(long)]
        all: bool,
    },
    /// Set a submission's review status
    Review {
        /// Submission ID
        id: String,
        /// New status (in_review, reviewed, needs_revision)
        status: String,
        /// Reviewer name
        #[arg(long, default_value = "Shantal")]
        reviewer: String,
        /// Feedback message for the learner
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Show peer review access
    PeerReview,
    /// List classmates' submissions for an assignment
    Peers {
        /// Assignment ID
        assignment: String,
    },
    /// Rate a classmate's submission
    Rate {
        /// Submission ID
        submission: String,
        /// Stars, 1 to 5
        #[arg(long)]
        rating: u8,
        /// Written feedback
        #[arg(long)]
        feedback: String,
    },
    /// Instructor overview of every learner
    Learners,
    /// List notifications
    Notifications {
        /// Only unread
        #[arg(long)]
        unread: bool,
    },
    /// Mark notifications read
    Read {
        /// Notification ID
        id: Option<String>,
        /// Mark every notification read
        #[arg(long)]
        all: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(cli: &Cli) -> Result<ProgressionConfig> {
    let mut config = match &cli.config {
        Some(path) => ProgressionConfig::from_file(path).await?,
        None => {
            let default_path = cli.data_dir.join("config.json");
            if !cli.demo && default_path.exists() {
                ProgressionConfig::from_file(&default_path).await?
            } else {
                ProgressionConfig::default()
            }
        }
    };
    if let Some(threshold) = cli.peer_review_threshold {
        config.peer_review_threshold = threshold;
    }
    debug!(?config, "Loaded progression config");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli).await?;

    if cli.demo {
        let mut storage = MemoryStorage::with_fixtures().await?;
        return run(&mut storage, &cli, config).await;
    }

    let mut storage = JsonStorage::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    if let Commands::Init { force } = cli.command {
        return init(&mut storage, force).await;
    }
    if !storage.is_seeded().await {
        bail!(
            "no course in {}; run `vocalboost init` first or pass --demo",
            cli.data_dir.display()
        );
    }
    run(&mut storage, &cli, config).await
}

async fn init(storage: &mut JsonStorage, force: bool) -> Result<()> {
    if storage.is_seeded().await && !force {
        println!("Already initialized: {} (use --force to reset)", storage.root().display());
        return Ok(());
    }
    fixtures::seed(storage).await?;
    println!("Initialized {}", storage.root().display());
    Ok(())
}

async fn run<S: Storage>(storage: &mut S, cli: &Cli, config: ProgressionConfig) -> Result<()> {
    let user = UserId::new(cli.user.as_str());

    match &cli.command {
        Commands::Init { .. } => {
            println!("Demo mode keeps everything in memory; nothing to initialize");
        }
        Commands::Modules => {
            let tracker = BasicProgressTracker::new(&*storage).with_config(config);
            let snapshot = tracker.snapshot(&user).await?;

            println!("Modules ({})", snapshot.modules.len());
            for module in &snapshot.modules {
                let badge = if module.complete {
                    "DONE"
                } else if module.unlocked {
                    "OPEN"
                } else {
                    "LOCKED"
                };
                println!(
                    "  {} | {:<6} | {}/{} ({:.0}%) - {}",
                    module.module_id,
                    badge,
                    module.progress.completed_assignments,
                    module.progress.total_assignments,
                    module.progress.percentage,
                    module.title,
                );
            }
        }
        Commands::Assignments { module } => {
            let catalog = storage.load_assignments().await?;
            let completion = storage.load_completions(&user).await?;
            let module_id = module.as_deref().map(ModuleId::new);
            let assignments: Vec<_> = match &module_id {
                Some(module_id) => catalog.by_module(module_id).collect(),
                None => catalog.iter().collect(),
            };

            println!("Assignments ({})", assignments.len());
            for assignment in assignments {
                let kinds: Vec<_> = assignment.accepted_kinds.iter().map(|k| k.as_str()).collect();
                println!(
                    "  {} | module {} | {} | {} [{}]",
                    assignment.id,
                    assignment.module_id,
                    if completion.contains(&assignment.id) { "COMPLETED" } else { "PENDING  " },
                    assignment.title,
                    kinds.join(", "),
                );
            }
        }
        Commands::Lesson { module, lesson } => {
            let tracker = BasicProgressTracker::new(&*storage).with_config(config);
            let engine = tracker.engine().await?;
            let (module_id, lesson_id) = (ModuleId::new(module.as_str()), LessonId::new(lesson.as_str()));

            let found = match engine.lesson_by_id(&module_id, &lesson_id) {
                Ok(found) => found,
                Err(ProgressError::NotFound { .. }) => {
                    println!("Lesson not found");
                    return Ok(());
                }
            };
            let snapshot = tracker.snapshot(&user).await?;
            let state = snapshot
                .modules
                .iter()
                .find(|m| m.module_id == module_id)
                .and_then(|m| m.lessons.iter().find(|l| l.lesson_id == lesson_id))
                .map(|l| l.state);

            println!("Lesson: {} ({})", found.title, found.kind().as_str());
            println!("  Module: {}", engine.module_by_id(&module_id)?.title);
            if let Some(state) = state {
                println!("  State: {}", state.label());
            }
            print_content(&found.content);
            match engine.next_lesson(&module_id, &lesson_id)? {
                Some(next) => println!("  Next: {}", next),
                None => println!("  Next: end of course"),
            }
        }
        Commands::Next { module, lesson } => {
            let engine = BasicProgressTracker::new(&*storage).with_config(config).engine().await?;
            match engine.next_lesson(&ModuleId::new(module.as_str()), &LessonId::new(lesson.as_str())) {
                Ok(Some(next)) => println!("{}", next),
                Ok(None) => println!("End of course"),
                Err(ProgressError::NotFound { .. }) => println!("Lesson not found"),
            }
        }
        Commands::Status => {
            let tracker = BasicProgressTracker::new(&*storage).with_config(config);
            let snapshot = tracker.snapshot(&user).await?;

            println!("Vocal Boost Status: {}", snapshot.name);
            println!(
                "  Completed: {}/{} assignments ({:.0}%)",
                snapshot.overall.completed_assignments,
                snapshot.overall.total_assignments,
                snapshot.overall.percentage,
            );
            match &snapshot.resume_at {
                Some(at) => println!("  Continue with: {}", at),
                None => println!("  Course complete"),
            }
            if snapshot.peer_review_unlocked {
                println!("  Peer review: unlocked");
            } else {
                println!(
                    "  Peer review: complete {} more lesson(s) to unlock",
                    snapshot.lessons_until_peer_review
                );
            }
            for module in &snapshot.modules {
                println!("  Module {} - {}", module.module_id, module.title);
                for lesson in &module.lessons {
                    println!("    {:<9} {} {}", lesson.state.label(), lesson.lesson_id, lesson.title);
                }
            }
        }
        Commands::Submit { assignment, kind, text, media, duration, notes } => {
            let kind: SubmissionKind = kind.parse().map_err(anyhow::Error::msg)?;
            let payload = match kind {
                SubmissionKind::Text => SubmissionPayload::Text {
                    body: text.clone().unwrap_or_default(),
                },
                SubmissionKind::Audio => SubmissionPayload::Audio {
                    media_url: media.clone().unwrap_or_default(),
                    duration_secs: *duration,
                },
                SubmissionKind::Video => SubmissionPayload::Video {
                    media_url: media.clone().unwrap_or_default(),
                    duration_secs: *duration,
                },
            };

            let submitted = SubmissionRecorder::new(storage)
                .with_config(config)
                .submit(&user, &AssignmentId::new(assignment.as_str()), payload, notes.clone())
                .await;
            let Some(receipt) = found(submitted)? else {
                return Ok(());
            };

            println!("Submitted: {} for assignment {}", receipt.submission.id, assignment);
            if receipt.module_completed {
                println!("  Module complete!");
            }
            if let Some(next) = receipt.next {
                println!("  Next lesson: {}", next);
            }
        }
        Commands::Submissions { assignment, all } => {
            let filter = SubmissionFilter {
                user_id: if *all { None } else { Some(user.clone()) },
                assignment_id: assignment.as_deref().map(AssignmentId::new),
            };
            let submissions = storage.list_submissions(&filter).await?;

            println!("Submissions ({})", submissions.len());
            for s in submissions {
                println!(
                    "  {} | {} | {} | {} | {}",
                    s.id,
                    s.user_id,
                    s.assignment_id,
                    s.kind().as_str(),
                    s.status.as_str(),
                );
            }
        }
        Commands::Review { id, status, reviewer, feedback } => {
            let id: SubmissionId = id.parse().context("Invalid submission ID")?;
            let status = parse_status(status)
                .ok_or_else(|| anyhow::anyhow!("Unknown status: {}", status))?;

            let updated = SubmissionRecorder::new(storage)
                .set_status(id, status, reviewer, feedback.clone())
                .await;
            let Some(updated) = found(updated)? else {
                return Ok(());
            };
            println!("Submission {} is now {}", updated.id, updated.status.as_str());
        }
        Commands::PeerReview => {
            let tracker = BasicProgressTracker::new(&*storage).with_config(config);
            let engine = tracker.engine().await?;
            let learner = storage
                .load_learner(&user)
                .await?
                .ok_or_else(|| ProgressError::not_found("learner", &user))?;
            let completion = storage.load_completions(&user).await?;

            if !engine.is_peer_review_unlocked(&learner) {
                println!(
                    "Peer review is locked: complete {} more lesson(s) to unlock it",
                    engine.lessons_until_peer_review(&learner)
                );
                return Ok(());
            }

            let catalog = engine.peer_review_catalog(&completion);
            let open = catalog.iter().filter(|e| e.unlocked).count();
            println!("Peer review ({}/{} assignments open)", open, catalog.len());
            for entry in catalog {
                println!(
                    "  {} | {} | {} - {}",
                    entry.assignment_id,
                    if entry.unlocked { "OPEN  " } else { "LOCKED" },
                    entry.module_title,
                    entry.title,
                );
            }
        }
        Commands::Peers { assignment } => {
            let service = PeerReviewService::new(storage).with_config(config);
            let listed = service.submissions_for(&user, &AssignmentId::new(assignment.as_str())).await;
            let Some(peers) = found(listed)? else {
                return Ok(());
            };

            println!("Classmates' submissions for {} ({})", assignment, peers.len());
            for peer in peers {
                let rating = match peer.average_rating {
                    Some(avg) => format!("{:.1} stars", avg),
                    None => "unrated".to_string(),
                };
                println!(
                    "  {} | {} | {} | {} review(s), {}{}",
                    peer.submission.id,
                    peer.author_name,
                    peer.submission.kind().as_str(),
                    peer.reviews.len(),
                    rating,
                    if peer.reviewed_by_me { " | reviewed" } else { "" },
                );
                if let Some(notes) = &peer.submission.notes {
                    println!("      {}", notes);
                }
            }
        }
        Commands::Rate { submission, rating, feedback } => {
            let id: SubmissionId = submission.parse().context("Invalid submission ID")?;
            let rated = PeerReviewService::new(storage)
                .with_config(config)
                .review(&user, id, *rating, feedback)
                .await;
            if let Some(review) = found(rated)? {
                println!("Reviewed {} with {} star(s)", review.submission_id, review.rating);
            }
        }
        Commands::Learners => {
            let tracker = BasicProgressTracker::new(&*storage).with_config(config);
            let total = tracker.engine().await?.course().assignment_count();
            let rows = tracker.overview().await?;

            println!("Learners ({}) - {} assignments in the course", rows.len(), total);
            for row in rows {
                let last_active = row
                    .last_active
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "  {} | {} <{}> | {}/{} ({:.0}%) | {} submitted, {} awaiting review | last active {}{}",
                    row.user_id,
                    row.name,
                    row.email,
                    row.overall.completed_assignments,
                    row.overall.total_assignments,
                    row.overall.percentage,
                    row.submissions,
                    row.awaiting_review,
                    last_active,
                    if row.peer_review_unlocked { " | peer review" } else { "" },
                );
            }
        }
        Commands::Notifications { unread } => {
            let inbox = NotificationInbox::new(storage);
            let notifications = if *unread {
                inbox.unread(&user).await?
            } else {
                inbox.list(&user).await?
            };

            println!("Notifications ({})", notifications.len());
            for n in notifications {
                println!(
                    "  {} {} | {} | {} - {}",
                    if n.is_read { " " } else { "*" },
                    n.id,
                    n.kind.as_str(),
                    n.title,
                    n.message,
                );
            }
        }
        Commands::Read { id, all } => {
            let mut inbox = NotificationInbox::new(storage);
            match (id, *all) {
                (_, true) => {
                    let changed = inbox.mark_all_read(&user).await?;
                    println!("Marked {} notification(s) read", changed);
                }
                (Some(id), false) => {
                    let id: NotificationId = id.parse().context("Invalid notification ID")?;
                    if let Some(n) = found(inbox.mark_read(id).await)? {
                        println!("Read: {}", n.title);
                    }
                }
                (None, false) => bail!("pass a notification ID or --all"),
            }
        }
    }

    info!(user = %user, "Done");
    Ok(())
}

fn print_content(content: &LessonContent) {
    match content {
        LessonContent::Intro { text } => println!("  {}", text),
        LessonContent::Video { video_url, key_points, exercises, .. } => {
            println!("  Video: {}", video_url);
            for point in key_points {
                println!("    - {}", point);
            }
            for exercise in exercises {
                println!("    * {}", exercise);
            }
        }
        LessonContent::Checklist { items } => {
            for item in items {
                println!("    [{}] {}", item.id, item.text);
            }
        }
        LessonContent::Form { instructions, submission_kind, .. } => {
            println!("  {} ({})", instructions, submission_kind.as_str());
        }
        LessonContent::Assignment { assignment_id } => {
            println!("  Assignment: {}", assignment_id);
        }
    }
}

/// Print lookup misses like "submission not found: ..." instead of failing.
fn found<T>(result: std::result::Result<T, ServiceError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            println!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn parse_status(s: &str) -> Option<SubmissionStatus> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "pending_review" => Some(SubmissionStatus::PendingReview),
        "in_review" => Some(SubmissionStatus::InReview),
        "reviewed" => Some(SubmissionStatus::Reviewed),
        "needs_revision" => Some(SubmissionStatus::NeedsRevision),
        _ => None,
    }
}

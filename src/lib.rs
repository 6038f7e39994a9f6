pub mod ai;
pub mod ai_worker;
pub mod attempt;
pub mod db;
pub mod logger;
pub mod models;
pub mod monitor;
pub mod normalize;
pub mod quizfile;
pub mod report;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use ai::{
    parse_learning_path, parse_quiz_questions, CompletionBackend, LearningStep, ModelConfig,
    OpenRouterClient, DEFAULT_MODEL,
};
pub use attempt::{AttemptSession, EndReason, Phase, StartError};
pub use models::{AppState, Question, QuizAttempt, QuizDefinition, RecordedAnswer, TopicInput};
pub use monitor::{FocusMonitor, Verdict, DEFAULT_MAX_VIOLATIONS};
pub use normalize::normalize_quiz_questions;
pub use quizfile::{get_quiz_files, load_quiz_file};
pub use report::write_attempt_report;
pub use ui::{draw_menu, draw_quit_confirmation, draw_quiz, draw_start, draw_summary};
pub use utils::{format_clock, truncate_string};

use crate::models::{QuizAttempt, QuizDefinition};
use chrono::{Local, TimeZone};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn report_file_name(attempt: &QuizAttempt) -> String {
    format!("{}-attempt-{}.md", attempt.quiz_id, attempt.completed_at)
}

/// Write a shareable markdown report for a finished attempt. Best-effort:
/// callers log and move on when this fails.
pub fn write_attempt_report(
    dir: &Path,
    quiz: &QuizDefinition,
    attempt: &QuizAttempt,
) -> io::Result<PathBuf> {
    let path = dir.join(report_file_name(attempt));
    let mut file = File::create(&path)?;

    let completed = Local
        .timestamp_opt(attempt.completed_at as i64, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| attempt.completed_at.to_string());

    writeln!(file, "# {} - attempt report", quiz.title)?;
    writeln!(file)?;
    writeln!(
        file,
        "Score: {}% ({}/{} questions, {} graded correct)",
        attempt.score,
        attempt.answers.len(),
        attempt.total_questions,
        attempt.correct_answers
    )?;
    writeln!(file, "Time spent: {}s", attempt.time_spent_seconds)?;
    writeln!(file, "Completed: {}", completed)?;
    writeln!(file)?;

    for (i, question) in quiz.questions.iter().enumerate() {
        writeln!(file, "## {}. {}", i + 1, question.prompt)?;
        let recorded = attempt
            .answers
            .iter()
            .find(|a| a.question_id == question.id);

        match recorded {
            Some(answer) => {
                let picked = question
                    .options
                    .get(answer.selected_option)
                    .map(|s| s.as_str())
                    .unwrap_or("(unknown option)");
                let marker = match answer.is_correct {
                    Some(true) => "correct",
                    Some(false) => "incorrect",
                    None => "practice only",
                };
                writeln!(file, "Your answer: {} ({})", picked, marker)?;
            }
            None => writeln!(file, "Your answer: (not answered)")?,
        }

        if let Some(correct) = question.correct
            && let Some(option) = question.options.get(correct) {
                writeln!(file, "Correct answer: {}", option)?;
            }
        if let Some(explanation) = &question.explanation {
            writeln!(file)?;
            writeln!(file, "{}", explanation)?;
        }
        writeln!(file)?;
    }

    Ok(path)
}

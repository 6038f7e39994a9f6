use crate::models::{QuizAttempt, RecordedAnswer};
use rusqlite::{Connection, Result};

pub fn insert_attempt(conn: &Connection, attempt: &QuizAttempt) -> Result<u64> {
    let answers_json = serde_json::to_string(&attempt.answers)
        .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?;

    conn.execute(
        "INSERT INTO attempts (user_id, quiz_id, score, total_questions, correct_answers, time_spent_seconds, answers, completed_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            attempt.user_id,
            attempt.quiz_id,
            attempt.score,
            attempt.total_questions,
            attempt.correct_answers,
            attempt.time_spent_seconds,
            answers_json,
            attempt.completed_at
        ],
    )?;

    Ok(conn.last_insert_rowid() as u64)
}

/// Prior attempts for one learner on one quiz, newest first.
pub fn list_attempts(conn: &Connection, user_id: &str, quiz_id: &str) -> Result<Vec<QuizAttempt>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, quiz_id, score, total_questions, correct_answers, time_spent_seconds, answers, completed_at
         FROM attempts WHERE user_id = ? AND quiz_id = ? ORDER BY completed_at DESC",
    )?;

    let attempts = stmt
        .query_map([user_id, quiz_id], |row| {
            let answers_raw: String = row.get(6)?;
            let answers =
                serde_json::from_str::<Vec<RecordedAnswer>>(&answers_raw).unwrap_or_default();
            Ok(QuizAttempt {
                user_id: row.get(0)?,
                quiz_id: row.get(1)?,
                score: row.get(2)?,
                total_questions: row.get(3)?,
                correct_answers: row.get(4)?,
                time_spent_seconds: row.get(5)?,
                answers,
                completed_at: row.get(7)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(attempts)
}

pub fn best_score(conn: &Connection, user_id: &str, quiz_id: &str) -> Result<Option<u32>> {
    conn.query_row(
        "SELECT MAX(score) FROM attempts WHERE user_id = ? AND quiz_id = ?",
        [user_id, quiz_id],
        |row| row.get(0),
    )
}

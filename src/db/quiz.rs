use crate::models::{Question, QuizDefinition};
use rusqlite::{Connection, Result};
use std::time::{SystemTime, UNIX_EPOCH};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn questions_json(questions: &[Question]) -> Result<String> {
    serde_json::to_string(questions)
        .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))
}

pub fn save_quiz(conn: &Connection, quiz: &QuizDefinition) -> Result<()> {
    let ts = now();
    conn.execute(
        "INSERT INTO quizzes (id, title, description, questions, time_limit_secs, passing_score, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            questions = excluded.questions,
            time_limit_secs = excluded.time_limit_secs,
            passing_score = excluded.passing_score,
            updated_at = excluded.updated_at",
        rusqlite::params![
            quiz.id,
            quiz.title,
            quiz.description,
            questions_json(&quiz.questions)?,
            quiz.time_limit_secs,
            quiz.passing_score,
            ts,
            ts
        ],
    )?;
    Ok(())
}

fn row_to_quiz(row: &rusqlite::Row) -> rusqlite::Result<QuizDefinition> {
    let questions_raw: String = row.get(3)?;
    let questions =
        serde_json::from_str::<Vec<Question>>(&questions_raw).unwrap_or_default();
    Ok(QuizDefinition {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        questions,
        time_limit_secs: row.get(4)?,
        passing_score: row.get(5)?,
    })
}

pub fn get_quiz(conn: &Connection, id: &str) -> Result<Option<QuizDefinition>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, questions, time_limit_secs, passing_score
         FROM quizzes WHERE id = ?",
    )?;

    stmt.query_row([id], row_to_quiz).map(Some).or(Ok(None))
}

pub fn list_quizzes(conn: &Connection) -> Result<Vec<QuizDefinition>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, questions, time_limit_secs, passing_score
         FROM quizzes ORDER BY title",
    )?;

    let quizzes = stmt
        .query_map([], row_to_quiz)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(quizzes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sample_quiz(id: &str, title: &str) -> QuizDefinition {
        QuizDefinition {
            id: id.to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            questions: vec![Question {
                id: "q1".to_string(),
                prompt: "Prompt".to_string(),
                options: vec!["a".to_string(), "b".to_string()],
                correct: Some(1),
                explanation: None,
            }],
            time_limit_secs: 300,
            passing_score: 60,
        }
    }

    #[test]
    fn test_save_and_get_quiz() {
        let conn = setup_db();
        let quiz = sample_quiz("algebra", "Algebra");
        save_quiz(&conn, &quiz).unwrap();

        let loaded = get_quiz(&conn, "algebra").unwrap().unwrap();
        assert_eq!(loaded, quiz);
    }

    #[test]
    fn test_get_missing_quiz_is_none() {
        let conn = setup_db();
        assert!(get_quiz(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_save_twice_updates_in_place() {
        let conn = setup_db();
        save_quiz(&conn, &sample_quiz("algebra", "Algebra")).unwrap();
        save_quiz(&conn, &sample_quiz("algebra", "Algebra II")).unwrap();

        let all = list_quizzes(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Algebra II");
    }

    #[test]
    fn test_list_quizzes_ordered_by_title() {
        let conn = setup_db();
        save_quiz(&conn, &sample_quiz("z", "Zoology")).unwrap();
        save_quiz(&conn, &sample_quiz("a", "Astronomy")).unwrap();

        let titles: Vec<String> = list_quizzes(&conn)
            .unwrap()
            .into_iter()
            .map(|q| q.title)
            .collect();
        assert_eq!(titles, vec!["Astronomy".to_string(), "Zoology".to_string()]);
    }
}

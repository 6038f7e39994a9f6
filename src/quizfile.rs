use crate::models::QuizDefinition;
use crate::normalize::normalize_quiz_questions;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;
pub const DEFAULT_PASSING_SCORE: u32 = 60;

pub fn get_quiz_files() -> Vec<PathBuf> {
    let quizzes_dir = PathBuf::from("quizzes");
    let mut files = Vec::new();

    if quizzes_dir.exists() && quizzes_dir.is_dir()
        && let Ok(entries) = fs::read_dir(&quizzes_dir) {
            for entry in entries.flatten() {
                if let Some(ext) = entry.path().extension()
                    && ext == "json" {
                        files.push(entry.path());
                    }
            }
        }

    files.sort();
    files
}

/// Load one quiz file, tolerating the known shape variations through the
/// normalizer. Files that parse to zero questions still load; the start
/// screen surfaces them as the explicit no-questions state.
pub fn load_quiz_file(path: &PathBuf) -> io::Result<QuizDefinition> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "quiz".to_string());

    let title = value
        .get("title")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| stem.clone());

    let description = value
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    let time_limit_secs = ["time_limit", "time_limit_secs"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_u64()))
        .map(|n| n as u32)
        .unwrap_or(DEFAULT_TIME_LIMIT_SECS);

    let passing_score = value
        .get("passing_score")
        .and_then(|v| v.as_u64())
        .map(|n| (n as u32).min(100))
        .unwrap_or(DEFAULT_PASSING_SCORE);

    Ok(QuizDefinition {
        id: stem,
        title,
        description,
        questions: normalize_quiz_questions(&value),
        time_limit_secs,
        passing_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_quiz(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_full_quiz_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quiz(
            &dir,
            "forces.json",
            r#"{
                "title": "Forces and Motion",
                "description": "Newtonian basics",
                "time_limit": 420,
                "passing_score": 70,
                "questions": [
                    {"question": "Unit of force?", "options": ["Joule", "Newton"], "correct": 1}
                ]
            }"#,
        );

        let quiz = load_quiz_file(&path).unwrap();
        assert_eq!(quiz.id, "forces");
        assert_eq!(quiz.title, "Forces and Motion");
        assert_eq!(quiz.time_limit_secs, 420);
        assert_eq!(quiz.passing_score, 70);
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct, Some(1));
    }

    #[test]
    fn test_defaults_applied_when_fields_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quiz(
            &dir,
            "bare.json",
            r#"[{"question": "Q", "options": ["a", "b"]}]"#,
        );

        let quiz = load_quiz_file(&path).unwrap();
        assert_eq!(quiz.title, "bare");
        assert_eq!(quiz.time_limit_secs, DEFAULT_TIME_LIMIT_SECS);
        assert_eq!(quiz.passing_score, DEFAULT_PASSING_SCORE);
        assert_eq!(quiz.questions.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quiz(&dir, "broken.json", "not json at all {");
        assert!(load_quiz_file(&path).is_err());
    }

    #[test]
    fn test_shapeless_json_loads_with_no_questions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quiz(&dir, "odd.json", r#"{"title": "Odd"}"#);
        let quiz = load_quiz_file(&path).unwrap();
        assert!(quiz.questions.is_empty());
    }

    #[test]
    fn test_passing_score_clamped_to_100() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quiz(
            &dir,
            "clamp.json",
            r#"{"passing_score": 250, "questions": [{"question": "Q", "options": ["a", "b"]}]}"#,
        );
        assert_eq!(load_quiz_file(&path).unwrap().passing_score, 100);
    }
}

use crate::models::Question;
use serde_json::Value;

/// Normalize question data of any known source shape into the single
/// internal form: ordered options plus an optional zero-based correct index.
///
/// Accepted shapes:
/// - a flat array of question objects, or `{"questions": [...]}`;
/// - options as an array, or as a letter-keyed object (keys sorted);
/// - the correct answer as a zero-based index, a numeric string, or a
///   letter key ("B" -> 1).
///
/// A present-but-malformed correct field defaults to index 0; a missing one
/// marks the question practice-only. Entries with no prompt or fewer than
/// two options are dropped. Unknown top-level shapes produce an empty set.
pub fn normalize_quiz_questions(value: &Value) -> Vec<Question> {
    let Some(raw) = question_array(value) else {
        return Vec::new();
    };

    raw.iter()
        .enumerate()
        .filter_map(|(index, entry)| normalize_question(index, entry))
        .collect()
}

fn question_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("questions").and_then(|q| q.as_array()),
        _ => None,
    }
}

fn normalize_question(index: usize, entry: &Value) -> Option<Question> {
    let obj = entry.as_object()?;

    let prompt = ["question", "prompt", "text"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
        .unwrap_or("")
        .trim()
        .to_string();
    if prompt.is_empty() {
        return None;
    }

    let options = ["options", "choices", "answers"]
        .iter()
        .find_map(|key| obj.get(*key))
        .map(normalize_options)
        .unwrap_or_default();
    if options.len() < 2 {
        return None;
    }

    let correct = ["correct", "correct_answer", "correctAnswer", "answer"]
        .iter()
        .find_map(|key| obj.get(*key))
        .map(|v| normalize_correct(v, options.len()));

    let id = obj
        .get("id")
        .and_then(id_string)
        .unwrap_or_else(|| format!("q{}", index + 1));

    let explanation = obj
        .get("explanation")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Some(Question {
        id,
        prompt,
        options,
        correct,
        explanation,
    })
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_options(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Object(map) => {
            // Letter-keyed options: {"a": "...", "b": "..."}. serde_json map
            // order is insertion order, so sort keys for a stable layout.
            let mut keyed: Vec<(&String, &Value)> = map.iter().collect();
            keyed.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
            keyed
                .into_iter()
                .filter_map(|(_, v)| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Defaulting, never throwing: any unintelligible value becomes index 0.
fn normalize_correct(value: &Value, options_len: usize) -> usize {
    let index = match value {
        Value::Number(n) => n.as_u64().map(|i| i as usize).unwrap_or(0),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<usize>() {
                n
            } else if let Some(letter) = letter_index(trimmed) {
                letter
            } else {
                0
            }
        }
        _ => 0,
    };
    if index < options_len { index } else { 0 }
}

fn letter_index(s: &str) -> Option<usize> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_alphabetic() {
        return None;
    }
    Some(first.to_ascii_uppercase() as usize - 'A' as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_array_shape() {
        let value = json!([
            {
                "id": "q1",
                "question": "What is 2+2?",
                "options": ["3", "4", "5", "6"],
                "correct": 1,
                "explanation": "Basic arithmetic."
            }
        ]);
        let questions = normalize_quiz_questions(&value);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "What is 2+2?");
        assert_eq!(questions[0].correct, Some(1));
        assert_eq!(
            questions[0].explanation,
            Some("Basic arithmetic.".to_string())
        );
    }

    #[test]
    fn test_nested_questions_shape() {
        let value = json!({
            "questions": [
                {"prompt": "Pick one", "choices": ["x", "y"], "answer": 0}
            ]
        });
        let questions = normalize_quiz_questions(&value);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options, vec!["x", "y"]);
        assert_eq!(questions[0].correct, Some(0));
    }

    #[test]
    fn test_keyed_options_sorted() {
        let value = json!([
            {
                "question": "Which planet is closest to the sun?",
                "options": {"c": "Earth", "a": "Mercury", "b": "Venus"},
                "correct": "a"
            }
        ]);
        let questions = normalize_quiz_questions(&value);
        assert_eq!(questions[0].options, vec!["Mercury", "Venus", "Earth"]);
        assert_eq!(questions[0].correct, Some(0));
    }

    #[test]
    fn test_letter_answer_maps_to_index() {
        let value = json!([
            {"question": "Q", "options": ["a", "b", "c", "d"], "correct_answer": "B"}
        ]);
        assert_eq!(normalize_quiz_questions(&value)[0].correct, Some(1));
    }

    #[test]
    fn test_numeric_string_answer() {
        let value = json!([
            {"question": "Q", "options": ["a", "b", "c"], "answer": "2"}
        ]);
        assert_eq!(normalize_quiz_questions(&value)[0].correct, Some(2));
    }

    #[test]
    fn test_missing_answer_is_practice_only() {
        let value = json!([
            {"question": "Q", "options": ["a", "b"]}
        ]);
        assert_eq!(normalize_quiz_questions(&value)[0].correct, None);
    }

    #[test]
    fn test_malformed_answer_defaults_to_zero() {
        let value = json!([
            {"question": "Q", "options": ["a", "b"], "correct": {"weird": true}},
            {"question": "Q2", "options": ["a", "b"], "correct": "nonsense"},
            {"question": "Q3", "options": ["a", "b"], "correct": 17}
        ]);
        let questions = normalize_quiz_questions(&value);
        assert_eq!(questions[0].correct, Some(0));
        assert_eq!(questions[1].correct, Some(0));
        // Out-of-range index also falls back rather than throwing.
        assert_eq!(questions[2].correct, Some(0));
    }

    #[test]
    fn test_entries_without_prompt_or_options_dropped() {
        let value = json!([
            {"options": ["a", "b"], "correct": 0},
            {"question": "only one option", "options": ["a"]},
            {"question": "   ", "options": ["a", "b"]},
            {"question": "kept", "options": ["a", "b"], "correct": 1}
        ]);
        let questions = normalize_quiz_questions(&value);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "kept");
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert!(normalize_quiz_questions(&json!("just a string")).is_empty());
        assert!(normalize_quiz_questions(&json!(42)).is_empty());
        assert!(normalize_quiz_questions(&json!({"no_questions": []})).is_empty());
    }

    #[test]
    fn test_generated_ids_are_one_based() {
        let value = json!([
            {"question": "A", "options": ["x", "y"]},
            {"question": "B", "options": ["x", "y"]}
        ]);
        let questions = normalize_quiz_questions(&value);
        assert_eq!(questions[0].id, "q1");
        assert_eq!(questions[1].id, "q2");
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let value = json!([
            {"id": 7, "question": "A", "options": ["x", "y"]}
        ]);
        assert_eq!(normalize_quiz_questions(&value)[0].id, "7");
    }
}

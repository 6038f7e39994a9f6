use crate::models::Question;
use crate::normalize::normalize_quiz_questions;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref NUMBERED: Regex = Regex::new(r"^\s*\d+[.)]\s*(.+)$").unwrap();
    static ref OPTION: Regex = Regex::new(r"^\s*([A-Da-d])[.)]\s*(.+)$").unwrap();
    static ref ANSWER: Regex = Regex::new(r"(?i)^\s*answer\s*[:\-]\s*([A-Da-d])\b").unwrap();
    static ref EXPLANATION: Regex = Regex::new(r"(?i)^\s*explanation\s*[:\-]\s*(.+)$").unwrap();
    static ref JSON_BLOCK: Regex = Regex::new(r"(?s)\{.*\}|\[.*\]").unwrap();
    static ref KEYWORD: Regex =
        Regex::new(r"(?i)^\s*-?\s*(time|duration|difficulty|prerequisites)\s*[:\-]\s*(.+)$")
            .unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStep {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "time")]
    pub estimated_time: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

/// Strip markdown fences and pull the outermost JSON block out of a
/// completion, if there is one.
fn extract_json(response: &str) -> Option<String> {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    JSON_BLOCK
        .find(&cleaned)
        .map(|m| m.as_str().trim().to_string())
}

/// Best-effort: free-text completion in, renderable questions out. JSON is
/// tried first, then a numbered-line heuristic; a fixed placeholder set
/// covers total parse failure. Never panics on malformed input.
pub fn parse_quiz_questions(topic: &str, response: &str) -> Vec<Question> {
    if let Some(block) = extract_json(response)
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&block) {
            let questions = normalize_quiz_questions(&value);
            if !questions.is_empty() {
                return questions;
            }
        }

    let questions = parse_numbered_questions(response);
    if !questions.is_empty() {
        return questions;
    }

    placeholder_questions(topic)
}

fn parse_numbered_questions(response: &str) -> Vec<Question> {
    let mut questions: Vec<Question> = Vec::new();
    let mut current: Option<Question> = None;

    for line in response.lines() {
        if let Some(caps) = NUMBERED.captures(line) {
            push_if_complete(&mut questions, current.take());
            current = Some(Question {
                id: format!("q{}", questions.len() + 1),
                prompt: caps[1].trim().to_string(),
                options: Vec::new(),
                correct: None,
                explanation: None,
            });
            continue;
        }

        let Some(question) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = OPTION.captures(line) {
            question.options.push(caps[2].trim().to_string());
        } else if let Some(caps) = ANSWER.captures(line) {
            let letter = caps[1].to_ascii_uppercase().chars().next().unwrap_or('A');
            let index = letter as usize - 'A' as usize;
            if index < question.options.len() {
                question.correct = Some(index);
            } else {
                question.correct = Some(0);
            }
        } else if let Some(caps) = EXPLANATION.captures(line) {
            question.explanation = Some(caps[1].trim().to_string());
        }
    }

    push_if_complete(&mut questions, current);
    questions
}

fn push_if_complete(questions: &mut Vec<Question>, candidate: Option<Question>) {
    if let Some(question) = candidate
        && question.options.len() >= 2 {
            questions.push(question);
        }
}

/// Best-effort learning-path extraction: numbered lines become steps,
/// keyword prefixes fill the fields. Text without a single numbered line
/// falls back to three generic steps so the UI always renders something.
pub fn parse_learning_path(topic: &str, response: &str) -> Vec<LearningStep> {
    if let Some(block) = extract_json(response)
        && let Ok(steps) = serde_json::from_str::<Vec<LearningStep>>(&block)
        && !steps.is_empty() {
            return steps;
        }

    let steps = parse_numbered_steps(response);
    if !steps.is_empty() {
        return steps;
    }

    placeholder_steps(topic)
}

fn parse_numbered_steps(response: &str) -> Vec<LearningStep> {
    let mut steps: Vec<LearningStep> = Vec::new();

    for line in response.lines() {
        if let Some(caps) = NUMBERED.captures(line) {
            steps.push(LearningStep {
                title: caps[1].trim().trim_matches('*').trim().to_string(),
                description: String::new(),
                estimated_time: String::new(),
                difficulty: String::new(),
                prerequisites: Vec::new(),
            });
            continue;
        }

        let Some(step) = steps.last_mut() else {
            continue;
        };

        if let Some(caps) = KEYWORD.captures(line) {
            let value = caps[2].trim().to_string();
            match caps[1].to_lowercase().as_str() {
                "time" | "duration" => step.estimated_time = value,
                "difficulty" => step.difficulty = value.to_lowercase(),
                "prerequisites" => {
                    step.prerequisites = value
                        .split(',')
                        .map(|p| p.trim().to_string())
                        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("none"))
                        .collect();
                }
                _ => {}
            }
        } else if !line.trim().is_empty() {
            if !step.description.is_empty() {
                step.description.push(' ');
            }
            step.description.push_str(line.trim());
        }
    }

    steps
}

fn placeholder_questions(topic: &str) -> Vec<Question> {
    vec![
        Question {
            id: "q1".to_string(),
            prompt: format!("Which of these is a core concept of {}?", topic),
            options: vec![
                "The fundamental principle covered in most introductions".to_string(),
                "An unrelated concept".to_string(),
                "A historical footnote".to_string(),
                "None of the above".to_string(),
            ],
            correct: Some(0),
            explanation: Some(
                "Generated content was unavailable; review the basics and retry.".to_string(),
            ),
        },
        Question {
            id: "q2".to_string(),
            prompt: format!("What is a good first step when studying {}?", topic),
            options: vec![
                "Work through introductory examples".to_string(),
                "Skip straight to advanced material".to_string(),
                "Memorize without practice".to_string(),
                "Avoid the subject entirely".to_string(),
            ],
            correct: Some(0),
            explanation: None,
        },
    ]
}

fn placeholder_steps(topic: &str) -> Vec<LearningStep> {
    vec![
        LearningStep {
            title: format!("Learn the fundamentals of {}", topic),
            description: "Review core definitions and work through introductory examples."
                .to_string(),
            estimated_time: "1-2 weeks".to_string(),
            difficulty: "beginner".to_string(),
            prerequisites: vec![],
        },
        LearningStep {
            title: format!("Practice {} with guided problems", topic),
            description: "Solve progressively harder exercises and review mistakes.".to_string(),
            estimated_time: "2-3 weeks".to_string(),
            difficulty: "intermediate".to_string(),
            prerequisites: vec!["fundamentals".to_string()],
        },
        LearningStep {
            title: format!("Apply {} to a small project", topic),
            description: "Consolidate by building or solving something end to end.".to_string(),
            estimated_time: "2-4 weeks".to_string(),
            difficulty: "advanced".to_string(),
            prerequisites: vec!["guided practice".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_from_json_response() {
        let response = r#"Here is your quiz:
```json
{"questions": [
    {"question": "Unit of charge?", "options": ["Coulomb", "Volt"], "correct": 0}
]}
```"#;
        let questions = parse_quiz_questions("electricity", response);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "Unit of charge?");
        assert_eq!(questions[0].correct, Some(0));
    }

    #[test]
    fn test_quiz_from_numbered_lines() {
        let response = "\
1. What is H2O?
A) Hydrogen
B) Water
C) Helium
D) Oxygen
Answer: B
Explanation: Two hydrogen atoms bonded to one oxygen atom.

2. What is NaCl?
a) Salt
b) Sugar
Answer: a";
        let questions = parse_quiz_questions("chemistry", response);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt, "What is H2O?");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].correct, Some(1));
        assert_eq!(
            questions[0].explanation.as_deref(),
            Some("Two hydrogen atoms bonded to one oxygen atom.")
        );
        assert_eq!(questions[1].correct, Some(0));
    }

    #[test]
    fn test_quiz_answer_letter_out_of_range_defaults() {
        let response = "\
1. Prompt?
A) one
B) two
Answer: D";
        let questions = parse_quiz_questions("t", response);
        assert_eq!(questions[0].correct, Some(0));
    }

    #[test]
    fn test_quiz_garbage_falls_back_to_placeholders() {
        let questions = parse_quiz_questions("calculus", "I'm sorry, I can't do that.");
        assert_eq!(questions.len(), 2);
        assert!(questions[0].prompt.contains("calculus"));
        assert!(questions.iter().all(|q| q.options.len() >= 2));
    }

    #[test]
    fn test_quiz_numbered_line_without_options_dropped() {
        let response = "1. A prompt with no options at all\njust prose below it";
        // Falls through to placeholders since nothing complete was parsed.
        let questions = parse_quiz_questions("physics", response);
        assert!(questions[0].prompt.contains("physics"));
    }

    #[test]
    fn test_path_from_numbered_lines_with_keywords() {
        let response = "\
1. **Foundations of linear algebra**
Vectors, matrices and the geometry behind them.
Time: 2 weeks
Difficulty: Beginner
Prerequisites: none

2. Eigenvalues and decompositions
- time: 3 weeks
- difficulty: Intermediate
- prerequisites: foundations, basic calculus";
        let steps = parse_learning_path("linear algebra", response);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "Foundations of linear algebra");
        assert_eq!(steps[0].estimated_time, "2 weeks");
        assert_eq!(steps[0].difficulty, "beginner");
        assert!(steps[0].prerequisites.is_empty());
        assert!(steps[0].description.contains("Vectors"));
        assert_eq!(
            steps[1].prerequisites,
            vec!["foundations".to_string(), "basic calculus".to_string()]
        );
    }

    #[test]
    fn test_path_without_numbered_lines_falls_back_to_three_steps() {
        let steps = parse_learning_path("topology", "Just study hard and it will work out.");
        assert_eq!(steps.len(), 3);
        let difficulties: Vec<&str> = steps.iter().map(|s| s.difficulty.as_str()).collect();
        assert_eq!(difficulties, vec!["beginner", "intermediate", "advanced"]);
        assert!(steps[0].title.contains("topology"));
    }

    #[test]
    fn test_path_from_json_array() {
        let response = r#"[
            {"title": "Start", "time": "1 week", "difficulty": "beginner"},
            {"title": "Continue", "estimated_time": "2 weeks", "difficulty": "advanced"}
        ]"#;
        let steps = parse_learning_path("t", response);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].estimated_time, "1 week");
        assert_eq!(steps[1].estimated_time, "2 weeks");
    }

    #[test]
    fn test_parsers_never_panic_on_weird_input() {
        for input in ["", "\n\n\n", "1.", "A)", "Answer: Z", "{not json", "```\n```"] {
            let _ = parse_quiz_questions("t", input);
            let _ = parse_learning_path("t", input);
        }
    }

    #[test]
    fn test_extract_json_block() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(fenced).as_deref(), Some("{\"a\": 1}"));

        let inline = "answer: {\"a\": 1} thanks";
        assert_eq!(extract_json(inline).as_deref(), Some("{\"a\": 1}"));

        assert_eq!(extract_json("no json here"), None);
    }
}

pub mod client;
pub mod parser;

// Public API exports
pub use client::{CompletionBackend, ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use parser::{parse_learning_path, parse_quiz_questions, LearningStep};

pub const TUTOR_CONTEXT: &str =
    "You are a STEM tutor generating study material. Be concise and factual.";

pub fn quiz_prompt(topic: &str, count: usize) -> String {
    format!(
        r#"Generate a {count}-question multiple-choice quiz about "{topic}" and respond ONLY with valid JSON.

IMPORTANT:

- Respond ONLY with this exact JSON structure (no markdown, no extra text):
{{
    "questions": [
        {{
            "question": "prompt text",
            "options": ["option 1", "option 2", "option 3", "option 4"],
            "correct": 0,
            "explanation": "why the correct option is right"
        }}
    ]
}}
- "correct" is the zero-based index into "options".
- Every question must have exactly 4 options.
"#
    )
}

pub fn learning_path_prompt(topic: &str) -> String {
    format!(
        r#"Create a step-by-step learning path for "{topic}".

Format each step as a numbered line followed by detail lines, like:
1. Step title
Short description of the step.
Time: estimated duration
Difficulty: beginner, intermediate, or advanced
Prerequisites: comma-separated list, or "none"
"#
    )
}

use serde::{Deserialize, Serialize};

use crate::ai::LearningStep;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// Zero-based index of the correct option. `None` marks a practice-only
    /// question that is recorded but never scored.
    pub correct: Option<usize>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub time_limit_secs: u32,
    /// Minimum score percent counted as a pass.
    pub passing_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub question_id: String,
    pub selected_option: usize,
    /// `None` when the question carries no stored correct option.
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    pub user_id: String,
    pub quiz_id: String,
    pub score: u32,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub time_spent_seconds: u32,
    pub answers: Vec<RecordedAnswer>,
    pub completed_at: u64,
}

impl QuizAttempt {
    pub fn passed(&self, quiz: &QuizDefinition) -> bool {
        self.score >= quiz.passing_score
    }
}

#[derive(Debug)]
pub enum AiJob {
    GenerateQuiz { topic: String },
    LearningPath { topic: String },
}

#[derive(Debug)]
pub enum AiReply {
    Quiz {
        topic: String,
        quiz: QuizDefinition,
    },
    Path {
        topic: String,
        steps: Vec<LearningStep>,
    },
    Error {
        topic: String,
        error: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Start,
    Quiz,
    QuizQuitConfirm,
    Summary,
    LearningPath,
}

/// Cursor-addressed single-line input buffer for the AI topic field.
#[derive(Debug, Default)]
pub struct TopicInput {
    pub buffer: String,
    pub cursor: usize,
    pub active: bool,
}

impl TopicInput {
    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.buffer[..self.cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor -= prev;
            self.buffer.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            let prev = self.buffer[..self.cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor -= prev;
        }
    }

    pub fn right(&mut self) {
        if self.cursor < self.buffer.len() {
            let next = self.buffer[self.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor += next;
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

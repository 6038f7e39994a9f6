use crate::logger;
use crate::models::{Question, QuizAttempt, QuizDefinition, RecordedAnswer};
use rand::seq::SliceRandom;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    NoQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Completed,
    TimeExpired,
    FocusViolations,
    Abandoned,
}

impl EndReason {
    pub fn describe(&self) -> &'static str {
        match self {
            EndReason::Completed => "all questions answered",
            EndReason::TimeExpired => "time expired",
            EndReason::FocusViolations => "too many focus losses",
            EndReason::Abandoned => "attempt abandoned",
        }
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Drives a single timed quiz attempt from start to scored result.
///
/// The phase machine is `NotStarted -> InProgress -> Finished`; `InProgress`
/// is re-entered only through `reset()`. `finish()` is guarded so the timer
/// hitting zero and a user action racing it produce exactly one attempt
/// payload.
#[derive(Debug)]
pub struct AttemptSession {
    quiz: QuizDefinition,
    user_id: String,
    current_index: usize,
    correct_count: usize,
    answers: Vec<RecordedAnswer>,
    remaining_secs: u32,
    phase: Phase,
    end_reason: Option<EndReason>,
}

impl AttemptSession {
    pub fn new(quiz: QuizDefinition, user_id: String) -> Self {
        let remaining_secs = quiz.time_limit_secs;
        Self {
            quiz,
            user_id,
            current_index: 0,
            correct_count: 0,
            answers: Vec::new(),
            remaining_secs,
            phase: Phase::NotStarted,
            end_reason: None,
        }
    }

    pub fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current_index)
    }

    /// The answer recorded for the question currently on screen, if any.
    pub fn recorded_for_current(&self) -> Option<&RecordedAnswer> {
        self.answers.get(self.current_index)
    }

    pub fn has_answered_current(&self) -> bool {
        self.answers.len() > self.current_index
    }

    /// Transition from NotStarted to InProgress. An empty question set is
    /// refused with an explicit outcome; no timer runs and no answers are
    /// accepted for it.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.quiz.questions.is_empty() {
            return Err(StartError::NoQuestions);
        }
        if self.phase == Phase::NotStarted {
            self.phase = Phase::InProgress;
            logger::log(&format!(
                "Attempt started: quiz={} questions={} limit={}s",
                self.quiz.id,
                self.quiz.questions.len(),
                self.quiz.time_limit_secs
            ));
        }
        Ok(())
    }

    /// Record the learner's pick for the current question. Valid only while
    /// in progress, once per question; a no-op on finished sessions.
    pub fn answer(&mut self, selected_option: usize) {
        if self.phase != Phase::InProgress || self.has_answered_current() {
            return;
        }
        let Some(question) = self.quiz.questions.get(self.current_index) else {
            return;
        };
        let is_correct = question.correct.map(|c| c == selected_option);
        if is_correct == Some(true) {
            self.correct_count += 1;
        }
        self.answers.push(RecordedAnswer {
            question_id: question.id.clone(),
            selected_option,
            is_correct,
        });
    }

    /// Advance to the next question; on the last question this finishes the
    /// attempt instead and returns the payload.
    pub fn next(&mut self) -> Option<QuizAttempt> {
        if self.phase != Phase::InProgress {
            return None;
        }
        if self.current_index + 1 >= self.quiz.questions.len() {
            return self.finish(EndReason::Completed);
        }
        self.current_index += 1;
        None
    }

    /// One-second countdown tick. Finishes the attempt when time runs out.
    pub fn tick(&mut self) -> Option<QuizAttempt> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.finish(EndReason::TimeExpired);
        }
        None
    }

    /// Idempotent: the first call builds the attempt payload, every later
    /// call returns `None` so a timer/user race cannot double-submit.
    pub fn finish(&mut self, reason: EndReason) -> Option<QuizAttempt> {
        if self.phase == Phase::Finished {
            return None;
        }
        if self.phase == Phase::NotStarted {
            return None;
        }
        self.phase = Phase::Finished;
        self.end_reason = Some(reason);

        let graded_total = self
            .quiz
            .questions
            .iter()
            .filter(|q| q.correct.is_some())
            .count();
        let score = if graded_total == 0 {
            0
        } else {
            ((self.correct_count as f64 / graded_total as f64) * 100.0).round() as u32
        };

        logger::log(&format!(
            "Attempt finished: quiz={} score={} correct={}/{} reason={:?}",
            self.quiz.id, score, self.correct_count, graded_total, reason
        ));

        Some(QuizAttempt {
            user_id: self.user_id.clone(),
            quiz_id: self.quiz.id.clone(),
            score,
            total_questions: self.quiz.questions.len(),
            correct_answers: self.correct_count,
            time_spent_seconds: self.quiz.time_limit_secs - self.remaining_secs,
            answers: self.answers.clone(),
            completed_at: now(),
        })
    }

    /// Clear all attempt state back to initial values for a retake.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.correct_count = 0;
        self.answers.clear();
        self.remaining_secs = self.quiz.time_limit_secs;
        self.phase = Phase::NotStarted;
        self.end_reason = None;
    }

    /// Reshuffle question order for a retake. Only meaningful before start.
    pub fn shuffle_questions<R: rand::Rng>(&mut self, rng: &mut R) {
        if self.phase == Phase::NotStarted {
            self.quiz.questions.shuffle(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, correct: Option<usize>) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Prompt {}", id),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct,
            explanation: None,
        }
    }

    fn quiz(questions: Vec<Question>) -> QuizDefinition {
        QuizDefinition {
            id: "test-quiz".to_string(),
            title: "Test Quiz".to_string(),
            description: String::new(),
            questions,
            time_limit_secs: 300,
            passing_score: 60,
        }
    }

    fn started(questions: Vec<Question>) -> AttemptSession {
        let mut session = AttemptSession::new(quiz(questions), "local".to_string());
        session.start().unwrap();
        session
    }

    #[test]
    fn test_empty_quiz_refuses_to_start() {
        let mut session = AttemptSession::new(quiz(vec![]), "local".to_string());
        assert_eq!(session.start(), Err(StartError::NoQuestions));
        assert_eq!(session.phase(), Phase::NotStarted);

        // No timer and no answers on a session that never started.
        assert!(session.tick().is_none());
        session.answer(0);
        assert!(session.answers().is_empty());
        assert_eq!(session.remaining_secs(), 300);
    }

    #[test]
    fn test_score_rounding_example_scenario() {
        // 3 questions, 300s, answers [correct, wrong, correct] -> 2 correct,
        // score 67 (round of 66.67).
        let mut session = started(vec![
            question("q1", Some(0)),
            question("q2", Some(1)),
            question("q3", Some(2)),
        ]);

        for _ in 0..30 {
            assert!(session.tick().is_none());
        }

        session.answer(0); // correct
        assert!(session.next().is_none());
        session.answer(3); // wrong
        assert!(session.next().is_none());
        session.answer(2); // correct

        let attempt = session.next().expect("finishing on last question");
        assert_eq!(attempt.correct_answers, 2);
        assert_eq!(attempt.score, 67);
        assert_eq!(attempt.total_questions, 3);
        assert_eq!(attempt.time_spent_seconds, 30);
        assert_eq!(session.end_reason(), Some(EndReason::Completed));
        assert_eq!(attempt.answers.len(), 3);
        assert_eq!(attempt.answers[0].is_correct, Some(true));
        assert_eq!(attempt.answers[1].is_correct, Some(false));
        assert_eq!(attempt.answers[2].is_correct, Some(true));
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut session = started(vec![question("q1", Some(0))]);
        session.answer(0);

        let first = session.finish(EndReason::Completed);
        assert!(first.is_some());

        // Timer-zero arriving after a user-driven finish must be a no-op.
        assert!(session.finish(EndReason::TimeExpired).is_none());
        assert!(session.tick().is_none());
        assert!(session.next().is_none());
        assert_eq!(session.end_reason(), Some(EndReason::Completed));
    }

    #[test]
    fn test_timer_expiry_finishes_once() {
        let mut session = started(vec![question("q1", Some(0)), question("q2", Some(0))]);
        session.answer(0);

        let mut payloads = 0;
        for _ in 0..400 {
            if session.tick().is_some() {
                payloads += 1;
            }
        }
        assert_eq!(payloads, 1);
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.end_reason(), Some(EndReason::TimeExpired));
    }

    #[test]
    fn test_time_spent_on_expiry_equals_limit() {
        let mut session = started(vec![question("q1", Some(0))]);
        let mut attempt = None;
        for _ in 0..300 {
            if let Some(a) = session.tick() {
                attempt = Some(a);
            }
        }
        assert_eq!(attempt.unwrap().time_spent_seconds, 300);
    }

    #[test]
    fn test_answer_is_noop_after_finish() {
        let mut session = started(vec![question("q1", Some(0))]);
        session.finish(EndReason::Abandoned);

        session.answer(0);
        assert!(session.answers().is_empty());
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn test_answer_recorded_once_per_question() {
        let mut session = started(vec![question("q1", Some(1))]);
        session.answer(0);
        session.answer(1); // second pick for the same question is ignored
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].selected_option, 0);
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn test_practice_only_questions_do_not_affect_score() {
        let mut session = started(vec![
            question("q1", Some(0)),
            question("q2", None), // practice-only
        ]);
        session.answer(0);
        session.next();
        session.answer(3);

        let attempt = session.next().unwrap();
        assert_eq!(attempt.answers[1].is_correct, None);
        assert_eq!(attempt.correct_answers, 1);
        // Graded denominator excludes the practice-only question.
        assert_eq!(attempt.score, 100);
    }

    #[test]
    fn test_score_zero_when_nothing_graded() {
        let mut session = started(vec![question("q1", None)]);
        session.answer(0);
        let attempt = session.next().unwrap();
        assert_eq!(attempt.score, 0);
    }

    #[test]
    fn test_reset_restores_initial_state_and_reruns_identically() {
        let questions = vec![
            question("q1", Some(0)),
            question("q2", Some(1)),
            question("q3", Some(2)),
        ];
        let mut session = started(questions);

        let run = |session: &mut AttemptSession| {
            session.answer(0);
            session.next();
            session.answer(3);
            session.next();
            session.answer(2);
            session.next().unwrap()
        };

        let first = run(&mut session);

        session.reset();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.correct_count(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.remaining_secs(), 300);
        assert!(session.end_reason().is_none());

        session.start().unwrap();
        let second = run(&mut session);
        assert_eq!(first.score, second.score);
        assert_eq!(first.correct_answers, second.correct_answers);
    }

    #[test]
    fn test_next_before_last_does_not_finish() {
        let mut session = started(vec![question("q1", Some(0)), question("q2", Some(0))]);
        session.answer(0);
        assert!(session.next().is_none());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_finish_before_start_is_noop() {
        let mut session = AttemptSession::new(quiz(vec![question("q1", Some(0))]), "u".into());
        assert!(session.finish(EndReason::Abandoned).is_none());
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_recorded_for_current_tracks_navigation() {
        let mut session = started(vec![question("q1", Some(0)), question("q2", Some(0))]);
        assert!(session.recorded_for_current().is_none());
        session.answer(0);
        assert!(session.has_answered_current());
        assert_eq!(
            session.recorded_for_current().unwrap().question_id,
            "q1".to_string()
        );
        session.next();
        assert!(!session.has_answered_current());
    }

    #[test]
    fn test_shuffle_only_before_start() {
        let questions: Vec<Question> =
            (0..20).map(|i| question(&format!("q{}", i), Some(0))).collect();
        let mut session = AttemptSession::new(quiz(questions.clone()), "u".into());
        session.start().unwrap();

        let mut rng = rand::thread_rng();
        session.shuffle_questions(&mut rng);
        let order: Vec<String> = session
            .quiz()
            .questions
            .iter()
            .map(|q| q.id.clone())
            .collect();
        let original: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        // Shuffling an in-progress attempt must not reorder the questions.
        assert_eq!(order, original);
    }
}

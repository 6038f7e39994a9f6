use crate::attempt::AttemptSession;
use crate::models::QuizAttempt;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::{format_clock, truncate_string};
use chrono::{Local, TimeZone};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn format_attempt_date(timestamp: u64) -> String {
    Local
        .timestamp_opt(timestamp as i64, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn draw_summary(
    f: &mut Frame,
    session: &AttemptSession,
    attempt: &QuizAttempt,
    history: &[QuizAttempt],
) {
    let layout = calculate_summary_chunks(f.area());
    let quiz = session.quiz();

    let title = Paragraph::new(format!("Attempt Summary - {}", quiz.title))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let passed = attempt.passed(quiz);
    let verdict = if passed { "PASSED" } else { "FAILED" };
    let verdict_style = if passed {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    let mut score_text = Text::default();
    score_text.push_line(Line::from(vec![
        Span::from(format!("Score: {}%  ", attempt.score)),
        Span::styled(verdict, verdict_style),
        Span::from(format!("  (pass mark {}%)", quiz.passing_score)),
    ]));
    score_text.push_line(Line::from(format!(
        "Correct: {} of {} questions  |  Time: {} of {}",
        attempt.correct_answers,
        attempt.total_questions,
        format_clock(attempt.time_spent_seconds),
        format_clock(quiz.time_limit_secs)
    )));
    if let Some(reason) = session.end_reason() {
        score_text.push_line(Line::from(format!("Ended: {}", reason.describe())));
    }
    let score = Paragraph::new(score_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let mut review = Text::default();
    for (i, question) in quiz.questions.iter().enumerate() {
        let recorded = attempt.answers.iter().find(|a| a.question_id == question.id);
        let marker = match recorded.map(|a| a.is_correct) {
            Some(Some(true)) => "[✓]",
            Some(Some(false)) => "[✗]",
            Some(None) => "[~]",
            None => "[ ]",
        };
        review.push_line(Line::from(format!(
            "{} {}. {}",
            marker,
            i + 1,
            truncate_string(&question.prompt, 60)
        )));
        if let Some(answer) = recorded
            && let Some(picked) = question.options.get(answer.selected_option) {
                review.push_line(Line::from(format!(
                    "    Your answer: {}",
                    truncate_string(picked, 56)
                )));
            }
    }
    let review_widget = Paragraph::new(review)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Review"));
    f.render_widget(review_widget, layout.review_area);

    let mut history_text = Text::default();
    if history.is_empty() {
        history_text.push_line(Line::from("This was your first attempt."));
    } else {
        for prior in history.iter().take(5) {
            history_text.push_line(Line::from(format!(
                "{}  {}%  ({}/{} correct)",
                format_attempt_date(prior.completed_at),
                prior.score,
                prior.correct_answers,
                prior.total_questions
            )));
        }
    }
    let history_widget = Paragraph::new(history_text)
        .block(Block::default().borders(Borders::ALL).title("Previous Attempts"));
    f.render_widget(history_widget, layout.history_area);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "r",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Retake  "),
        Span::styled(
            "m",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Main Menu  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

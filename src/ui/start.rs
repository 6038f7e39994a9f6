use crate::models::QuizDefinition;
use crate::utils::format_clock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_start(f: &mut Frame, quiz: &QuizDefinition, max_violations: u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(quiz.title.as_str())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut body = Text::default();
    if !quiz.description.is_empty() {
        body.push_line(Line::from(quiz.description.as_str()));
        body.push_line(Line::from(""));
    }
    body.push_line(Line::from(format!(
        "Questions: {}",
        quiz.questions.len()
    )));
    body.push_line(Line::from(format!(
        "Time limit: {}",
        format_clock(quiz.time_limit_secs)
    )));
    body.push_line(Line::from(format!("Passing score: {}%", quiz.passing_score)));
    body.push_line(Line::from(""));
    body.push_line(Line::from(format!(
        "Stay focused: after {} focus losses the attempt is submitted as-is.",
        max_violations
    )));

    if quiz.questions.is_empty() {
        body.push_line(Line::from(""));
        body.push_line(Line::from(Span::styled(
            "This quiz has no questions to attempt.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let info = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Ready?"));
    f.render_widget(info, chunks[1]);

    let mut help_spans = Vec::new();
    if !quiz.questions.is_empty() {
        help_spans.push(Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        help_spans.push(Span::from(" Start  "));
    }
    help_spans.push(Span::styled(
        "m",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    help_spans.push(Span::from(" Back to Menu"));

    let help = Paragraph::new(vec![Line::from(help_spans)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

use crate::ai::LearningStep;
use crate::models::TopicInput;
use crate::ui::layout::calculate_menu_chunks;
use crate::utils::{format_clock, input_cursor_column, truncate_string};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub struct MenuItem {
    pub title: String,
    pub question_count: usize,
    pub time_limit_secs: u32,
    pub best_score: Option<u32>,
}

pub fn draw_menu(
    f: &mut Frame,
    items: &[MenuItem],
    selected_index: usize,
    topic: &TopicInput,
    status: Option<&str>,
) {
    let layout = calculate_menu_chunks(f.area());

    let title = Paragraph::new("🧪 STEM Quiz Lab")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.title_area);

    if items.is_empty() {
        let empty = Paragraph::new(
            "No quizzes yet.\n\nDrop JSON quiz files into the quizzes/ directory,\nor type a topic below to generate one with AI.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Select a Quiz"));
        f.render_widget(empty, layout.list_area);
    } else {
        let list_items: Vec<ListItem> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let best = item
                    .best_score
                    .map(|s| format!("  best {}%", s))
                    .unwrap_or_default();
                let label = format!(
                    "{}  ({} questions, {}){}",
                    truncate_string(&item.title, 48),
                    item.question_count,
                    format_clock(item.time_limit_secs),
                    best
                );
                let style = if i == selected_index && !topic.active {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(label).style(style)
            })
            .collect();

        let list = List::new(list_items)
            .block(Block::default().borders(Borders::ALL).title("Select a Quiz"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_widget(list, layout.list_area);
    }

    let input_title = if topic.active {
        "AI Topic (Enter: quiz, Ctrl+p: learning path, Esc: cancel)"
    } else {
        "AI Topic (press i to type)"
    };
    let input_style = if topic.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(topic.buffer.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, layout.input_area);

    if topic.active {
        let x = layout.input_area.x + 1 + input_cursor_column(&topic.buffer, topic.cursor);
        let y = layout.input_area.y + 1;
        f.set_cursor_position((x, y));
    }

    if let Some(message) = status {
        let status_line = Paragraph::new(message).style(Style::default().fg(Color::Yellow));
        f.render_widget(status_line, layout.status_area);
    }

    let help_text = vec![Line::from(vec![
        Span::styled(
            "↑/↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Navigate  "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Select  "),
        Span::styled(
            "i",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" AI Topic  "),
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

pub fn draw_learning_path(f: &mut Frame, topic: &str, steps: &[LearningStep]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Learning Path - {}", topic))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut body = Text::default();
    for (i, step) in steps.iter().enumerate() {
        body.push_line(Line::from(Span::styled(
            format!("{}. {}", i + 1, step.title),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if !step.description.is_empty() {
            body.push_line(Line::from(format!("   {}", step.description)));
        }
        let mut meta = Vec::new();
        if !step.estimated_time.is_empty() {
            meta.push(format!("time: {}", step.estimated_time));
        }
        if !step.difficulty.is_empty() {
            meta.push(format!("difficulty: {}", step.difficulty));
        }
        if !step.prerequisites.is_empty() {
            meta.push(format!("prerequisites: {}", step.prerequisites.join(", ")));
        }
        if !meta.is_empty() {
            body.push_line(Line::from(Span::styled(
                format!("   {}", meta.join("  ·  ")),
                Style::default().fg(Color::DarkGray),
            )));
        }
        body.push_line(Line::from(""));
    }

    let content = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "m",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Back to Menu"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

use crate::attempt::AttemptSession;
use crate::monitor::FocusMonitor;
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::format_clock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw_quiz(
    f: &mut Frame,
    session: &AttemptSession,
    monitor: &FocusMonitor,
    selected_option: usize,
) {
    let layout = calculate_quiz_chunks(f.area());

    let header_text = format!(
        "Question {} / {} - {}   |   {}   |   warnings {}/{}",
        session.current_index() + 1,
        session.total_questions(),
        session.quiz().title,
        format_clock(session.remaining_secs()),
        monitor.violations(),
        monitor.max_violations()
    );
    let header_style = if session.remaining_secs() <= 30 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    let header = Paragraph::new(header_text)
        .style(header_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let Some(question) = session.current_question() else {
        return;
    };

    let question_widget = Paragraph::new(Text::from(question.prompt.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_widget, layout.question_area);

    let recorded = session.recorded_for_current();
    let option_items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let label = format!("{}) {}", (b'A' + i as u8) as char, option);
            let style = match recorded {
                Some(answer) => {
                    if question.correct == Some(i) {
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD)
                    } else if answer.selected_option == i {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default()
                    }
                }
                None => {
                    if i == selected_option {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    }
                }
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let options_title = if recorded.is_some() {
        "Options (Enter to continue)"
    } else {
        "Options (Enter to answer)"
    };
    let options = List::new(option_items)
        .block(Block::default().borders(Borders::ALL).title(options_title));
    f.render_widget(options, layout.options_area);

    let mut explanation = Text::default();
    match recorded {
        Some(answer) => {
            match answer.is_correct {
                Some(true) => explanation.push_line(Line::from(Span::styled(
                    "Correct!",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ))),
                Some(false) => explanation.push_line(Line::from(Span::styled(
                    "Incorrect.",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))),
                None => explanation.push_line(Line::from(Span::styled(
                    "Practice question - not scored.",
                    Style::default().fg(Color::Yellow),
                ))),
            }
            if let Some(text) = &question.explanation {
                explanation.push_line(Line::from(""));
                explanation.push_line(Line::from(text.as_str()));
            }
        }
        None => {
            explanation.push_line(Line::from("Pick an option with ↑/↓, then press Enter."));
            if !monitor.is_focused() {
                explanation.push_line(Line::from(""));
                explanation.push_line(Line::from(Span::styled(
                    "Terminal focus lost!",
                    Style::default().fg(Color::Red),
                )));
            }
        }
    }
    let explanation_widget = Paragraph::new(explanation)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Feedback"));
    f.render_widget(explanation_widget, layout.explanation_area);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "↑/↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Option  "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Answer / Next  "),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Quit Attempt"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let area = f.area();
    let width = 50.min(area.width);
    let height = 7.min(area.height);
    let popup = ratatui::layout::Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Quit attempt?")
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(block, popup);

    let message = Paragraph::new("The attempt will be submitted with the answers so far.")
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Quit  "),
        Span::styled(
            "n",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Keep Going"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(buttons, chunks[1]);
}

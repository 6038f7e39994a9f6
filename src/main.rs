use crossbeam_channel::unbounded;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rusqlite::Connection;
use std::io;
use std::time::{Duration, Instant};

use stem_quiz::ai::LearningStep;
use stem_quiz::ai_worker::spawn_ai_worker;
use stem_quiz::attempt::{AttemptSession, EndReason};
use stem_quiz::db::{self, attempt as attempt_db, quiz as quiz_db};
use stem_quiz::logger;
use stem_quiz::models::{AiJob, AiReply, AppState, QuizAttempt, QuizDefinition, TopicInput};
use stem_quiz::monitor::{self, FocusMonitor, Verdict, DEFAULT_MAX_VIOLATIONS};
use stem_quiz::quizfile::{get_quiz_files, load_quiz_file};
use stem_quiz::report::write_attempt_report;
use stem_quiz::ui::{
    draw_learning_path, draw_menu, draw_quit_confirmation, draw_quiz, draw_start, draw_summary,
    MenuItem,
};
use stem_quiz::utils::truncate_string;

fn load_menu(conn: &Connection, user_id: &str) -> (Vec<QuizDefinition>, Vec<MenuItem>) {
    let quizzes = quiz_db::list_quizzes(conn).unwrap_or_default();
    let items = quizzes
        .iter()
        .map(|quiz| MenuItem {
            title: quiz.title.clone(),
            question_count: quiz.questions.len(),
            time_limit_secs: quiz.time_limit_secs,
            best_score: attempt_db::best_score(conn, user_id, &quiz.id)
                .ok()
                .flatten(),
        })
        .collect();
    (quizzes, items)
}

/// Persist a finished attempt and write the markdown report. Returns the
/// prior attempts (for the summary screen) and an optional status notice;
/// storage failures are non-fatal and leave the session on screen.
fn complete_attempt(
    conn: &Connection,
    session: &AttemptSession,
    attempt: &QuizAttempt,
) -> (Vec<QuizAttempt>, Option<String>) {
    let history =
        attempt_db::list_attempts(conn, &attempt.user_id, &attempt.quiz_id).unwrap_or_default();

    let mut status = None;
    if let Err(e) = attempt_db::insert_attempt(conn, attempt) {
        logger::log(&format!("Failed to store attempt: {}", e));
        status = Some("Could not save this attempt. It is still shown below.".to_string());
    }

    let report_dir = db::get_report_dir();
    std::fs::create_dir_all(&report_dir).ok();
    if let Err(e) = write_attempt_report(&report_dir, session.quiz(), attempt) {
        logger::log(&format!("Failed to write attempt report: {}", e));
    }

    (history, status)
}

fn main() -> io::Result<()> {
    logger::init();

    let conn = db::init_db().map_err(|e| io::Error::other(format!("database error: {}", e)))?;

    // Refresh stored quizzes from any JSON files dropped into quizzes/.
    for path in get_quiz_files() {
        match load_quiz_file(&path) {
            Ok(quiz) => {
                quiz_db::save_quiz(&conn, &quiz).ok();
            }
            Err(e) => logger::log(&format!("Skipping quiz file {:?}: {}", path, e)),
        }
    }

    let user_id = std::env::var("USER").unwrap_or_else(|_| "local".to_string());

    let (job_tx, job_rx) = unbounded::<AiJob>();
    let (reply_tx, reply_rx) = unbounded::<AiReply>();
    let _worker = spawn_ai_worker(reply_tx, job_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    monitor::enable_focus_tracking(&mut io::stdout());
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::Menu;
    let (mut quizzes, mut menu_items) = load_menu(&conn, &user_id);
    let mut selected_index: usize = 0;
    let mut topic = TopicInput::default();
    let mut status: Option<String> = None;

    let mut session: Option<AttemptSession> = None;
    let mut focus_monitor = FocusMonitor::new(DEFAULT_MAX_VIOLATIONS);
    let mut selected_option: usize = 0;
    let mut last_result: Option<QuizAttempt> = None;
    let mut history: Vec<QuizAttempt> = Vec::new();
    let mut path_view: Option<(String, Vec<LearningStep>)> = None;

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| match app_state {
            AppState::Menu => draw_menu(f, &menu_items, selected_index, &topic, status.as_deref()),
            AppState::Start => {
                if let Some(s) = &session {
                    draw_start(f, s.quiz(), focus_monitor.max_violations());
                }
            }
            AppState::Quiz => {
                if let Some(s) = &session {
                    draw_quiz(f, s, &focus_monitor, selected_option);
                }
            }
            AppState::QuizQuitConfirm => {
                if let Some(s) = &session {
                    draw_quiz(f, s, &focus_monitor, selected_option);
                    draw_quit_confirmation(f);
                }
            }
            AppState::Summary => {
                if let (Some(s), Some(attempt)) = (&session, &last_result) {
                    draw_summary(f, s, attempt, &history);
                }
            }
            AppState::LearningPath => {
                if let Some((topic_name, steps)) = &path_view {
                    draw_learning_path(f, topic_name, steps);
                }
            }
        })?;

        while let Ok(reply) = reply_rx.try_recv() {
            match reply {
                AiReply::Quiz {
                    topic: quiz_topic,
                    quiz,
                } => {
                    if let Err(e) = quiz_db::save_quiz(&conn, &quiz) {
                        logger::log(&format!("Failed to store generated quiz: {}", e));
                    }
                    (quizzes, menu_items) = load_menu(&conn, &user_id);
                    selected_index = selected_index.min(quizzes.len().saturating_sub(1));
                    status = Some(format!("AI quiz ready: {}", quiz_topic));
                }
                AiReply::Path {
                    topic: path_topic,
                    steps,
                } => {
                    path_view = Some((path_topic, steps));
                    if app_state == AppState::Menu {
                        app_state = AppState::LearningPath;
                    } else {
                        status = Some("Learning path ready (open from menu).".to_string());
                    }
                }
                AiReply::Error {
                    topic: failed_topic,
                    error,
                } => {
                    logger::log(&format!("AI error for '{}': {}", failed_topic, error));
                    status = Some(truncate_string(
                        &format!("AI generation failed for '{}': {}", failed_topic, error),
                        120,
                    ));
                }
            }
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::FocusGained => focus_monitor.focus_gained(),
                Event::FocusLost => {
                    if focus_monitor.focus_lost() == Verdict::ForceFinish
                        && let Some(s) = session.as_mut()
                        && let Some(attempt) = s.finish(EndReason::FocusViolations)
                    {
                        focus_monitor.disarm();
                        let (h, notice) = complete_attempt(&conn, s, &attempt);
                        history = h;
                        status = notice;
                        last_result = Some(attempt);
                        app_state = AppState::Summary;
                    }
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => match app_state {
                    AppState::Menu => {
                        if topic.active {
                            match key.code {
                                KeyCode::Esc => topic.active = false,
                                KeyCode::Enter => {
                                    let trimmed = topic.buffer.trim().to_string();
                                    if !trimmed.is_empty() {
                                        job_tx
                                            .send(AiJob::GenerateQuiz {
                                                topic: trimmed.clone(),
                                            })
                                            .ok();
                                        status = Some(format!("Generating quiz: {}", trimmed));
                                        topic.clear();
                                        topic.active = false;
                                    }
                                }
                                KeyCode::Char('p')
                                    if key.modifiers.contains(KeyModifiers::CONTROL) =>
                                {
                                    let trimmed = topic.buffer.trim().to_string();
                                    if !trimmed.is_empty() {
                                        job_tx
                                            .send(AiJob::LearningPath {
                                                topic: trimmed.clone(),
                                            })
                                            .ok();
                                        status =
                                            Some(format!("Generating learning path: {}", trimmed));
                                        topic.clear();
                                        topic.active = false;
                                    }
                                }
                                KeyCode::Backspace => topic.backspace(),
                                KeyCode::Left => topic.left(),
                                KeyCode::Right => topic.right(),
                                KeyCode::Char(c) => topic.insert(c),
                                _ => {}
                            }
                        } else {
                            match key.code {
                                KeyCode::Up => {
                                    if selected_index > 0 {
                                        selected_index -= 1;
                                    }
                                }
                                KeyCode::Down => {
                                    if selected_index < quizzes.len().saturating_sub(1) {
                                        selected_index += 1;
                                    }
                                }
                                KeyCode::Enter => {
                                    if let Some(quiz) = quizzes.get(selected_index) {
                                        session = Some(AttemptSession::new(
                                            quiz.clone(),
                                            user_id.clone(),
                                        ));
                                        selected_option = 0;
                                        last_result = None;
                                        status = None;
                                        app_state = AppState::Start;
                                    }
                                }
                                KeyCode::Char('i') => topic.active = true,
                                KeyCode::Char('q') => break,
                                _ => {}
                            }
                        }
                    }
                    AppState::Start => match key.code {
                        KeyCode::Enter => {
                            if let Some(s) = session.as_mut() && s.start().is_ok() {
                                focus_monitor.reset();
                                focus_monitor.arm();
                                app_state = AppState::Quiz;
                            }
                        }
                        KeyCode::Char('m') | KeyCode::Esc => {
                            session = None;
                            app_state = AppState::Menu;
                        }
                        _ => {}
                    },
                    AppState::Quiz => {
                        if let Some(s) = session.as_mut() {
                            match key.code {
                                KeyCode::Esc => app_state = AppState::QuizQuitConfirm,
                                KeyCode::Up => {
                                    if !s.has_answered_current() && selected_option > 0 {
                                        selected_option -= 1;
                                    }
                                }
                                KeyCode::Down => {
                                    let options = s
                                        .current_question()
                                        .map(|q| q.options.len())
                                        .unwrap_or(0);
                                    if !s.has_answered_current()
                                        && selected_option < options.saturating_sub(1)
                                    {
                                        selected_option += 1;
                                    }
                                }
                                KeyCode::Enter => {
                                    if s.has_answered_current() {
                                        if let Some(attempt) = s.next() {
                                            focus_monitor.disarm();
                                            let (h, notice) = complete_attempt(&conn, s, &attempt);
                                            history = h;
                                            status = notice;
                                            last_result = Some(attempt);
                                            app_state = AppState::Summary;
                                        } else {
                                            selected_option = 0;
                                        }
                                    } else {
                                        s.answer(selected_option);
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    AppState::QuizQuitConfirm => match key.code {
                        KeyCode::Char('y') => {
                            if let Some(s) = session.as_mut()
                                && let Some(attempt) = s.finish(EndReason::Abandoned)
                            {
                                focus_monitor.disarm();
                                let (h, notice) = complete_attempt(&conn, s, &attempt);
                                history = h;
                                status = notice;
                                last_result = Some(attempt);
                                app_state = AppState::Summary;
                            }
                        }
                        KeyCode::Char('n') | KeyCode::Esc => app_state = AppState::Quiz,
                        _ => {}
                    },
                    AppState::Summary => match key.code {
                        KeyCode::Char('r') => {
                            if let Some(s) = session.as_mut() {
                                s.reset();
                                s.shuffle_questions(&mut rand::thread_rng());
                                focus_monitor.reset();
                                selected_option = 0;
                                last_result = None;
                                app_state = AppState::Start;
                            }
                        }
                        KeyCode::Char('m') => {
                            session = None;
                            (quizzes, menu_items) = load_menu(&conn, &user_id);
                            selected_index = selected_index.min(quizzes.len().saturating_sub(1));
                            app_state = AppState::Menu;
                        }
                        KeyCode::Char('q') => break,
                        _ => {}
                    },
                    AppState::LearningPath => match key.code {
                        KeyCode::Char('m') | KeyCode::Esc => app_state = AppState::Menu,
                        _ => {}
                    },
                },
                _ => {}
            }
        }

        if last_tick.elapsed() >= Duration::from_secs(1) {
            if matches!(app_state, AppState::Quiz | AppState::QuizQuitConfirm)
                && let Some(s) = session.as_mut()
                && let Some(attempt) = s.tick()
            {
                focus_monitor.disarm();
                let (h, notice) = complete_attempt(&conn, s, &attempt);
                history = h;
                status = notice;
                last_result = Some(attempt);
                app_state = AppState::Summary;
            }
            last_tick = Instant::now();
        }
    }

    disable_raw_mode()?;
    monitor::disable_focus_tracking(terminal.backend_mut());
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

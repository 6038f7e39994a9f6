use crate::ai::{
    learning_path_prompt, parse_learning_path, parse_quiz_questions, quiz_prompt,
    CompletionBackend, OpenRouterClient, TUTOR_CONTEXT,
};
use crate::logger;
use crate::models::{AiJob, AiReply, QuizDefinition};
use crate::quizfile::{DEFAULT_PASSING_SCORE, DEFAULT_TIME_LIMIT_SECS};
use crossbeam_channel::{Receiver, Sender};
use std::thread;

pub const GENERATED_QUESTION_COUNT: usize = 5;

fn topic_slug(topic: &str) -> String {
    let slug: String = topic
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() { "topic".to_string() } else { slug }
}

pub fn generated_quiz(topic: &str, questions: Vec<crate::models::Question>) -> QuizDefinition {
    QuizDefinition {
        id: format!("ai-{}", topic_slug(topic)),
        title: format!("AI quiz: {}", topic),
        description: format!("Generated multiple-choice quiz about {}", topic),
        questions,
        time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        passing_score: DEFAULT_PASSING_SCORE,
    }
}

/// Worker thread owning the network side of AI generation. Jobs arrive on a
/// channel, replies go back on another; a disconnected channel exits the
/// worker. The UI thread never blocks on a completion.
pub fn spawn_ai_worker(reply_tx: Sender<AiReply>, job_rx: Receiver<AiJob>) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("stem-quiz::ai_worker".to_string())
        .spawn(move || loop {
            match job_rx.recv() {
                Ok(job) => {
                    let topic = match &job {
                        AiJob::GenerateQuiz { topic } => topic.clone(),
                        AiJob::LearningPath { topic } => topic.clone(),
                    };
                    logger::log(&format!("Worker received job for topic '{}'", topic));

                    let client = match OpenRouterClient::new() {
                        Ok(client) => client,
                        Err(e) => {
                            let _ = reply_tx.send(AiReply::Error {
                                topic,
                                error: format!("Failed to create AI client: {}", e),
                            });
                            continue;
                        }
                    };

                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            let _ = reply_tx.send(AiReply::Error {
                                topic,
                                error: format!("Failed to start async runtime: {}", e),
                            });
                            continue;
                        }
                    };

                    let prompt = match &job {
                        AiJob::GenerateQuiz { topic } => {
                            quiz_prompt(topic, GENERATED_QUESTION_COUNT)
                        }
                        AiJob::LearningPath { topic } => learning_path_prompt(topic),
                    };

                    let result = rt.block_on(client.generate(&prompt, TUTOR_CONTEXT));

                    match result {
                        Ok(response) => {
                            logger::log(&format!(
                                "Worker got {} bytes for '{}'",
                                response.len(),
                                topic
                            ));
                            let reply = match job {
                                AiJob::GenerateQuiz { topic } => {
                                    let questions = parse_quiz_questions(&topic, &response);
                                    AiReply::Quiz {
                                        quiz: generated_quiz(&topic, questions),
                                        topic,
                                    }
                                }
                                AiJob::LearningPath { topic } => AiReply::Path {
                                    steps: parse_learning_path(&topic, &response),
                                    topic,
                                },
                            };
                            let _ = reply_tx.send(reply);
                        }
                        Err(e) => {
                            logger::log(&format!("Worker error for '{}': {}", topic, e));
                            let _ = reply_tx.send(AiReply::Error {
                                topic,
                                error: format!("AI generation failed: {}", e),
                            });
                        }
                    }
                }
                Err(_) => {
                    // Channel disconnected, exit worker
                    logger::log("Worker channel disconnected, exiting");
                    break;
                }
            }
        })
        .expect("Failed to spawn AI worker thread")
}

//! Interactive chat loop over a [`Session`].
//!
//! Input is blocked while a turn is running; progress events are rendered
//! incrementally as the agent works.

use crate::frameworks;
use crate::session::{MODELS, Session};
use agent::{AgentEvent, Error, Result, event_channel};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const TOOL_OUTPUT_PREVIEW_CHARS: usize = 200;

pub async fn run(session: &mut Session) -> Result<()> {
    let mut editor = DefaultEditor::new().map_err(readline_error)?;

    banner(session);
    println!("novelix> {}", session.transcript()[0].text);

    loop {
        session.await_input();
        let line = match editor.readline("\nyou> ") {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(readline_error(err)),
        };

        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&line);

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(session, command) {
                break;
            }
        } else {
            run_turn(session, &line).await;
        }
    }

    Ok(())
}

fn readline_error(err: ReadlineError) -> Error {
    Error::IOError(std::io::Error::other(err))
}

async fn run_turn(session: &mut Session, utterance: &str) {
    let (tx, mut rx) = event_channel();

    let result = {
        let run = session.submit(utterance, &tx);
        tokio::pin!(run);
        loop {
            tokio::select! {
                result = &mut run => break result,
                event = rx.recv() => {
                    if let Some(event) = event {
                        render_event(&event);
                    }
                }
            }
        }
    };

    while let Ok(event) = rx.try_recv() {
        render_event(&event);
    }

    if let Err(err) = result {
        tracing::error!(%err, "turn failed");
        // The session already recorded a user-facing failure turn.
        if let Some(turn) = session.transcript().last() {
            println!("novelix> {}", turn.text);
        }
    }
}

fn render_event(event: &AgentEvent) {
    match event {
        AgentEvent::ToolCallRequested { name, input } => {
            println!("  ... calling {name} with {input}");
        }
        AgentEvent::ToolResult { output } => {
            println!(
                "  ... got {}",
                truncate(output, TOOL_OUTPUT_PREVIEW_CHARS)
            );
        }
        AgentEvent::AnswerFragment(text) => {
            println!("novelix> {text}");
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

fn banner(session: &Session) {
    let config = session.config();
    println!("Novelix - research idea generation agent");
    println!(
        "model: {}  temperature: {}  framework: {}",
        config.model,
        config.temperature,
        framework_name(&config.framework)
    );
    println!("Type /help for commands.\n");
}

fn framework_name(framework: &str) -> &str {
    framework.split(" | ").next().unwrap_or(framework)
}

/// Returns false when the session should end.
fn handle_command(session: &mut Session, command: &str) -> bool {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => return false,
        "help" => print_help(),
        "frameworks" => print_frameworks(),
        "framework" => {
            if arg.is_empty() {
                println!("Current framework: {}", session.config().framework);
            } else {
                match frameworks::resolve(arg) {
                    Some(framework) => apply_change(session, |s| s.set_framework(&framework)),
                    None => println!(
                        "Unknown framework: {arg}. Use /frameworks to list the options."
                    ),
                }
            }
        }
        "model" => {
            if arg.is_empty() {
                println!("Current model: {}", session.config().model);
                println!("Available: {}", MODELS.join(", "));
            } else {
                apply_change(session, |s| s.set_model(arg));
            }
        }
        "temp" | "temperature" => match arg.parse::<f32>() {
            Ok(temperature) => apply_change(session, |s| s.set_temperature(temperature)),
            Err(_) => println!("Usage: /temp <0.0-1.0>"),
        },
        "history" => print_history(session),
        _ => println!("Unknown command: /{name}. Type /help for commands."),
    }

    true
}

fn apply_change(session: &mut Session, change: impl FnOnce(&mut Session) -> Result<()>) {
    let before = session.config().clone();
    match change(session) {
        Ok(()) => {
            if *session.config() != before {
                println!("Settings changed. Starting a fresh conversation.");
                println!("novelix> {}", session.transcript()[0].text);
            }
        }
        Err(err) => println!("{err}"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /framework <name|index|auto>  choose a research framework");
    println!("  /frameworks                   list available frameworks");
    println!("  /model <name>                 choose a model");
    println!("  /temp <0.0-1.0>               set the sampling temperature");
    println!("  /history                      show the conversation so far");
    println!("  /quit                         exit");
    println!();
    println!("Changing any setting discards the conversation and starts fresh.");
}

fn print_frameworks() {
    for (index, option) in frameworks::options().iter().enumerate() {
        println!("{index:2}. {option}");
    }
}

fn print_history(session: &Session) {
    for turn in session.transcript() {
        let speaker = match turn.role {
            crate::session::Role::User => "you",
            crate::session::Role::Assistant => "novelix",
        };
        println!("{speaker}> {}", turn.text);
    }
}

#[cfg(test)]
mod tests {
    use super::{framework_name, truncate};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 10), "0123456789...");
    }

    #[test]
    fn test_framework_name() {
        assert_eq!(
            framework_name("PICO | Patient, Intervention | Clinical medicine"),
            "PICO"
        );
        assert_eq!(
            framework_name("Auto selection (Let the agent decide)"),
            "Auto selection (Let the agent decide)"
        );
    }
}

//! `agentme chat`: the interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use agentme_core::chat::MessageRole;
use agentme_core::error::AgentMeError;
use agentme_interaction::ChatSession;
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::{DefaultHistory, History};
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

const COMMANDS: [&str; 4] = ["/quit", "/clear", "/prompt", "/help"];

/// rustyline helper completing and hinting the slash commands.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Clear,
    Prompt,
    Help,
    UnknownCommand(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => Input::Empty,
        "/quit" | "/exit" => Input::Quit,
        "/clear" => Input::Clear,
        "/prompt" => Input::Prompt,
        "/help" => Input::Help,
        cmd if cmd.starts_with('/') => Input::UnknownCommand(cmd),
        message => Input::Message(message),
    }
}

/// Turns a failed send into the notice shown above the next prompt.
fn describe_error(err: &AgentMeError) -> String {
    match err {
        AgentMeError::Cancelled => "Request cancelled.".to_string(),
        AgentMeError::RemoteService { status: 400 | 401 | 403, .. } => format!(
            "{err}\nCheck your API key with `agentme key show` or replace it with `agentme key set`."
        ),
        AgentMeError::RemoteService { status: 429, .. } => {
            format!("{err}\nThe API is rate limiting requests. Wait a moment and try again.")
        }
        AgentMeError::Transport(_) => {
            format!("{err}\nCheck your network connection and try again.")
        }
        other => other.to_string(),
    }
}

fn print_agent(content: &str) {
    for line in content.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

fn print_help() {
    println!("{}", "  /clear   start the conversation over".bright_black());
    println!("{}", "  /prompt  show the system prompt".bright_black());
    println!("{}", "  /quit    leave the chat".bright_black());
    println!(
        "{}",
        "  Ctrl-C while waiting cancels the request".bright_black()
    );
}

/// Sends one message, cancelling it if Ctrl-C arrives first.
async fn send_interruptible(session: &mut ChatSession, message: &str) {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    println!("{}", "…".bright_black());
    let result = session.send_with_cancel(message, &cancel).await;
    watcher.abort();

    match result {
        Ok(Some(reply)) => print_agent(&reply),
        Ok(None) => {}
        Err(AgentMeError::Cancelled) => {
            println!("{}", describe_error(&AgentMeError::Cancelled).yellow())
        }
        Err(err) => {
            tracing::debug!(error = %err, "Chat request failed");
            eprintln!("{}", describe_error(&err).red());
        }
    }
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut session = ChatSession::open(
        ctx.personas.as_ref(),
        ctx.credentials.as_ref(),
        &ctx.config.gemini,
    )
    .await?;

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!(
        "{}",
        format!("=== {} ===", session.persona().name).bright_magenta().bold()
    );
    println!(
        "{}",
        "Type a message, /help for commands, Ctrl-D to exit.".bright_black()
    );
    println!();
    print_transcript_tail(&session);

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err}").red());
                break;
            }
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Input::Clear => {
                session.clear();
                println!("{}", "Conversation cleared.".bright_black());
                print_transcript_tail(&session);
            }
            Input::Prompt => println!("{}", session.system_prompt().bright_black()),
            Input::Help => print_help(),
            Input::UnknownCommand(cmd) => {
                println!("{}", format!("Unknown command {cmd}. Try /help.").yellow())
            }
            Input::Message(message) => {
                remember(rl.history_mut(), message);
                send_interruptible(&mut session, message).await;
            }
        }
    }

    Ok(())
}

/// Adds a sent message to the in-session history. Failures only cost recall.
fn remember<H: History>(history: &mut H, line: &str) {
    if let Err(e) = history.add(line) {
        tracing::debug!("Failed to record history entry: {}", e);
    }
}

fn print_transcript_tail(session: &ChatSession) {
    if let Some(last) = session.transcript().last() {
        if last.role == MessageRole::Agent {
            print_agent(&last.content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input(" /exit "), Input::Quit);
        assert_eq!(parse_input("/clear"), Input::Clear);
        assert_eq!(parse_input("/prompt"), Input::Prompt);
        assert_eq!(parse_input("/help"), Input::Help);
        assert_eq!(parse_input("/dance"), Input::UnknownCommand("/dance"));
        assert_eq!(parse_input("  안녕하세요 "), Input::Message("안녕하세요"));
    }

    #[test]
    fn test_remember_records_sent_messages() {
        let mut history = DefaultHistory::new();

        remember(&mut history, "첫 번째 질문");
        remember(&mut history, "두 번째 질문");

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_describe_error_adds_hints() {
        let auth = describe_error(&AgentMeError::remote(403, None));
        assert!(auth.contains("HTTP 403"));
        assert!(auth.contains("agentme key"));

        let limited = describe_error(&AgentMeError::remote(429, None));
        assert!(limited.contains("rate limiting"));

        assert_eq!(describe_error(&AgentMeError::Cancelled), "Request cancelled.");
        assert_eq!(
            describe_error(&AgentMeError::malformed("no text")),
            "Malformed response: no text"
        );
    }
}

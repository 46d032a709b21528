use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use stall_application::{DialogueManager, build_manager};
use stall_core::config::StallConfig;

const SLASH_COMMANDS: [&str; 3] = ["/summary", "/new", "/quit"];

/// Completes and highlights the REPL's slash commands.
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
        let candidates = SLASH_COMMANDS
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
        SLASH_COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

async fn print_summary(manager: &DialogueManager, session_id: &str) -> Result<()> {
    match manager.order_summary(session_id).await {
        Some(summary) => {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize the order summary")?;
            println!("{}", json.bright_black());
        }
        None => println!("{}", "(no order yet)".bright_black()),
    }
    Ok(())
}

/// Runs the interactive order-taking REPL until `/quit` or EOF.
pub async fn run(config: &StallConfig, session: Option<String>) -> Result<()> {
    let manager = build_manager(config)
        .await
        .context("Failed to start the dialogue manager")?;
    let mut session_id = super::session_id(session);

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== 早餐店點餐 ===".bright_magenta().bold());
    println!(
        "{}",
        "Type your order, '/summary' to see the cart, '/new' to start over, '/quit' to exit."
            .bright_black()
    );
    tracing::debug!("[Chat] Session {}", session_id);

    loop {
        match rl.readline("點餐> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    "/quit" | "quit" | "exit" => {
                        println!("{}", "謝謝光臨！".bright_green());
                        break;
                    }
                    "/summary" => print_summary(&manager, &session_id).await?,
                    "/new" => {
                        session_id = super::session_id(None);
                        println!("{}", "已開始新的點餐。".bright_green());
                    }
                    utterance => {
                        let reply = manager.handle(&session_id, utterance).await;
                        for line in reply.lines() {
                            println!("{}", line.bright_blue());
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "謝謝光臨！".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive terminal chat.

use colored::Colorize;
use memchat_agent::ChatService;
use memchat_config::MemchatConfig;
use memchat_core::{ChatMessage, MemchatError, ThreadId};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::services::build_chat_service;

/// What the REPL should do with one input line.
#[derive(Debug, PartialEq, Eq)]
enum ShellInput<'a> {
    Quit,
    Empty,
    Message(&'a str),
}

fn parse_input(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => ShellInput::Empty,
        "exit" | "quit" | "/exit" | "/quit" => ShellInput::Quit,
        _ => ShellInput::Message(trimmed),
    }
}

/// One terminal conversation: a thread plus its short history window.
struct ShellSession<'a> {
    chat: &'a ChatService,
    thread: ThreadId,
    history: Vec<ChatMessage>,
}

impl<'a> ShellSession<'a> {
    async fn open(chat: &'a ChatService, requested: Option<ThreadId>) -> Result<Self, MemchatError> {
        let thread = chat.open_thread(requested).await?;
        Ok(Self {
            chat,
            thread,
            history: Vec::new(),
        })
    }

    /// Sends one message. History is only advanced on success.
    async fn send(&mut self, text: &str) -> Result<String, MemchatError> {
        let reply = self.chat.respond(&self.thread, &self.history, text).await?;
        self.history = reply.history;
        Ok(reply.reply)
    }
}

/// Banner title; `agent.name` also labels the assistant's replies.
fn banner(agent_name: &str) -> String {
    format!("{agent_name} shell")
}

/// Runs the REPL until the user quits or closes stdin.
pub async fn run_shell(
    config: &MemchatConfig,
    requested: Option<ThreadId>,
) -> Result<(), MemchatError> {
    let chat = build_chat_service(config).await?;
    let mut session = ShellSession::open(&chat, requested).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| MemchatError::Internal(format!("failed to initialize line editor: {e}")))?;

    let agent_name = config.agent.name.as_str();
    println!("{}", banner(agent_name).bold().green());
    println!("Thread: {}", session.thread.as_str().cyan());
    println!("Type {} to exit.\n", "exit".yellow());

    loop {
        match rl.readline(&format!("{}> ", "you".green())) {
            Ok(line) => {
                let text = match parse_input(&line) {
                    ShellInput::Quit => break,
                    ShellInput::Empty => continue,
                    ShellInput::Message(text) => text,
                };
                let _ = rl.add_history_entry(text);

                match session.send(text).await {
                    Ok(reply) => println!("\n{}: {reply}\n", agent_name.bold()),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

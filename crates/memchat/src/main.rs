// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memchat - a chat assistant with hosted long-term memory.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod export;
mod serve;
mod services;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use memchat_config::MemchatConfig;
use memchat_core::{MemchatError, ThreadId};

/// Memchat - chat with long-term memory and browse the knowledge graph.
#[derive(Parser, Debug)]
#[command(name = "memchat", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this TOML file instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web chat and knowledge-graph UI.
    Serve {
        /// Host address to bind.
        #[arg(long)]
        host: Option<String>,
        /// Port to bind.
        #[arg(long)]
        port: Option<u16>,
        /// Thread used when the browser has none yet.
        #[arg(long, value_name = "ID")]
        thread: Option<String>,
    },
    /// Chat in the terminal.
    Shell {
        /// Thread to resume; a new one is created when unset or unknown.
        #[arg(long, value_name = "ID")]
        thread: Option<String>,
    },
    /// Write the user's knowledge graph as Cytoscape JSON.
    ExportGraph {
        /// Output file.
        #[arg(short, long, default_value = "graph.json")]
        out: PathBuf,
        /// Records requested per half of the graph.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the effective configuration with secrets masked.
    Config,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => memchat_config::load_and_validate_path(path),
        None => memchat_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            memchat_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve { host, port, thread }) => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            init_tracing(&config.agent.log_level);
            serve::run_serve(&config, requested_thread(thread, &config)).await
        }
        Some(Commands::Shell { thread }) => {
            init_tracing(&config.agent.log_level);
            shell::run_shell(&config, requested_thread(thread, &config)).await
        }
        Some(Commands::ExportGraph { out, limit }) => {
            init_tracing(&config.agent.log_level);
            export::run_export(&config, &out, limit).await
        }
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("memchat: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// `--thread` wins over `zep.thread_id` (`ZEP_THREAD_ID`/`ZEP_SESSION_ID`).
fn requested_thread(flag: Option<String>, config: &MemchatConfig) -> Option<ThreadId> {
    flag.or_else(|| config.zep.thread_id.clone())
        .filter(|id| !id.trim().is_empty())
        .map(ThreadId::from)
}

fn print_config(config: &MemchatConfig) -> Result<(), MemchatError> {
    let mut shown = config.clone();
    for key in [&mut shown.openai.api_key, &mut shown.zep.api_key] {
        if key.is_some() {
            *key = Some("********".to_string());
        }
    }
    let rendered = toml::to_string_pretty(&shown)
        .map_err(|e| MemchatError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memchat={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn thread_flag_wins_over_config() {
        let mut config = MemchatConfig::default();
        config.zep.thread_id = Some("from-config".into());
        assert_eq!(
            requested_thread(Some("from-flag".into()), &config),
            Some(ThreadId::from("from-flag"))
        );
        assert_eq!(
            requested_thread(None, &config),
            Some(ThreadId::from("from-config"))
        );
        assert_eq!(requested_thread(Some(" ".into()), &MemchatConfig::default()), None);
    }

    #[test]
    fn cli_parses_export_defaults() {
        let cli = Cli::parse_from(["memchat", "export-graph"]);
        match cli.command {
            Some(Commands::ExportGraph { out, limit }) => {
                assert_eq!(out, PathBuf::from("graph.json"));
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_accepts_global_config_flag() {
        let cli = Cli::parse_from(["memchat", "shell", "--thread", "t1", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Some(Commands::Shell { thread: Some(ref t) }) if t == "t1"));
    }
}

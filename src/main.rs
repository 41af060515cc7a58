//! Terminal host for the chat widget.
//!
//! `chat` (the default) runs the interactive conversation; `ask`, `upload`
//! and `actions` are one-shot helpers against the same backend.

mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use chat::{ChatConfig, ChatSession, HttpBackend, SubmitRejected};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const QUIT_COMMAND: &str = "/quit";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] chat::ConfigError),
    #[error("backend call failed: {0}")]
    Api(#[from] chat::ApiError),
    #[error("nothing to ask: {0}")]
    Submit(#[from] SubmitRejected),
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("upload path has no file name: {0}")]
    NoFileName(PathBuf),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chat-wrapper", about = "Terminal chat client for the document Q&A backend")]
struct Cli {
    /// Backend base URL; overrides `CHAT_BASE_URL` from the environment config.
    #[arg(long, env = "CHAT_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive conversation over stdin (default).
    Chat,
    /// Ask a single question and print the answer.
    Ask { question: String },
    /// Upload a document for the backend to index.
    Upload { path: PathBuf },
    /// List the actions the backend may suggest.
    Actions,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = ChatConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    tracing::debug!(base_url = %config.base_url, "configured backend");

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&config).await,
        Command::Ask { question } => run_ask(&config, &question).await,
        Command::Upload { path } => run_upload(&config, path).await,
        Command::Actions => {
            render::render_catalog(&mut io::stdout().lock())?;
            Ok(())
        }
    }
}

async fn run_chat(config: &ChatConfig) -> Result<(), CliError> {
    let backend = HttpBackend::new(config)?;
    let (mut session, events) = ChatSession::with_events(backend);
    let renderer = tokio::spawn(render::render_loop(events));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }
        session.set_pending_input(line);
        if let Err(e) = session.submit_pending().await {
            tracing::debug!(error = %e, "input ignored");
        }
    }

    drop(session);
    match renderer.await {
        Ok(result) => result?,
        Err(e) => tracing::warn!(error = %e, "render task ended abnormally"),
    }
    Ok(())
}

async fn run_ask(config: &ChatConfig, question: &str) -> Result<(), CliError> {
    let mut session = ChatSession::new(HttpBackend::new(config)?);
    session.submit(question).await?;

    let state = session.state();
    let mut out = io::stdout().lock();
    if let Some(answer) = state.last_message() {
        writeln!(out, "{}", answer.text)?;
    }
    if let Some(details) = state.active_action() {
        writeln!(out, "{}", render::format_action(details))?;
    }
    Ok(())
}

async fn run_upload(config: &ChatConfig, path: PathBuf) -> Result<(), CliError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::NoFileName(path.clone()))?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| CliError::ReadFile { path: path.clone(), source })?;

    let session = ChatSession::new(HttpBackend::new(config)?);
    let response = session.upload_document(&file_name, bytes).await?;
    println!("{}", response.message);
    Ok(())
}

//! Plain-text rendering of conversation view events.
//!
//! SYSTEM CONTEXT
//! ==============
//! The terminal is the presentation layer for `chat::ViewEvent`s. "Scroll to
//! latest" maps to flushing stdout; the busy flag maps to a one-line
//! indicator; a surfaced action is printed under the answer that carried it.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::{self, Write};

use chat::{ActionDetails, ActionKind, Message, ViewEvent};
use tokio::sync::mpsc;

const THINKING: &str = "bot is thinking...";

pub fn format_message(message: &Message) -> String {
    format!("{}> {}", message.sender.label(), message.text)
}

pub fn format_action(details: &ActionDetails) -> String {
    format!("action: {} ({} {})", details.description, details.method, details.endpoint)
}

/// Write one event. Events with no visible effect write nothing.
pub fn render_event(out: &mut impl Write, event: &ViewEvent) -> io::Result<()> {
    match event {
        ViewEvent::MessageAppended(message) => writeln!(out, "{}", format_message(message)),
        ViewEvent::ScrollToLatest => out.flush(),
        ViewEvent::BusyChanged(true) => writeln!(out, "{THINKING}"),
        ViewEvent::ActionSurfaced(details) => writeln!(out, "{}", format_action(details)),
        ViewEvent::BusyChanged(false) | ViewEvent::ActionCleared => Ok(()),
    }
}

/// List every catalog action with its wire key.
pub fn render_catalog(out: &mut impl Write) -> io::Result<()> {
    for kind in ActionKind::ALL {
        let details = kind.details();
        writeln!(out, "{:<16} {}", details.key, format_action(&details))?;
    }
    Ok(())
}

/// Drain events to stdout until every sender is dropped.
pub async fn render_loop(mut events: mpsc::UnboundedReceiver<ViewEvent>) -> io::Result<()> {
    while let Some(event) = events.recv().await {
        render_event(&mut io::stdout().lock(), &event)?;
    }
    Ok(())
}

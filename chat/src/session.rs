//! Async driver pairing one conversation with one backend.
//!
//! `submit` holds `&mut self` across the single await, so a session can never
//! have two queries outstanding. View events are flushed to the subscriber
//! before the await (user message + busy) and after it (answer + idle), which
//! lets a host show the user's line and a busy indicator while it waits.
//!
//! If the `submit` future is dropped mid-await (a caller's `timeout` or
//! `select!`), the in-flight query is resolved as cancelled: the fallback
//! answer lands in the log and the conversation is idle again.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

use crate::api::{ApiError, ChatBackend, QueryResponse, UploadResponse};
use crate::conversation::{ConversationState, Query, SubmitRejected};
use crate::event::ViewEvent;

pub struct ChatSession<B> {
    state: ConversationState,
    backend: B,
    subscriber: Option<mpsc::UnboundedSender<ViewEvent>>,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Session without a subscriber.
    ///
    /// Events queue inside the conversation until [`Self::drain_events`] is
    /// called; a host that never drains should not use this constructor for a
    /// long-lived session.
    pub fn new(backend: B) -> Self {
        Self { state: ConversationState::new(), backend, subscriber: None }
    }

    /// Session that pushes every view event to the returned receiver,
    /// starting with the seed greeting.
    ///
    /// Once the receiver is dropped, events queue as with [`Self::new`].
    pub fn with_events(backend: B) -> (Self, mpsc::UnboundedReceiver<ViewEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut session = Self { state: ConversationState::new(), backend, subscriber: Some(tx) };
        session.flush();
        (session, rx)
    }

    #[must_use]
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        self.state.drain_events()
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.state.set_pending_input(text);
    }

    /// Run one full exchange for `text`.
    ///
    /// Backend failures are not errors here: they land in the log as the
    /// fallback answer.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected`] when the text is blank.
    pub async fn submit(&mut self, text: &str) -> Result<(), SubmitRejected> {
        let query = self.state.submit(text)?;
        self.run_exchange(query).await;
        Ok(())
    }

    /// Run one exchange for the current pending input.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected`] when the pending input is blank.
    pub async fn submit_pending(&mut self) -> Result<(), SubmitRejected> {
        let query = self.state.submit_pending()?;
        self.run_exchange(query).await;
        Ok(())
    }

    /// Forward a document to the backend's upload endpoint. The conversation
    /// log is not touched.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`ApiError`] unchanged.
    pub async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError> {
        self.backend.upload_document(file_name, bytes).await
    }

    async fn run_exchange(&mut self, query: Query) {
        self.flush();
        let question = query.question().to_owned();
        let exchange = Exchange { state: &mut self.state, query: Some(query) };
        let outcome = self.backend.ask(&question).await;
        exchange.finish(outcome);
        self.flush();
    }

    fn flush(&mut self) {
        let Some(tx) = &self.subscriber else {
            return;
        };
        while let Some(event) = self.state.pop_event() {
            if let Err(SendError(event)) = tx.send(event) {
                tracing::debug!("view subscriber dropped; queueing events from now on");
                self.state.requeue_event(event);
                self.subscriber = None;
                return;
            }
        }
    }
}

/// Owns the in-flight query across the backend await. Dropping it without
/// `finish` applies a cancellation so the conversation never stays busy.
struct Exchange<'a> {
    state: &'a mut ConversationState,
    query: Option<Query>,
}

impl Exchange<'_> {
    fn finish(mut self, outcome: Result<QueryResponse, ApiError>) {
        if let Some(query) = self.query.take() {
            self.state.apply(query, outcome);
        }
    }
}

impl Drop for Exchange<'_> {
    fn drop(&mut self) {
        if let Some(query) = self.query.take() {
            self.state.apply(query, Err(ApiError::Cancelled));
        }
    }
}

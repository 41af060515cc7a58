//! Conversation state machine: message log, busy flag, surfaced action.
//!
//! DESIGN
//! ======
//! `Idle -> AwaitingResponse -> Idle`, re-entrant. [`ConversationState::submit`]
//! appends the user message and returns a [`Query`] token; the caller sends
//! the question and hands the token back to [`ConversationState::apply`] with
//! the outcome. Only the token for the in-flight query is accepted, and a
//! second submit while one is in flight is rejected, so at most one query is
//! ever outstanding and message order always matches exchange order.
//!
//! All mutation goes through the private `append`/`set_in_flight`/`set_action`
//! helpers, which queue a [`ViewEvent`] for every observable change.

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use std::collections::VecDeque;

use crate::action::{self, ActionDetails};
use crate::api::{ApiError, QueryResponse};
use crate::event::ViewEvent;
use crate::message::{Message, Sender};

/// Bot reply appended when a query fails for any reason.
pub const FALLBACK_ANSWER: &str = "Sorry, I am not able to process your request at the moment. Please try again later.";

const SEED_USER_GREETING: &str = "Hello! ";
const SEED_BOT_GREETING: &str = "Hello! How can I help you?";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Why a submit did not start a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("input is blank")]
    Blank,
    #[error("a query is already in flight")]
    Busy,
}

/// Token for the single outbound query. Must be returned to
/// [`ConversationState::apply`] together with the backend outcome.
#[derive(Debug, PartialEq, Eq)]
pub struct Query {
    seq: u64,
    question: String,
}

impl Query {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }
}

#[derive(Debug)]
pub struct ConversationState {
    messages: Vec<Message>,
    pending_input: String,
    in_flight: Option<u64>,
    next_seq: u64,
    active_action: Option<ActionDetails>,
    events: VecDeque<ViewEvent>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Fresh conversation holding the canned greeting pair.
    ///
    /// The greeting goes through the normal append path, so its events are
    /// queued and the host can render the whole log from `drain_events`.
    #[must_use]
    pub fn new() -> Self {
        let mut state = Self {
            messages: Vec::new(),
            pending_input: String::new(),
            in_flight: None,
            next_seq: 0,
            active_action: None,
            events: VecDeque::new(),
        };
        state.append(Sender::User, SEED_USER_GREETING.to_owned());
        state.append(Sender::Bot, SEED_BOT_GREETING.to_owned());
        state
    }

    // =========================================================================
    // READ
    // =========================================================================

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.in_flight.is_some() { Status::AwaitingResponse } else { Status::Idle }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status() == Status::AwaitingResponse
    }

    #[must_use]
    pub fn active_action(&self) -> Option<&ActionDetails> {
        self.active_action.as_ref()
    }

    /// Take every queued view notification, oldest first.
    ///
    /// The queue is unbounded; it only shrinks when drained.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn pop_event(&mut self) -> Option<ViewEvent> {
        self.events.pop_front()
    }

    /// Put back an event that could not be delivered, ahead of newer ones.
    pub(crate) fn requeue_event(&mut self, event: ViewEvent) {
        self.events.push_front(event);
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Submit whatever is currently in the input box.
    ///
    /// # Errors
    ///
    /// Same as [`ConversationState::submit`]. On rejection the draft is kept.
    pub fn submit_pending(&mut self) -> Result<Query, SubmitRejected> {
        let text = self.pending_input.clone();
        self.submit(&text)
    }

    /// Start an exchange: log the user's message and go busy.
    ///
    /// # Errors
    ///
    /// [`SubmitRejected::Blank`] for empty or whitespace-only text and
    /// [`SubmitRejected::Busy`] while a query is in flight. Neither touches
    /// the log.
    pub fn submit(&mut self, text: &str) -> Result<Query, SubmitRejected> {
        let question = text.trim();
        if question.is_empty() {
            return Err(SubmitRejected::Blank);
        }
        if self.is_busy() {
            tracing::debug!("submit rejected: query already in flight");
            return Err(SubmitRejected::Busy);
        }

        self.append(Sender::User, question.to_owned());
        self.pending_input.clear();

        let seq = self.next_seq;
        self.next_seq += 1;
        self.set_in_flight(Some(seq));
        self.set_action(None);

        tracing::debug!(seq, "query issued");
        Ok(Query { seq, question: question.to_owned() })
    }

    /// Finish an exchange with the backend outcome and return to idle.
    ///
    /// A failure of any kind becomes [`FALLBACK_ANSWER`]. An action key in a
    /// successful answer is resolved against the catalog; misses are dropped.
    /// A token that does not belong to the in-flight query is ignored.
    pub fn apply(&mut self, query: Query, outcome: Result<QueryResponse, ApiError>) {
        if self.in_flight != Some(query.seq) {
            tracing::warn!(seq = query.seq, in_flight = ?self.in_flight, "ignoring stale query outcome");
            return;
        }

        match outcome {
            Ok(response) => {
                tracing::debug!(seq = query.seq, has_action = response.action.is_some(), "query answered");
                self.append(Sender::Bot, response.answer);
                if let Some(details) = response.action.and_then(|a| action::resolve(&a.action_key)) {
                    self.set_action(Some(details));
                }
            }
            Err(e) => {
                tracing::warn!(seq = query.seq, error = %e, "query failed");
                self.append(Sender::Bot, FALLBACK_ANSWER.to_owned());
            }
        }

        self.set_in_flight(None);
    }

    // =========================================================================
    // MUTATION HELPERS
    // =========================================================================

    fn append(&mut self, sender: Sender, text: String) {
        let message = Message { id: self.messages.len(), sender, text };
        self.messages.push(message.clone());
        self.events.push_back(ViewEvent::MessageAppended(message));
        self.events.push_back(ViewEvent::ScrollToLatest);
    }

    fn set_in_flight(&mut self, seq: Option<u64>) {
        let was_busy = self.in_flight.is_some();
        self.in_flight = seq;
        if was_busy != seq.is_some() {
            self.events.push_back(ViewEvent::BusyChanged(seq.is_some()));
        }
    }

    fn set_action(&mut self, details: Option<ActionDetails>) {
        match details {
            Some(details) => {
                self.active_action = Some(details.clone());
                self.events.push_back(ViewEvent::ActionSurfaced(details));
            }
            None => {
                if self.active_action.take().is_some() {
                    self.events.push_back(ViewEvent::ActionCleared);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

/// Who authored a message in the conversation log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Short prompt label used by text renderers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Bot => "bot",
        }
    }
}

/// A single entry in the conversation log.
///
/// `id` is the log length at the moment of append, so ids are dense and
/// ordered the same way the messages are displayed. Messages are never
/// edited after they land in the log.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub id: usize,
    pub sender: Sender,
    pub text: String,
}

use crate::action::ActionDetails;
use crate::message::Message;

/// Notifications for the presentation layer, emitted after each state change.
///
/// The conversation never touches a view directly; hosts drain these and
/// redraw however they like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    MessageAppended(Message),
    /// Always follows `MessageAppended`: the newest message should be visible.
    ScrollToLatest,
    BusyChanged(bool),
    ActionSurfaced(ActionDetails),
    ActionCleared,
}

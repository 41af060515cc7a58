//! Static catalog of model actions the backend can suggest.
//!
//! DESIGN
//! ======
//! The backend names an action by key (`"deploy_model"` etc.). Keys are parsed
//! into the closed [`ActionKind`] enum and every kind maps to fixed metadata
//! through an exhaustive match, so an unknown key can only ever surface as a
//! parse miss, never as a half-populated lookup.
//!
//! The resolver never calls the described endpoint; it only exposes where and
//! how a caller would trigger it.

#[cfg(test)]
#[path = "action_test.rs"]
mod action_test;

use std::fmt;
use std::str::FromStr;

use reqwest::Method;

/// A model operation the chat backend may suggest alongside an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    GenerateModel,
    DuplicateModel,
    DeleteModel,
    DeployModel,
}

impl ActionKind {
    /// Every catalog entry, in display order.
    pub const ALL: [Self; 4] = [Self::GenerateModel, Self::DuplicateModel, Self::DeleteModel, Self::DeployModel];

    /// Wire key as sent by the backend in `action.action_key`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::GenerateModel => "generate_model",
            Self::DuplicateModel => "duplicate_model",
            Self::DeleteModel => "delete_model",
            Self::DeployModel => "deploy_model",
        }
    }

    /// Fixed metadata for this action.
    #[must_use]
    pub fn details(self) -> ActionDetails {
        let (description, endpoint) = match self {
            Self::GenerateModel => ("Generate a model", "http://your-internal-api.com/generate-model"),
            Self::DuplicateModel => ("Duplicate a model", "http://your-internal-api.com/restart-service"),
            Self::DeleteModel => ("Delete a model", "http://your-internal-api.com/restart-service"),
            Self::DeployModel => ("Deploy a model", "http://your-internal-api.com/deploy"),
        };
        ActionDetails { kind: self, key: self.key(), description, endpoint, method: Method::POST }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raised when a backend-supplied key is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action key: {0}")]
pub struct UnknownActionKey(pub String);

impl FromStr for ActionKind {
    type Err = UnknownActionKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| UnknownActionKey(s.to_owned()))
    }
}

/// Display/trigger metadata for a catalog action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionDetails {
    pub kind: ActionKind,
    pub key: &'static str,
    pub description: &'static str,
    pub endpoint: &'static str,
    pub method: Method,
}

/// Look up catalog metadata for a backend action key.
///
/// Unknown keys are logged and yield `None`; they never interrupt the
/// conversation.
#[must_use]
pub fn resolve(action_key: &str) -> Option<ActionDetails> {
    match action_key.parse::<ActionKind>() {
        Ok(kind) => Some(kind.details()),
        Err(e) => {
            tracing::warn!(error = %e, "dropping action suggestion");
            None
        }
    }
}

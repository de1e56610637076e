use serde::{Deserialize, Serialize};

/// Result of a single upstream slot (one audit category or one content
/// format). A failed slot keeps its message instead of aborting the batch.
///
/// Serialises untagged, so a failure reaches prompts as `{"error": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOutcome<T> {
    Failed { error: String },
    Ready(T),
}

impl<T> FetchOutcome<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        FetchOutcome::Failed {
            error: message.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchOutcome::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchOutcome::Ready(value) => Some(value),
            FetchOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchOutcome::Ready(_) => None,
            FetchOutcome::Failed { error } => Some(error),
        }
    }
}

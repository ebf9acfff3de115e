pub mod context;
pub mod documents;
pub mod jobs;
pub mod profile;
pub mod registry;
pub mod upload;

use serde::Serialize;
use thiserror::Error;

pub use context::ActionContext;
pub use registry::ActionRegistry;

/// What an action hands back to the agent. `error` is set instead of failing
/// when the agent is expected to recover on its own (e.g. retry another index).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub extracted_content: Option<String>,
    pub error: Option<String>,
    pub include_in_memory: bool,
}

impl ActionResult {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            extracted_content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn memory(content: impl Into<String>) -> Self {
        Self {
            extracted_content: Some(content.into()),
            include_in_memory: true,
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid parameters for '{action}': {source}")]
    InvalidParams {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

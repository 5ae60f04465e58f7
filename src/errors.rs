use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Failed to fetch content source: {0}")]
    Fetch(String),

    #[error("Failed to analyze content: {0}")]
    Analysis(String),

    #[error("Failed to deliver chunk {index}/{total} ({delivered} already delivered): {reason}")]
    Dispatch {
        index: usize,
        total: usize,
        delivered: usize,
        reason: String,
    },

    #[error("Probe request failed: {0}")]
    Probe(String),

    #[error("Failed to access digest store: {0}")]
    Store(String),
}

/// Error from a single channel send, before the dispatcher attaches the
/// failing chunk's position.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SendError(pub String);

impl From<reqwest::Error> for SendError {
    fn from(error: reqwest::Error) -> Self {
        SendError(error.to_string())
    }
}

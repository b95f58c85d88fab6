use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObsError {
    #[error(transparent)]
    Note(#[from] crate::domain::NoteError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
}

pub type ObsResult<T> = Result<T, ObsError>;

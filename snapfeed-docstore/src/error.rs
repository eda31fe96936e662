use thiserror::Error;

pub type DocResult<T> = Result<T, DocError>;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Document already exists: {id}")]
    Conflict { id: String },

    #[error("Document store error: {source}")]
    Backend {
        #[from]
        source: mongodb::error::Error,
    },
}

impl DocError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn conflict<S: Into<String>>(id: S) -> Self {
        Self::Conflict { id: id.into() }
    }
}

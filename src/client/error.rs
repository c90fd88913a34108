use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("firstName and email are required")]
    IncompleteForm,

    #[error("Invalid contact: {0}")]
    Validation(String),
    #[error("Contact not found")]
    NotFound,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

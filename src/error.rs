use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SlothError {
    #[error("Cannot initialize Sloth, no element given.")]
    MissingElement,
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("widget already settled as {0:?}")]
    AlreadySettled(crate::widget::LoadState),
    #[error("dom operation failed: {0}")]
    Dom(String),
}

impl From<serde_qs::Error> for SlothError {
    fn from(err: serde_qs::Error) -> Self {
        SlothError::InvalidSettings(err.to_string())
    }
}

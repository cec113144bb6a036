use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("shared store is not available")]
    Unavailable,
    #[error("store io: {0}")]
    Io(Arc<str>),
    #[error("encode store: {0}")]
    Encode(Arc<str>),
    #[error("decode store: {0}")]
    Decode(Arc<str>),
    #[error("key {key} does not hold {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl StoreError {
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err.to_string().into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

use crate::notify::NotifyError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum EngineError {
    /// Caller error: missing field, bad interval, unknown room.
    InvalidArgument(&'static str),
    /// Business-rule violation on an existing booking.
    InvalidState(&'static str),
    Store(StoreError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            EngineError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Store(e)
    }
}

/// Outcome of a best-effort side effect. Never converted into an [`EngineError`].
pub(crate) type SideEffect = Result<(), NotifyError>;

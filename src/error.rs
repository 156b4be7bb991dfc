pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("user collection is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read friends of {user_id}: {reason}")]
    FriendsUnavailable { user_id: String, reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("caller is not authenticated")]
    Unauthenticated,
    #[error("graph backend unavailable: {0}")]
    BackendUnavailable(#[from] StoreError),
    #[error("malformed graph response: {0}")]
    MalformedResponse(String),
}

impl GraphError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

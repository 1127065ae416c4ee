use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("redeploy action failed: {message}")]
pub struct ActionError {
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification publish failed: {message}")]
pub struct NotificationError {
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifierError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

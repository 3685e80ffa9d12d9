use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("price growth rates must be at least 1.0")]
    ShrinkingPrice,
    #[error("board must have at least one slot and one slot per row")]
    EmptyBoard,
    #[error("{initial} initial cards do not fit in {slots} base slots")]
    TooManyInitialCards { initial: usize, slots: usize },
    #[error("click tolerance must be smaller than the drag threshold")]
    ClickExceedsDrag,
    #[error("{field} must be between 1 and {max} ms, got {value}")]
    TimerOutOfRange { field: &'static str, value: u32, max: u32 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage call failed: {0}")]
    Backend(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("sealed blob is not valid base64")]
    Encoding,
    #[error("sealed blob is truncated")]
    Truncated,
    #[error("sealed blob failed authentication")]
    TagMismatch,
    #[error("sealed payload is not utf-8")]
    Utf8,
    #[error("payload could not be sealed")]
    Seal,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found:?} does not match {expected:?}")]
    VersionMismatch { found: String, expected: &'static str },
    #[error("snapshot field {field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("player name can no longer be changed")]
    Locked,
    #[error("name must be at least {min} characters")]
    TooShort { min: usize },
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
}

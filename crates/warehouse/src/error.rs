use thiserror::Error;

/// Request-level failures, fatal to the current invocation. Row-level
/// rejections are not errors; they come back in `InsertResult`.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// The warehouse never produced a usable response: unreachable host,
    /// timeout, or an unreadable body.
    #[error("warehouse connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// The insert request itself was refused: bad credentials, missing
    /// table, malformed request.
    #[error("warehouse rejected the insert request (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

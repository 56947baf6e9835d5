use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Couldn't write records to {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Server answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Reqwest(e) => {
                if let Some(status) = e.status() {
                    return status_is_transient(status);
                }
                e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
            }
            Error::Status(status) => status_is_transient(*status),
            _ => false,
        }
    }
}

fn status_is_transient(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

use thiserror::Error;

/// Why a source produced no data.
///
/// These errors only exist inside a source; `DataSource::fetch` turns every
/// one of them into the source's empty output.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed")]
    Network(#[from] reqwest::Error),

    #[error("upstream answered with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode JSON payload")]
    Json(#[from] serde_json::Error),

    #[error("failed to read CSV payload")]
    Csv(#[from] csv::Error),

    #[error("failed to parse XML payload")]
    Xml(#[from] roxmltree::Error),

    #[error("unexpected payload: {0}")]
    Malformed(String),

    #[error("payload contained no usable records")]
    Empty,

    #[error("no resolved location to query")]
    Unresolved,
}

/// Coarse failure classes used when reporting a degraded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    Empty,
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::Network(_) | SourceError::Status { .. } => ErrorKind::Network,
            SourceError::Json(_)
            | SourceError::Csv(_)
            | SourceError::Xml(_)
            | SourceError::Malformed(_) => ErrorKind::Parse,
            SourceError::Empty | SourceError::Unresolved => ErrorKind::Empty,
        }
    }
}

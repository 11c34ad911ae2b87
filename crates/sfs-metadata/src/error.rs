use thiserror::Error;

/// Errors raised by the metadata-store client (C1) and request envelope
/// (C7). Benign conflicts (document-already-exists, version-conflict)
/// never reach this enum — `envelope::execute` maps them to `Ok(None)`
/// at the boundary per I6.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("index {0} not found")]
    IndexAbsent(String),

    #[error("only {0}/{1} shards succeeded")]
    ShardIncomplete(u32, u32),

    #[error("wait-for-green exhausted after {0} attempts")]
    HealthTimeout(u32),

    #[error("store is not started")]
    NotStarted,

    #[error("request failed with status {0}: {1}")]
    Http(reqwest::StatusCode, String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

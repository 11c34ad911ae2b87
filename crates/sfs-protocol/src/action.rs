//! The generic action envelope wrapping metadata-store reads/writes
//! (spec §4.1, §4.7, §6): shard telemetry, and the two benign-conflict
//! error kinds that must be distinguishable from transport/other errors.

use serde::{Deserialize, Serialize};

/// Generic envelope around a metadata-store action response (spec §4.7,
/// C7). `shards` is only present on write actions; read actions carry
/// just the flattened result.
#[derive(Clone, Debug, Deserialize)]
pub struct ActionResponse<T> {
    #[serde(rename = "_shards", default)]
    pub shards: Option<ShardInfo>,

    #[serde(flatten)]
    pub result: T,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ShardInfo {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
}

impl ShardInfo {
    /// I5: a request only succeeds if every targeted shard reported success.
    pub fn is_complete(&self) -> bool {
        self.total == self.successful
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
}

impl ErrorCause {
    /// I6: "document already exists" surfaces from the store as a
    /// version-conflict exception whose reason names the condition.
    pub fn is_document_already_exists(&self) -> bool {
        self.kind == "version_conflict_engine_exception"
            && self.reason.contains("document already exists")
    }

    /// I6: any other version-conflict exception.
    pub fn is_version_conflict(&self) -> bool {
        self.kind == "version_conflict_engine_exception"
    }

    pub fn is_index_not_found(&self) -> bool {
        self.kind == "index_not_found_exception"
    }

    /// I6: a concurrent `createUpdateIndex` racing another caller's
    /// create is a benign conflict, not a failure.
    pub fn is_resource_already_exists(&self) -> bool {
        self.kind == "resource_already_exists_exception"
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCause,
    pub status: u16,
}

/// The `_search` response envelope, trimmed to the `hits` a scrub/repair
/// caller needs to walk the documents in an index.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResponse<T> {
    pub hits: SearchHits<T>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchHits<T> {
    pub hits: Vec<SearchHit<T>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchHit<T> {
    #[serde(rename = "_source")]
    pub source: T,
}

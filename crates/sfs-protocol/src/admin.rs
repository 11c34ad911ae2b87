//! Wire payloads for metadata-store index administration (spec §4.1, §6).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ClusterHealthResponse {
    pub status: HealthStatus,
    pub active_shards: u64,
    pub relocating_shards: u64,
    pub unassigned_shards: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    pub refresh_interval: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateIndexRequest {
    pub settings: IndexSettings,
    pub mappings: serde_json::Value,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateSettingsRequest {
    pub index: IndexReplicaSetting,
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexReplicaSetting {
    pub number_of_replicas: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AcknowledgedResponse {
    pub acknowledged: bool,
}

use serde::{Deserialize, Serialize};

/// Timeout defaults from spec §4.1, all overridable per deployment.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Timeouts {
    pub index_ms: u64,
    pub get_ms: u64,
    pub delete_ms: u64,
    pub search_ms: u64,
    pub scroll_ms: u64,
    pub admin_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            index_ms: 500,
            get_ms: 500,
            delete_ms: 500,
            search_ms: 5_000,
            scroll_ms: 120_000,
            admin_ms: 30_000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetadataStoreConfig {
    pub discovery_hosts: Vec<String>,
    pub cluster_name: String,
    pub node_name: Option<String>,

    #[serde(default)]
    pub timeouts: Timeouts,

    /// Shard/replica defaults `createUpdateIndex` falls back to when the
    /// caller passes `NOT_SET`.
    #[serde(default = "MetadataStoreConfig::default_shards")]
    pub default_shards: u32,

    #[serde(default = "MetadataStoreConfig::default_replicas")]
    pub default_replicas: u32,
}

impl MetadataStoreConfig {
    fn default_shards() -> u32 {
        1
    }

    fn default_replicas() -> u32 {
        0
    }
}

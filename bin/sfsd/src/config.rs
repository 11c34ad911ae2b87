//! Configuration surface for the daemon (spec §6): the `elasticsearch.*`
//! keys, all overridable via environment variables of the same name
//! (`SFS_ELASTICSEARCH_...`), plus the ambient scrub/directory settings
//! SPEC_FULL.md §6 adds on top.

use serde::Deserialize;

fn default_shards() -> u32 {
    1
}

fn default_index_timeout() -> u64 {
    500
}

fn default_search_timeout() -> u64 {
    5_000
}

fn default_admin_timeout() -> u64 {
    30_000
}

fn default_scroll_timeout() -> u64 {
    120_000
}

fn default_node_forget_seconds() -> i64 {
    60
}

fn default_scrub_interval_seconds() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterSetting {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSetting {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(dead_code)]
pub struct UnicastSetting {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct MulticastSetting {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MulticastSetting {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(dead_code)]
pub struct PingSetting {
    #[serde(default)]
    pub unicast: UnicastSetting,
    #[serde(default)]
    pub multicast: MulticastSetting,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZenSetting {
    #[serde(default)]
    pub ping: PingSetting,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverySetting {
    #[serde(default)]
    pub zen: ZenSetting,
}

/// `elasticsearch.*` (spec §6). The default unicast seed port (9300) is
/// applied to any host entry that doesn't already carry one.
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchConfig {
    pub cluster: ClusterSetting,
    #[serde(default)]
    pub node: NodeSetting,
    #[serde(default)]
    pub discovery: DiscoverySetting,
    #[serde(default = "default_shards")]
    pub shards: u32,
    #[serde(default)]
    pub replicas: u32,
    #[serde(default = "default_index_timeout")]
    pub defaultindextimeout: u64,
    #[serde(default = "default_index_timeout")]
    pub defaultgettimeout: u64,
    #[serde(default = "default_search_timeout")]
    pub defaultsearchtimeout: u64,
    #[serde(default = "default_index_timeout")]
    pub defaultdeletetimeout: u64,
    #[serde(default = "default_admin_timeout")]
    pub defaultadmintimeout: u64,
    #[serde(default = "default_scroll_timeout")]
    pub defaultscrolltimeout: u64,
}

const DEFAULT_UNICAST_PORT: &str = "9300";

impl ElasticsearchConfig {
    fn seed_hosts(&self) -> Vec<String> {
        self.discovery
            .zen
            .ping
            .unicast
            .hosts
            .iter()
            .map(|host| {
                if host.contains(':') {
                    host.clone()
                } else {
                    format!("{host}:{DEFAULT_UNICAST_PORT}")
                }
            })
            .collect()
    }

    pub fn metadata_store_config(&self) -> sfs_metadata::MetadataStoreConfig {
        sfs_metadata::MetadataStoreConfig {
            discovery_hosts: self.seed_hosts(),
            cluster_name: self.cluster.name.clone(),
            node_name: self.node.name.clone(),
            timeouts: sfs_metadata::Timeouts {
                index_ms: self.defaultindextimeout,
                get_ms: self.defaultgettimeout,
                delete_ms: self.defaultdeletetimeout,
                search_ms: self.defaultsearchtimeout,
                scroll_ms: self.defaultscrolltimeout,
                admin_ms: self.defaultadmintimeout,
            },
            default_shards: self.shards,
            default_replicas: self.replicas,
        }
    }
}

/// Supplemental ambient config SPEC_FULL.md §6 adds: not part of the
/// original `elasticsearch.*` table, needed to run the scrub loop and
/// the cluster directory's staleness policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrubConfig {
    #[serde(default = "default_scrub_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default)]
    pub containers: Vec<String>,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_scrub_interval_seconds(),
            containers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterDirectoryConfig {
    #[serde(default = "default_node_forget_seconds")]
    pub node_forget_seconds: i64,
}

impl Default for ClusterDirectoryConfig {
    fn default() -> Self {
        Self {
            node_forget_seconds: default_node_forget_seconds(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// `sfs.node.*` (SPEC_FULL.md §6): reserved for the admin HTTP surface
/// menmosd exposes on top of this cluster directory. This daemon has no
/// HTTP listener of its own (the REST surface is an external
/// collaborator per §1), so the value is accepted and otherwise unused.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct NodeBindConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for NodeBindConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub elasticsearch: ElasticsearchConfig,

    #[serde(default)]
    pub is_master: bool,

    #[serde(default)]
    pub scrub: ScrubConfig,

    #[serde(default)]
    pub cluster_directory: ClusterDirectoryConfig,

    #[serde(default, rename = "node")]
    #[allow(dead_code)]
    pub node: NodeBindConfig,
}

impl AppConfig {
    pub fn load(path: &Option<std::path::PathBuf>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("elasticsearch.shards", 1i64)?
            .set_default("elasticsearch.replicas", 0i64)?
            .set_default("is_master", false)?
            .add_source(config::Environment::with_prefix("SFS").separator("_"));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        let cfg: AppConfig = builder.build()?.try_deserialize()?;
        Ok(cfg)
    }
}

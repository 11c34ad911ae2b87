//! C1: MetadataStore. Client for the external indexed document store,
//! accessed over its HTTP REST API (no first-party Rust client exists
//! for it — grounded in the same `reqwest`-direct approach this
//! codebase's other HTTP-speaking peer, `sfs-node-client`, uses).

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::{debug, warn};

use sfs_protocol::action::SearchResponse;
use sfs_protocol::admin::{
    AcknowledgedResponse, ClusterHealthResponse, CreateIndexRequest, HealthStatus,
    IndexReplicaSetting, IndexSettings, UpdateSettingsRequest,
};

use crate::catalog;
use crate::config::MetadataStoreConfig;
use crate::envelope;
use crate::error::MetadataError;
use crate::mappings;

const STOPPED: u8 = 0;
const STARTING: u8 = 1;
const STARTED: u8 = 2;
const STOPPING: u8 = 3;

const MAPPING_TYPE: &str = "default";
const WAIT_FOR_GREEN_MAX_ATTEMPTS: u32 = 10;
const WAIT_FOR_GREEN_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// P8: `waitForGreen` backoff schedule, `delayMs = 100 * 2^attempt`.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2u64.pow(attempt))
}

/// Sentinel shard/replica counts the caller may pass to
/// `create_update_index` to request the component defaults.
pub const NOT_SET: u32 = u32::MAX;

/// External indexed document store client. Start/stop transitions are
/// serialised by a single CAS on `status` (spec §5): a second concurrent
/// `start` observes a state other than `Stopped` and is a no-op.
pub struct MetadataStore {
    client: Client,
    base_url: Url,
    config: MetadataStoreConfig,
    status: AtomicU8,
}

impl MetadataStore {
    pub fn new(base_url: Url, config: MetadataStoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url,
            config,
            status: AtomicU8::new(STOPPED),
        }
    }

    pub fn is_started(&self) -> bool {
        self.status.load(Ordering::SeqCst) == STARTED
    }

    /// `start(config, isMaster)`: waits for the prefix to go green, then
    /// (if this node is master) applies the fixed mapping set. S6: only
    /// the caller that wins the `Stopped → Starting` CAS performs any
    /// work; every other concurrent caller is a no-op.
    pub async fn start(&self, is_master: bool) -> Result<(), MetadataError> {
        if self
            .status
            .compare_exchange(STOPPED, STARTING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("start ignored, store is not in Stopped state");
            return Ok(());
        }

        self.wait_for_green(catalog::PREFIX).await?;

        if is_master {
            self.apply_fixed_mappings().await?;
        }

        self.status.store(STARTED, Ordering::SeqCst);
        debug!(cluster = %self.config.cluster_name, "metadata store started");
        Ok(())
    }

    /// `stop()`: closes the underlying client under the same CAS
    /// discipline as `start`.
    pub async fn stop(&self) -> Result<(), MetadataError> {
        if self
            .status
            .compare_exchange(STARTED, STOPPING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("stop ignored, store is not in Started state");
            return Ok(());
        }

        self.status.store(STOPPED, Ordering::SeqCst);
        debug!("metadata store stopped");
        Ok(())
    }

    async fn apply_fixed_mappings(&self) -> Result<(), MetadataError> {
        for (index, mapping) in [
            (catalog::account(), mappings::account()),
            (catalog::container(), mappings::container()),
            (catalog::container_key(), mappings::container_key()),
            (catalog::master_key(), mappings::master_key()),
            (catalog::service_def(), mappings::service_def()),
        ] {
            self.create_update_index(&index, mapping, None, None)
                .await?;
        }
        Ok(())
    }

    fn index_url(&self, index: &str) -> Result<Url, MetadataError> {
        self.base_url
            .join(&format!("{}/", index))
            .map_err(|e| MetadataError::Http(reqwest::StatusCode::BAD_REQUEST, e.to_string()))
    }

    async fn index_exists(&self, index: &str) -> Result<bool, MetadataError> {
        let resp = self
            .client
            .head(self.index_url(index)?)
            .timeout(Duration::from_millis(self.config.timeouts.index_ms))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// `createUpdateIndex(index, mapping, shards, replicas)`. Index setup
    /// is strictly sequential per spec §5: mapping-load (already done by
    /// the caller) → exists-probe → (update-mapping ∧ settings-update) ∨
    /// create → wait-for-green. `shards`/`replicas` of `NOT_SET` fall
    /// back to the component defaults.
    pub async fn create_update_index(
        &self,
        index: &str,
        mapping: Value,
        shards: Option<u32>,
        replicas: Option<u32>,
    ) -> Result<(), MetadataError> {
        if let Some(s) = shards {
            if s != NOT_SET && s == 0 {
                return Err(MetadataError::Http(
                    reqwest::StatusCode::BAD_REQUEST,
                    "shards must be NOT_SET or >= 1".into(),
                ));
            }
        }

        let effective_shards = match shards {
            None | Some(NOT_SET) => self.config.default_shards,
            Some(s) => s,
        };
        let effective_replicas = match replicas {
            None | Some(NOT_SET) => self.config.default_replicas,
            Some(r) => r,
        };

        let admin_timeout = Duration::from_millis(self.config.timeouts.admin_ms);

        if self.index_exists(index).await? {
            self.update_mapping(index, &mapping, admin_timeout).await?;
            if replicas.is_some() && replicas != Some(NOT_SET) {
                self.update_replicas(index, effective_replicas, admin_timeout)
                    .await?;
            }
        } else {
            self.create_index(index, &mapping, effective_shards, effective_replicas, admin_timeout)
                .await?;
        }

        self.wait_for_green(index).await
    }

    /// C7: submits `request`, applies I5 (shard-success) and I6
    /// (benign-conflict → absent) per `envelope::execute`. Every admin
    /// write below is expressed in terms of this one primitive.
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<Option<T>, MetadataError> {
        envelope::execute(request, timeout).await
    }

    async fn update_mapping(
        &self,
        index: &str,
        mapping: &Value,
        timeout: Duration,
    ) -> Result<(), MetadataError> {
        let url = self
            .index_url(index)?
            .join(&format!("_mapping/{}", MAPPING_TYPE))
            .map_err(|e| MetadataError::Http(reqwest::StatusCode::BAD_REQUEST, e.to_string()))?;

        let request = self.client.put(url).json(mapping);
        self.expect_acknowledged(request, timeout).await
    }

    async fn update_replicas(
        &self,
        index: &str,
        replicas: u32,
        timeout: Duration,
    ) -> Result<(), MetadataError> {
        let url = self
            .index_url(index)?
            .join("_settings")
            .map_err(|e| MetadataError::Http(reqwest::StatusCode::BAD_REQUEST, e.to_string()))?;

        let body = UpdateSettingsRequest {
            index: IndexReplicaSetting {
                number_of_replicas: replicas,
            },
        };

        let request = self.client.put(url).json(&body);
        self.expect_acknowledged(request, timeout).await
    }

    async fn create_index(
        &self,
        index: &str,
        mapping: &Value,
        shards: u32,
        replicas: u32,
        timeout: Duration,
    ) -> Result<(), MetadataError> {
        let body = CreateIndexRequest {
            settings: IndexSettings {
                number_of_shards: shards,
                number_of_replicas: replicas,
                refresh_interval: Some("1s".to_string()),
            },
            mappings: json!({ MAPPING_TYPE: mapping }),
        };

        let request = self.client.put(self.index_url(index)?).json(&body);
        self.expect_acknowledged(request, timeout).await
    }

    /// `deleteIndex(index)`: succeeds if the index existed and was
    /// acknowledged-deleted; an index-not-found underneath is swallowed.
    pub async fn delete_index(&self, index: &str) -> Result<(), MetadataError> {
        let timeout = Duration::from_millis(self.config.timeouts.delete_ms);
        let probe = self
            .client
            .head(self.index_url(index)?)
            .timeout(timeout)
            .send()
            .await?;
        if probe.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(%index, "delete_index on absent index treated as success");
            return Ok(());
        }

        let request = self.client.delete(self.index_url(index)?);
        self.expect_acknowledged(request, timeout).await
    }

    /// Runs `request` through [`MetadataStore::execute`] and collapses
    /// its result to success/failure: `Some(ack)` requires
    /// `ack.acknowledged`, `None` (a benign conflict per I6 — e.g. a
    /// concurrent caller already created/updated the same resource) is
    /// treated as success.
    async fn expect_acknowledged(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<(), MetadataError> {
        match self.execute::<AcknowledgedResponse>(request, timeout).await? {
            Some(ack) if ack.acknowledged => Ok(()),
            Some(_) => Err(MetadataError::Http(
                reqwest::StatusCode::OK,
                "request was not acknowledged".to_string(),
            )),
            None => Ok(()),
        }
    }

    /// `waitForGreen`: retries up to 10 times with exponential backoff
    /// `delayMs = 100 * 2^attempt`, per-attempt wait capped at 2s (P8).
    pub async fn wait_for_green(&self, index_prefix: &str) -> Result<(), MetadataError> {
        for attempt in 1..=WAIT_FOR_GREEN_MAX_ATTEMPTS {
            let health = self.cluster_health(index_prefix).await;
            match health {
                Ok(h) if h.status == HealthStatus::Green => {
                    debug!(%index_prefix, attempt, status = ?h.status, "wait_for_green satisfied");
                    return Ok(());
                }
                Ok(h) => {
                    warn!(%index_prefix, attempt, status = ?h.status, "cluster health not green yet");
                }
                Err(e) => {
                    warn!(%index_prefix, attempt, error = %e, "health check failed, retrying");
                }
            }

            let delay = backoff_delay(attempt).min(WAIT_FOR_GREEN_HEALTH_CHECK_TIMEOUT);
            tokio::time::sleep(delay).await;
        }

        Err(MetadataError::HealthTimeout(WAIT_FOR_GREEN_MAX_ATTEMPTS))
    }

    /// Walks every document currently indexed under `index` via a plain
    /// `match_all` search (spec §3 "Object indices ... are the system of
    /// record for references"). Used by the scrub loop (see `bin/sfsd`)
    /// to enumerate the objects and service-defs reachable from an index;
    /// an absent index is reported as empty rather than an error, matching
    /// the `deleteIndex`-on-absent discipline elsewhere in this client.
    pub async fn search<T: serde::de::DeserializeOwned>(
        &self,
        index: &str,
    ) -> Result<Vec<T>, MetadataError> {
        let url = self
            .index_url(index)?
            .join("_search")
            .map_err(|e| MetadataError::Http(reqwest::StatusCode::BAD_REQUEST, e.to_string()))?;

        let resp = self
            .client
            .post(url)
            .timeout(Duration::from_millis(self.config.timeouts.search_ms))
            .json(&json!({ "query": { "match_all": {} }, "size": 10_000 }))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(%index, "search on absent index returned no documents");
            return Ok(Vec::new());
        }

        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(MetadataError::Http(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        let parsed: SearchResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(parsed.hits.hits.into_iter().map(|hit| hit.source).collect())
    }

    /// Convenience wrapper over [`MetadataStore::search`] for the
    /// per-container object index (spec §4.2 `IndexCatalog::object`).
    pub async fn search_objects(&self, index: &str) -> Result<Vec<sfs_core::Object>, MetadataError> {
        self.search(index).await
    }

    /// Convenience wrapper over [`MetadataStore::search`] for the fixed
    /// `service_def` index (spec §3 "Lifecycles": "the cluster directory
    /// is populated from service-def documents").
    pub async fn search_service_defs(&self) -> Result<Vec<sfs_core::ServiceDef>, MetadataError> {
        self.search(&catalog::service_def()).await
    }

    async fn cluster_health(&self, index_prefix: &str) -> Result<ClusterHealthResponse, MetadataError> {
        let url = self
            .base_url
            .join(&format!("_cluster/health/{}*", index_prefix))
            .map_err(|e| MetadataError::Http(reqwest::StatusCode::BAD_REQUEST, e.to_string()))?;

        let resp = self
            .client
            .get(url)
            .timeout(Duration::from_millis(self.config.timeouts.admin_ms))
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(MetadataError::Http(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timeouts;

    fn test_config() -> MetadataStoreConfig {
        MetadataStoreConfig {
            discovery_hosts: vec!["127.0.0.1:9200".to_string()],
            cluster_name: "test".to_string(),
            node_name: None,
            timeouts: Timeouts::default(),
            default_shards: 1,
            default_replicas: 1,
        }
    }

    fn test_store() -> MetadataStore {
        MetadataStore::new(Url::parse("http://127.0.0.1:9200").unwrap(), test_config())
    }

    #[test]
    fn starts_stopped() {
        let store = test_store();
        assert!(!store.is_started());
    }

    #[tokio::test]
    async fn stop_before_start_is_a_noop() {
        let store = test_store();
        store.stop().await.unwrap();
        assert!(!store.is_started());
    }

    #[tokio::test]
    async fn concurrent_start_is_serialised_by_the_status_cas() {
        // S6: simulate two callers racing the Stopped -> Starting CAS
        // directly, without requiring a live cluster behind wait_for_green.
        let store = test_store();
        let won = store
            .status
            .compare_exchange(STOPPED, STARTING, Ordering::SeqCst, Ordering::SeqCst);
        let lost = store
            .status
            .compare_exchange(STOPPED, STARTING, Ordering::SeqCst, Ordering::SeqCst);

        assert!(won.is_ok());
        assert!(lost.is_err());
    }

    use std::sync::atomic::AtomicUsize;

    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn store_against(server: &MockServer) -> MetadataStore {
        MetadataStore::new(Url::parse(&server.uri()).unwrap(), test_config())
    }

    fn health_body(status: &str) -> Value {
        json!({
            "status": status,
            "active_shards": 2,
            "relocating_shards": 0,
            "unassigned_shards": 0,
        })
    }

    // Finding: wait_for_green previously accepted Yellow as satisfying
    // P4's "cluster health for i is green" requirement. Yellow must keep
    // retrying; only Green satisfies the wait.
    #[tokio::test]
    async fn wait_for_green_does_not_settle_for_yellow() {
        let server = MockServer::start().await;
        let calls = AtomicUsize::new(0);

        Mock::given(method("GET"))
            .and(path_regex(r"^/_cluster/health/.*$"))
            .respond_with(move |_req: &Request| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                let status = if attempt == 0 { "yellow" } else { "green" };
                ResponseTemplate::new(200).set_body_json(health_body(status))
            })
            .mount(&server)
            .await;

        let store = store_against(&server);
        store.wait_for_green(catalog::PREFIX).await.unwrap();
    }

    // P8: delayMs = 100 * 2^attempt, per-attempt wait capped at 2s.
    #[test]
    fn backoff_delay_follows_the_doubling_schedule() {
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(2), Duration::from_millis(400));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    // S4 (create leg): absent index is created with the caller's shard
    // count, waits green, and succeeds.
    #[tokio::test]
    async fn create_update_index_creates_when_absent() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/_cluster/health/.*$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body("green")))
            .mount(&server)
            .await;

        let store = store_against(&server);
        store
            .create_update_index("sfs_v0_accounts_test", json!({}), Some(3), Some(1))
            .await
            .unwrap();
    }

    // S4 (update leg): an existing index updates mapping and replicas,
    // never re-creates, then waits green.
    #[tokio::test]
    async fn create_update_index_updates_when_present() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/sfs_v0_accounts_test/_mapping/default$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/sfs_v0_accounts_test/_settings$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/_cluster/health/.*$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body("green")))
            .mount(&server)
            .await;

        let store = store_against(&server);
        store
            .create_update_index("sfs_v0_accounts_test", json!({}), Some(NOT_SET), Some(2))
            .await
            .unwrap();
    }

    // I6: a concurrent create racing another caller is a benign conflict,
    // not a failure.
    #[tokio::test]
    async fn create_update_index_treats_concurrent_create_as_benign() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "resource_already_exists_exception",
                    "reason": "index already exists",
                },
                "status": 400,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/_cluster/health/.*$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body("green")))
            .mount(&server)
            .await;

        let store = store_against(&server);
        store
            .create_update_index("sfs_v0_accounts_test", json!({}), None, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_index_on_absent_index_is_a_noop() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = store_against(&server);
        store.delete_index("sfs_v0_accounts_test").await.unwrap();
    }

    #[tokio::test]
    async fn delete_index_deletes_when_present() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/sfs_v0_accounts_test/$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})))
            .mount(&server)
            .await;

        let store = store_against(&server);
        store.delete_index("sfs_v0_accounts_test").await.unwrap();
    }
}

//! C3: ClusterDirectory. Maintains the live `volumeId → node` mapping
//! advertised by service-def documents and answers "which node hosts
//! volume V?" (spec §4.3).
//!
//! An `AsyncHashMap` snapshot refreshed from advertisement documents,
//! with a "forget nodes not seen in N seconds" staleness policy applied
//! to volume-to-node advertisements.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use sfs_core::{ClusterDirectory, NodeClient, ServiceDef};
use sfs_std::collections::AsyncHashMap;

const NODE_FORGET_DURATION_SECONDS: i64 = 60;

/// Builds the `NodeClient` that speaks to the node advertising in a
/// service-def document. Kept as an injected factory so this crate never
/// needs to depend on a concrete transport (`sfs-node-client` or a test
/// double) — the same decoupling `sfs-core::traits` calls out for C3/C4.
pub type NodeClientFactory = Arc<dyn Fn(&ServiceDef) -> Arc<dyn NodeClient> + Send + Sync>;

/// `ClusterDirectory` implementation backed by an in-memory snapshot of
/// the most recent service-def advertisements.
pub struct NodeDirectory {
    volumes: AsyncHashMap<String, (Arc<dyn NodeClient>, OffsetDateTime)>,
    node_forget_duration: Duration,
    make_client: NodeClientFactory,
}

impl NodeDirectory {
    pub fn new(make_client: NodeClientFactory) -> Self {
        Self {
            volumes: AsyncHashMap::new(),
            node_forget_duration: Duration::seconds(NODE_FORGET_DURATION_SECONDS),
            make_client,
        }
    }

    pub fn with_forget_duration(make_client: NodeClientFactory, forget: Duration) -> Self {
        Self {
            volumes: AsyncHashMap::new(),
            node_forget_duration: forget,
            make_client,
        }
    }

    /// Replaces the volume→node entries advertised in `defs`, overwriting
    /// any existing entry for the same volume. Required freshness (spec
    /// §4.3): reads after this call complete must reflect it.
    pub async fn refresh(&self, defs: &[ServiceDef]) {
        for def in defs {
            let client = (self.make_client)(def);
            for advertisement in &def.volumes {
                self.volumes
                    .insert(advertisement.volume_id.clone(), (client.clone(), def.advertised_at))
                    .await;
            }
        }
    }

    async fn get_if_fresh(&self, volume_id: &str) -> Option<Arc<dyn NodeClient>> {
        let (client, advertised_at) = self.volumes.get(volume_id).await?;
        if OffsetDateTime::now_utc() - advertised_at > self.node_forget_duration {
            tracing::debug!(volume_id, "service-def advertisement expired, treating as absent");
            None
        } else {
            Some(client)
        }
    }
}

#[async_trait]
impl ClusterDirectory for NodeDirectory {
    async fn node_for_volume(&self, volume_id: &str) -> Result<Option<Arc<dyn NodeClient>>> {
        Ok(self.get_if_fresh(volume_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sfs_core::{DigestAlgo, DigestBlob, VolumeAdvertisement, VolumeRole};

    struct NoopNode;

    #[async_trait]
    impl NodeClient for NoopNode {
        async fn checksum(
            &self,
            _volume_id: &str,
            _position: u64,
            _offset: Option<u64>,
            _length: Option<u64>,
            _algo: DigestAlgo,
        ) -> Result<Option<DigestBlob>> {
            Ok(None)
        }
    }

    fn factory() -> NodeClientFactory {
        Arc::new(|_def: &ServiceDef| -> Arc<dyn NodeClient> { Arc::new(NoopNode) })
    }

    fn def(node_id: &str, volume_id: &str, advertised_at: OffsetDateTime) -> ServiceDef {
        ServiceDef {
            node_id: node_id.into(),
            endpoint: format!("http://{node_id}"),
            volumes: vec![VolumeAdvertisement {
                volume_id: volume_id.into(),
                role: VolumeRole::Primary,
            }],
            advertised_at,
        }
    }

    #[tokio::test]
    async fn unknown_volume_is_absent() {
        let directory = NodeDirectory::new(factory());
        assert!(directory.node_for_volume("v1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refreshed_volume_resolves_to_a_node() {
        let directory = NodeDirectory::new(factory());
        directory
            .refresh(&[def("n1", "v1", OffsetDateTime::now_utc())])
            .await;

        assert!(directory.node_for_volume("v1").await.unwrap().is_some());
        assert!(directory.node_for_volume("v2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_advertisement_is_forgotten() {
        let directory = NodeDirectory::with_forget_duration(factory(), Duration::seconds(60));
        let stale = OffsetDateTime::now_utc() - Duration::seconds(120);
        directory.refresh(&[def("n1", "v1", stale)]).await;

        assert!(directory.node_for_volume("v1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_overwrites_prior_advertisement() {
        let directory = NodeDirectory::new(factory());
        let stale = OffsetDateTime::now_utc() - Duration::seconds(120);
        directory.refresh(&[def("n1", "v1", stale)]).await;
        assert!(directory.node_for_volume("v1").await.unwrap().is_none());

        directory
            .refresh(&[def("n1", "v1", OffsetDateTime::now_utc())])
            .await;
        assert!(directory.node_for_volume("v1").await.unwrap().is_some());
    }
}

//! In-memory mocks of the C3/C4 ports: a mutex-backed store standing in
//! for the real collaborator, built up with a small builder API before
//! use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use sfs_core::{ClusterDirectory, DigestAlgo, DigestBlob, NodeClient};

/// Stand-in for a peer node: answers `checksum` from a fixed table of
/// `(volumeId, position) -> DigestBlob`, or simulates a transport failure.
#[derive(Default)]
pub struct MockNodeClient {
    blobs: Mutex<HashMap<(String, u64), DigestBlob>>,
    failure: Mutex<Option<String>>,
}

impl MockNodeClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_blob(self, volume_id: impl Into<String>, position: u64, blob: DigestBlob) -> Self {
        self.blobs
            .lock()
            .unwrap()
            .insert((volume_id.into(), position), blob);
        self
    }

    /// Every subsequent `checksum` call fails with a transport error
    /// instead of returning `Ok`.
    #[must_use]
    pub fn failing(self, reason: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(reason.into());
        self
    }
}

#[async_trait]
impl NodeClient for MockNodeClient {
    async fn checksum(
        &self,
        volume_id: &str,
        position: u64,
        _offset: Option<u64>,
        _length: Option<u64>,
        _algo: DigestAlgo,
    ) -> Result<Option<DigestBlob>> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            anyhow::bail!(reason);
        }

        Ok(self
            .blobs
            .lock()
            .unwrap()
            .get(&(volume_id.to_string(), position))
            .cloned())
    }
}

/// Stand-in for the cluster directory: answers `node_for_volume` from a
/// fixed table of `volumeId -> NodeClient`.
#[derive(Default)]
pub struct MockClusterDirectory {
    nodes: Mutex<HashMap<String, Arc<dyn NodeClient>>>,
    failure: Mutex<Option<String>>,
}

impl MockClusterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_node(self, volume_id: impl Into<String>, node: Arc<dyn NodeClient>) -> Self {
        self.nodes.lock().unwrap().insert(volume_id.into(), node);
        self
    }

    #[must_use]
    pub fn failing(self, reason: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(reason.into());
        self
    }
}

#[async_trait]
impl ClusterDirectory for MockClusterDirectory {
    async fn node_for_volume(&self, volume_id: &str) -> Result<Option<Arc<dyn NodeClient>>> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            anyhow::bail!(reason);
        }

        Ok(self.nodes.lock().unwrap().get(volume_id).cloned())
    }
}

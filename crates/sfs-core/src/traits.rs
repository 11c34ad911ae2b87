//! Core ports implemented by the cluster directory (C3) and the remote
//! node client (C4). Kept trait-object friendly (`dyn ClusterDirectory`,
//! `dyn NodeClient`) so `sfs-verify` never needs to know which concrete
//! transport backs either one.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::digest::{DigestAlgo, DigestBlob};

/// Answers "which node currently hosts volume V?" (spec §4.3).
///
/// Implementations must give concurrent callers a consistent snapshot for
/// the duration of a single call, and must reflect the most recently
/// completed refresh from service-def documents.
#[async_trait]
pub trait ClusterDirectory: Send + Sync {
    async fn node_for_volume(&self, volume_id: &str) -> Result<Option<Arc<dyn NodeClient>>>;
}

/// Remote-blob operations against a peer node (spec §4.4). Only `checksum`
/// is in core scope; `read`/`write`/`delete`/`ack` belong to the
/// volume-local storage layer this spec treats as an external collaborator.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Reads the blob at `(volume_id, position)`, optionally restricted to
    /// a byte window, and returns its length and digest under `algo`.
    ///
    /// Returns `Ok(None)` when no blob exists at that coordinate — distinct
    /// from `Err`, which is reserved for transport failures and must never
    /// be silently downgraded to `None`.
    async fn checksum(
        &self,
        volume_id: &str,
        position: u64,
        offset: Option<u64>,
        length: Option<u64>,
        algo: DigestAlgo,
    ) -> Result<Option<DigestBlob>>;
}

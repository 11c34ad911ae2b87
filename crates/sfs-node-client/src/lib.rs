//! C4: NodeClient (XNode). Remote-blob operations against a peer node.
//! Only `checksum` is in core scope (spec §4.4); `read`/`write`/`delete`/
//! `ack` belong to the volume-local storage layer this spec treats as an
//! external collaborator.
//!
//! A bare `reqwest::Client` calling a peer's base URL, propagating
//! transport errors verbatim and reserving a distinct channel (here,
//! HTTP 404) for "no such blob at that coordinate".

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use sfs_core::{DigestAlgo, DigestBlob, NodeClient};
use sfs_protocol::node::ChecksumResponse;

fn algo_query_value(algo: DigestAlgo) -> &'static str {
    match algo {
        DigestAlgo::Sha512 => "sha-512",
    }
}

/// Speaks the inter-node checksum RPC over HTTP against one peer.
pub struct HttpNodeClient {
    client: Client,
    base_url: Url,
}

impl HttpNodeClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn checksum_url(
        &self,
        volume_id: &str,
        position: u64,
        offset: Option<u64>,
        length: Option<u64>,
        algo: DigestAlgo,
    ) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("volume/{volume_id}/blob/{position}/checksum"))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("algo", algo_query_value(algo));
            if let Some(offset) = offset {
                query.append_pair("offset", &offset.to_string());
            }
            if let Some(length) = length {
                query.append_pair("length", &length.to_string());
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    /// `Ok(None)` on HTTP 404 — no blob at that coordinate, distinct
    /// from a transport error, which is propagated verbatim.
    async fn checksum(
        &self,
        volume_id: &str,
        position: u64,
        offset: Option<u64>,
        length: Option<u64>,
        algo: DigestAlgo,
    ) -> Result<Option<DigestBlob>> {
        let url = self.checksum_url(volume_id, position, offset, length, algo)?;

        let resp = self.client.get(url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(volume_id, position, "peer reports no blob at this coordinate");
            return Ok(None);
        }

        let status = resp.status();
        if !status.is_success() {
            bail!(
                "checksum rpc against volume {} failed with status {}",
                volume_id,
                status
            );
        }

        let body: ChecksumResponse = resp.json().await?;
        let blob = DigestBlob::new(body.position, body.length).with_digest(body.algo, body.digest);
        Ok(Some(blob))
    }
}

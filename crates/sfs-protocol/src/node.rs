//! Wire payloads for the inter-node checksum RPC (spec §4.4, §6).

use serde::{Deserialize, Serialize};

use sfs_core::{Digest, DigestAlgo};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChecksumRequest {
    pub algo: DigestAlgo,
    pub offset: Option<u64>,
    pub length: Option<u64>,
}

/// Body of a successful checksum response. A missing blob at the
/// requested coordinate is signalled by the transport (e.g. HTTP 404),
/// not by a field on this type — see `sfs-core::NodeClient::checksum`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChecksumResponse {
    pub position: u64,
    pub length: u64,
    pub algo: DigestAlgo,
    pub digest: Digest,
}

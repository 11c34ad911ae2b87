//! C6: VerifyBlobReference. Given a blob reference, recomputes the
//! remote checksum and proves that recorded-read ≡ recorded-write ≡
//! recomputed, under both digest and length (spec §4.6).
//!
//! This never raises: every failure path — an unresolved volume, an
//! unreachable blob, a transport error — collapses to `false`. The
//! verification layer is a best-effort query batched by callers
//! (repair, scrub); it must never abort them (spec §7).

use std::sync::Arc;

use sfs_core::{BlobReference, ClusterDirectory, DigestAlgo, Segment};

/// Runs the full six-equality check of spec §4.6 step 6 for a single
/// reference. Returns `true` iff every equality holds simultaneously —
/// there is no partial credit for a length-only or digest-only match.
pub async fn verify(
    directory: &dyn ClusterDirectory,
    segment: &Segment,
    reference: &BlobReference,
) -> bool {
    // I2: a recorded write length with no write digest is structurally
    // invalid — no reference under this segment can ever verify.
    if !segment.is_structurally_valid() {
        return false;
    }

    // I1: verifiability requires both coordinates; unverifiable
    // references are reported false without issuing any RPC.
    if !reference.is_verifiable() {
        return false;
    }

    // Both are guaranteed present by `is_verifiable`.
    let volume_id = reference.volume_id.as_deref().unwrap_or_default();
    let position = reference.position.unwrap_or_default();

    let node = match directory.node_for_volume(volume_id).await {
        Ok(Some(node)) => node,
        Ok(None) => {
            tracing::warn!(volume_id, "no node advertises this volume, cannot verify");
            return false;
        }
        Err(e) => {
            tracing::error!(volume_id, error = %e, "cluster directory lookup failed during verify");
            return false;
        }
    };

    checksum_and_compare(node, segment, reference, volume_id, position).await
}

async fn checksum_and_compare(
    node: Arc<dyn sfs_core::NodeClient>,
    segment: &Segment,
    reference: &BlobReference,
    volume_id: &str,
    position: u64,
) -> bool {
    let digest_blob = match node
        .checksum(volume_id, position, None, None, DigestAlgo::Sha512)
        .await
    {
        Ok(Some(d)) => d,
        Ok(None) => {
            tracing::debug!(volume_id, position, "no blob at this coordinate");
            return false;
        }
        Err(e) => {
            tracing::error!(volume_id, position, error = %e, "checksum rpc failed during verify");
            return false;
        }
    };

    let expected_digest = match digest_blob.digest(DigestAlgo::Sha512) {
        Some(d) => d,
        None => return false,
    };
    let expected_length = digest_blob.length();

    let sha512_match = reference
        .read_sha512
        .as_ref()
        .is_some_and(|rs| rs == expected_digest);
    let length_match = reference
        .read_length
        .is_some_and(|rl| rl == expected_length);

    let write_digest_match = segment
        .write_sha512
        .as_ref()
        .is_some_and(|ws| ws == expected_digest);
    let write_length_match = segment.write_length.is_some_and(|wl| wl == expected_length);

    sha512_match && length_match && write_digest_match && write_length_match
}

#[cfg(test)]
mod tests {
    use super::*;

    use sfs_core::{Digest, DigestBlob, NodeClient};
    use sfs_testing::{MockClusterDirectory, MockNodeClient};

    fn matching_segment_and_reference(digest: Digest, length: u64) -> (Segment, BlobReference) {
        let mut segment = Segment::new(0);
        segment.write_sha512 = Some(digest.clone());
        segment.write_length = Some(length);

        let reference = BlobReference {
            volume_id: Some("v1".into()),
            position: Some(42),
            read_sha512: Some(digest),
            read_length: Some(length),
            acknowledged: true,
        };
        (segment, reference)
    }

    // P1: unverifiable references yield false with zero RPCs.
    #[tokio::test]
    async fn unverifiable_reference_short_circuits() {
        let directory = MockClusterDirectory::new();
        let segment = Segment::new(0);
        let reference = BlobReference::new();
        assert!(!verify(&directory, &segment, &reference).await);
    }

    // P2: a structurally invalid segment yields false with zero RPCs.
    #[tokio::test]
    async fn structurally_invalid_segment_short_circuits() {
        let directory = MockClusterDirectory::new();
        let mut segment = Segment::new(0);
        segment.write_length = Some(10);

        let reference = BlobReference {
            volume_id: Some("v1".into()),
            position: Some(1),
            ..Default::default()
        };

        assert!(!verify(&directory, &segment, &reference).await);
    }

    // S3: an unresolved volume yields false without an RPC.
    #[tokio::test]
    async fn unresolved_volume_yields_false() {
        let directory = MockClusterDirectory::new();
        let digest = Digest::sha512_of(b"payload");
        let (segment, reference) = matching_segment_and_reference(digest, 7);

        assert!(!verify(&directory, &segment, &reference).await);
    }

    // S1: all six equalities hold simultaneously.
    #[tokio::test]
    async fn verifies_true_when_all_equalities_hold() {
        let digest = Digest::sha512_of(b"payload");
        let (segment, reference) = matching_segment_and_reference(digest.clone(), 7);

        let blob = DigestBlob::new(42, 7).with_digest(DigestAlgo::Sha512, digest);
        let node: Arc<dyn NodeClient> = Arc::new(MockNodeClient::new().with_blob("v1", 42, blob));
        let directory = MockClusterDirectory::new().with_node("v1", node);

        assert!(verify(&directory, &segment, &reference).await);
    }

    // S2: a read-length mismatch yields false, no error.
    #[tokio::test]
    async fn length_mismatch_on_read_side_yields_false() {
        let digest = Digest::sha512_of(b"payload");
        let (segment, mut reference) = matching_segment_and_reference(digest.clone(), 7);
        reference.read_length = Some(6);

        let blob = DigestBlob::new(42, 7).with_digest(DigestAlgo::Sha512, digest);
        let node: Arc<dyn NodeClient> = Arc::new(MockNodeClient::new().with_blob("v1", 42, blob));
        let directory = MockClusterDirectory::new().with_node("v1", node);

        assert!(!verify(&directory, &segment, &reference).await);
    }

    // P3: digest-only match is not enough — no partial credit.
    #[tokio::test]
    async fn digest_match_alone_is_not_sufficient() {
        let digest = Digest::sha512_of(b"payload");
        let (segment, mut reference) = matching_segment_and_reference(digest.clone(), 7);
        reference.read_length = Some(999);

        let blob = DigestBlob::new(42, 7).with_digest(DigestAlgo::Sha512, digest);
        let node: Arc<dyn NodeClient> = Arc::new(MockNodeClient::new().with_blob("v1", 42, blob));
        let directory = MockClusterDirectory::new().with_node("v1", node);

        assert!(!verify(&directory, &segment, &reference).await);
    }

    // Missing blob at the coordinate: null/absent checksum yields false.
    #[tokio::test]
    async fn missing_blob_yields_false() {
        let digest = Digest::sha512_of(b"payload");
        let (segment, reference) = matching_segment_and_reference(digest, 7);

        let node: Arc<dyn NodeClient> = Arc::new(MockNodeClient::new());
        let directory = MockClusterDirectory::new().with_node("v1", node);

        assert!(!verify(&directory, &segment, &reference).await);
    }

    // Transport errors from the directory are logged and mapped to false,
    // never propagated — verification is best-effort (spec §7).
    #[tokio::test]
    async fn directory_error_is_downgraded_to_false() {
        let digest = Digest::sha512_of(b"payload");
        let (segment, reference) = matching_segment_and_reference(digest, 7);
        let directory = MockClusterDirectory::new().failing("boom");
        assert!(!verify(&directory, &segment, &reference).await);
    }

    // Transport errors from the node RPC are likewise downgraded.
    #[tokio::test]
    async fn node_rpc_error_is_downgraded_to_false() {
        let digest = Digest::sha512_of(b"payload");
        let (segment, reference) = matching_segment_and_reference(digest, 7);

        let node: Arc<dyn NodeClient> = Arc::new(MockNodeClient::new().failing("transport error"));
        let directory = MockClusterDirectory::new().with_node("v1", node);

        assert!(!verify(&directory, &segment, &reference).await);
    }
}

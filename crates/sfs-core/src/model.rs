//! The Object → Version → Segment → BlobReference entity tree (spec §3).
//!
//! Parent back-links in the source are upward pointers (`segment.parent.parent`);
//! here a [`BlobReferencePath`] identifies a reference by coordinates instead,
//! so the tree stays a plain ownership tree with no cycles (see design note
//! on nested back-links).

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(deny_unknown_fields)]
pub struct ObjectId {
    pub account_id: String,
    pub container_id: String,
    pub object_id: String,
}

/// A single replica coordinate: `(volumeId, position)` plus the integrity
/// fields recorded when it was last read back.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BlobReference {
    pub volume_id: Option<String>,
    pub position: Option<u64>,
    pub read_sha512: Option<Digest>,
    pub read_length: Option<u64>,
    pub acknowledged: bool,
}

impl BlobReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// I1: a reference is verifiable only once both coordinates are known.
    pub fn is_verifiable(&self) -> bool {
        self.volume_id.is_some() && self.position.is_some()
    }
}

/// A contiguous byte range of a version, with its expected write-time
/// integrity and the replicas (`BlobReference`s) that carry it.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    pub index: u32,
    pub write_sha512: Option<Digest>,
    pub write_length: Option<u64>,
    pub references: Vec<BlobReference>,
}

impl Segment {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// I2: a recorded write length with no write digest is a structurally
    /// invalid segment — no reference under it can ever verify.
    pub fn is_structurally_valid(&self) -> bool {
        !(self.write_length.is_some() && self.write_sha512.is_none())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Version {
    pub version_id: u64,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Object {
    pub id: ObjectId,
    pub versions: Vec<Version>,
}

/// Coordinates of one blob reference within an object's version tree,
/// used to label a reference without the owning tree holding upward
/// pointers back to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlobReferencePath {
    pub object: ObjectId,
    pub version_id: u64,
    pub segment_index: u32,
    pub reference_index: usize,
}

impl Object {
    /// Walks every blob reference reachable from this object, pairing each
    /// with the path used to address it and the segment that owns it.
    pub fn iter_references(&self) -> impl Iterator<Item = (BlobReferencePath, &Segment, &BlobReference)> {
        self.versions.iter().flat_map(move |version| {
            let object_id = self.id.clone();
            let version_id = version.version_id;
            version.segments.iter().flat_map(move |segment| {
                let object_id = object_id.clone();
                segment
                    .references
                    .iter()
                    .enumerate()
                    .map(move |(reference_index, reference)| {
                        let path = BlobReferencePath {
                            object: object_id.clone(),
                            version_id,
                            segment_index: segment.index,
                            reference_index,
                        };
                        (path, segment, reference)
                    })
            })
        })
    }
}

/// Whether a volume is the primary or a replica target on an advertising
/// node, as carried in a service-def document.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolumeRole {
    Primary,
    Replica,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VolumeAdvertisement {
    pub volume_id: String,
    pub role: VolumeRole,
}

/// The document a node periodically publishes to the metadata store,
/// advertising which volumes it currently hosts (spec §3 "Lifecycles":
/// "the cluster directory is populated from service-def documents").
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServiceDef {
    pub node_id: String,
    pub endpoint: String,
    pub volumes: Vec<VolumeAdvertisement>,
    #[serde(with = "crate::timestamp_nanos")]
    pub advertised_at: time::OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_verifiable_requires_both_coordinates() {
        let mut r = BlobReference::new();
        assert!(!r.is_verifiable());
        r.volume_id = Some("v1".into());
        assert!(!r.is_verifiable());
        r.position = Some(42);
        assert!(r.is_verifiable());
    }

    #[test]
    fn segment_structurally_invalid_on_length_without_digest() {
        let mut s = Segment::new(0);
        assert!(s.is_structurally_valid());
        s.write_length = Some(100);
        assert!(!s.is_structurally_valid());
        s.write_sha512 = Some(Digest::sha512_of(b"x"));
        assert!(s.is_structurally_valid());
    }

    #[test]
    fn iter_references_walks_full_tree() {
        let mut seg0 = Segment::new(0);
        seg0.references.push(BlobReference::new());
        seg0.references.push(BlobReference::new());

        let mut seg1 = Segment::new(1);
        seg1.references.push(BlobReference::new());

        let version = Version {
            version_id: 1,
            segments: vec![seg0, seg1],
        };

        let object = Object {
            id: ObjectId {
                account_id: "a".into(),
                container_id: "c".into(),
                object_id: "o".into(),
            },
            versions: vec![version],
        };

        let refs: Vec<_> = object.iter_references().collect();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].0.segment_index, 0);
        assert_eq!(refs[2].0.segment_index, 1);
    }
}

//! Domain model and core trait ports shared by the cluster directory,
//! remote node client, and verification layers.

mod digest;
mod model;
mod timestamp_nanos;
mod traits;

pub use digest::{Digest, DigestAlgo, DigestBlob};
pub use model::{
    BlobReference, BlobReferencePath, Object, ObjectId, Segment, ServiceDef, Version,
    VolumeAdvertisement, VolumeRole,
};
pub use traits::{ClusterDirectory, NodeClient};

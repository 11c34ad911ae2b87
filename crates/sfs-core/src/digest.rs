//! Cryptographic digests and the transient `DigestBlob` returned by a
//! remote checksum RPC (spec §3, §4.4, §6).

use std::collections::HashMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha512};

/// The digest algorithm identifier carried on a checksum request.
///
/// `SHA-512` is the only algorithm required by the core spec; the enum
/// exists so a second algorithm can be added without touching callers.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlgo {
    Sha512,
}

impl DigestAlgo {
    /// The canonical byte length of a digest produced under this algorithm.
    pub fn canonical_length(self) -> usize {
        match self {
            DigestAlgo::Sha512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgo::Sha512 => write!(f, "SHA-512"),
        }
    }
}

/// A fixed-length cryptographic digest, serialized as lowercase hex on the
/// wire (JSON has no native byte-string type).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Wraps raw digest bytes, rejecting lengths that don't match `algo`.
    pub fn from_bytes(algo: DigestAlgo, bytes: Vec<u8>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            bytes.len() == algo.canonical_length(),
            "{algo} digest must be {} bytes, got {}",
            algo.canonical_length(),
            bytes.len()
        );
        Ok(Self(bytes))
    }

    /// Computes the SHA-512 digest of `data`.
    pub fn sha512_of(data: &[u8]) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(data);
        Self(hasher.finalize().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex::encode(&self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(&encoded).map_err(D::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// The `(position, length, digest)` triple a peer node returns for a
/// checksum RPC (spec §3 "DigestBlob", §4.4).
#[derive(Clone, Debug, Default)]
pub struct DigestBlob {
    position: u64,
    length: u64,
    digests: HashMap<DigestAlgo, Digest>,
}

impl DigestBlob {
    pub fn new(position: u64, length: u64) -> Self {
        Self {
            position,
            length,
            digests: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_digest(mut self, algo: DigestAlgo, digest: Digest) -> Self {
        self.digests.insert(algo, digest);
        self
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Returns the digest computed under `algo`, or `None` if this blob
    /// wasn't hashed with that algorithm.
    pub fn digest(&self, algo: DigestAlgo) -> Option<&Digest> {
        self.digests.get(&algo)
    }
}

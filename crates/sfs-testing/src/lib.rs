//! Shared test fixtures: in-memory mocks of C3 (`ClusterDirectory`) and
//! C4 (`NodeClient`), used by `sfs-verify` and `bin/sfsd` tests instead
//! of standing up a real cluster directory or peer node.

pub mod fixtures;

pub use fixtures::{MockClusterDirectory, MockNodeClient};

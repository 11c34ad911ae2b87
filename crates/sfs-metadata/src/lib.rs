//! External indexed document store client (C1), index catalog (C2), and
//! request envelope (C7) — spec §4.1, §4.2, §4.7.

pub mod catalog;
pub mod config;
pub mod envelope;
pub mod error;
pub mod mappings;
pub mod store;

pub use config::{MetadataStoreConfig, Timeouts};
pub use error::MetadataError;
pub use store::{MetadataStore, NOT_SET};

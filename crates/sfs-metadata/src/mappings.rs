//! Packaged mapping documents for the fixed indices (spec §4.1). Loaded
//! once and parsed lazily, the same way `sfs-std` caches its mimetype
//! table.

use once_cell::sync::Lazy;
use serde_json::Value;

macro_rules! packaged_mapping {
    ($name:ident, $path:literal) => {
        static $name: Lazy<Value> = Lazy::new(|| {
            serde_json::from_str(include_str!($path))
                // We're ok with panicking here, this can only happen if we ship invalid JSON.
                .unwrap_or_else(|e| panic!("invalid packaged mapping {}: {}", $path, e))
        });
    };
}

packaged_mapping!(ACCOUNT, "data/account-mapping.json");
packaged_mapping!(CONTAINER, "data/container-mapping.json");
packaged_mapping!(CONTAINER_KEY, "data/container-key-mapping.json");
packaged_mapping!(MASTER_KEY, "data/master-key-mapping.json");
packaged_mapping!(SERVICE_DEF, "data/service-def-mapping.json");
packaged_mapping!(OBJECT, "data/object-mapping.json");

pub fn account() -> Value {
    ACCOUNT.clone()
}

pub fn container() -> Value {
    CONTAINER.clone()
}

pub fn container_key() -> Value {
    CONTAINER_KEY.clone()
}

pub fn master_key() -> Value {
    MASTER_KEY.clone()
}

pub fn service_def() -> Value {
    SERVICE_DEF.clone()
}

/// Mapping applied to a per-container object index created via
/// `IndexCatalog::object`.
pub fn object() -> Value {
    OBJECT.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaged_mappings_parse() {
        assert!(account().is_object());
        assert!(container().is_object());
        assert!(container_key().is_object());
        assert!(master_key().is_object());
        assert!(service_def().is_object());
        assert!(object().is_object());
    }
}

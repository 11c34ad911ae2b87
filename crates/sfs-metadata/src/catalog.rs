//! C2: the fixed set of logical indices and their naming rules. Pure
//! functions — no I/O, no state. The prefix is an external interface:
//! it appears in persisted document IDs, so it must never change without
//! a migration.

pub const PREFIX: &str = "sfs_v0_";

pub fn account() -> String {
    format!("{}account", PREFIX)
}

pub fn container() -> String {
    format!("{}container", PREFIX)
}

pub fn container_key() -> String {
    format!("{}container_key", PREFIX)
}

pub fn master_key() -> String {
    format!("{}master_key", PREFIX)
}

pub fn service_def() -> String {
    format!("{}service_def", PREFIX)
}

pub fn object(container: &str) -> String {
    format!("{}{}_objects", PREFIX, container)
}

/// P9: `isObjectIndex(n) ⇔ n.starts_with(prefix) ∧ n.ends_with("_objects")`.
pub fn is_object_index(name: &str) -> bool {
    name.starts_with(PREFIX) && name.ends_with("_objects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_indices_carry_the_prefix() {
        assert_eq!(account(), "sfs_v0_account");
        assert_eq!(container(), "sfs_v0_container");
        assert_eq!(container_key(), "sfs_v0_container_key");
        assert_eq!(master_key(), "sfs_v0_master_key");
        assert_eq!(service_def(), "sfs_v0_service_def");
    }

    #[test]
    fn object_index_is_named_after_its_container() {
        assert_eq!(object("photos"), "sfs_v0_photos_objects");
    }

    #[test]
    fn is_object_index_requires_prefix_and_suffix() {
        assert!(is_object_index("sfs_v0_photos_objects"));
        assert!(!is_object_index("sfs_v0_account"));
        assert!(!is_object_index("other_photos_objects"));
        assert!(!is_object_index("sfs_v0_photos_objectsx"));
    }
}

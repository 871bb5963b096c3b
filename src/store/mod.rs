//! Entitetslagring ovanpå nyckel-värde-lagringen

pub mod entity_store;
pub mod merge;

pub use entity_store::EntityStore;
pub use merge::{find_by_key, merge, merge_by, normalize_key};

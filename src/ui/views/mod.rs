pub mod entity_table;
pub mod permissions;

pub use entity_table::EntityTableView;
pub use permissions::PermissionsView;

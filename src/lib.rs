//! Byggdesk - administration av byggprojekt
//!
//! Projekt, delprojekt, roller, behörigheter, företag och användare lagras
//! som JSON under fasta nycklar i SQLite. Ändringar sprids till alla vyer,
//! även mellan processer som delar databasfil.

pub mod db;
pub mod models;
pub mod services;
pub mod store;
pub mod sync;
pub mod ui;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
pub use sync::{ChangeBus, ChangeEvent, Origin, Topic};
pub use ui::AppState;
pub use utils::{AppError, AppResult};

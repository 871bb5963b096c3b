//! Synk mellan vyer: ändringskanal och bevakning av andra anslutningar

pub mod bus;
pub mod watcher;

pub use bus::{ChangeBus, ChangeEvent, Origin, Subscription, Topic};
pub use watcher::{ExternalWatcher, DEFAULT_POLL_INTERVAL};

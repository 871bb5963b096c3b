//! Vyer och vytillstånd
//!
//! Vyerna är fria från rendering: de håller data, tabelltillstånd och
//! prenumerationer och används av kommandoraden och testerna.

pub mod state;
pub mod table;
pub mod views;

pub use state::{AppState, StatusMessage, StatusType};
pub use table::{Cell, Column, PageSize, PageView, SortDirection, SortState, TableRow, TableState};
pub use views::{EntityTableView, PermissionsView};

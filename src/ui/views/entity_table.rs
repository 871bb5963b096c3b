use std::path::Path;

use tracing::debug;

use crate::db::Database;
use crate::models::Entity;
use crate::services::{ExportResult, ExportService};
use crate::sync::Subscription;
use crate::ui::table::{PageSize, PageView, TableRow, TableState};
use crate::utils::AppResult;

/// Tabellvy över en posttyp
///
/// Håller en sammanslagen kopia av samlingen och lyssnar på dess ämne.
/// Prenumerationen avslutas när vyn släpps.
pub struct EntityTableView<T> {
    db: Database,
    subscription: Subscription,
    /// Cache
    rows: Vec<T>,
    table: TableState,
}

impl<T: Entity + TableRow> EntityTableView<T> {
    pub fn new(db: &Database, page_size: PageSize) -> AppResult<Self> {
        let mut view = Self {
            db: db.clone(),
            subscription: db.subscribe(&[T::TOPIC]),
            rows: Vec::new(),
            table: TableState::new(page_size),
        };
        view.reload()?;
        Ok(view)
    }

    /// Läs om samlingen. Flera anrop i rad ger samma resultat.
    pub fn reload(&mut self) -> AppResult<()> {
        self.rows = self.db.store::<T>().load_merged()?;
        let total = self.filtered().len();
        self.table.clamp_page(total);
        debug!("Läste om {} ({} poster)", T::KEY, self.rows.len());
        Ok(())
    }

    /// Hantera väntande ändringar. Returnerar true om vyn lästes om.
    pub fn sync(&mut self) -> AppResult<bool> {
        let events = self.subscription.drain();
        if events.is_empty() {
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }

    /// Alla poster, standardposter först
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn set_query(&mut self, query: &str) {
        self.table.set_query(query);
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.table.toggle_sort(column);
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.table.set_page_size(page_size);
    }

    pub fn set_page(&mut self, page: usize) {
        let total = self.filtered().len();
        self.table.set_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.filtered().len();
        self.table.next_page(total);
    }

    pub fn prev_page(&mut self) {
        let total = self.filtered().len();
        self.table.prev_page(total);
    }

    /// Filtrerade och sorterade poster, alla sidor
    pub fn filtered(&self) -> Vec<&T> {
        self.table.apply(&self.rows)
    }

    /// Aktuell sida
    pub fn page(&self) -> PageView<'_, T> {
        self.table.page_of(&self.rows)
    }

    /// Exportera det som visas (alla sidor) som CSV
    pub fn export_csv(&self, dir: &Path) -> AppResult<ExportResult> {
        ExportService::export_to_dir(&self.filtered(), T::KEY, dir)
    }
}

//! CSV-export av tabeller
//!
//! Exporterar de rader en tabell visar (filtrerade och sorterade, alla
//! sidor). Alla fält citeras, radslut är CRLF och filen börjar med BOM så
//! att Excel läser UTF-8 korrekt.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::ui::table::TableRow;
use crate::utils::date::today;
use crate::utils::path::sanitize_filename;
use crate::utils::AppResult;

const BOM: &str = "\u{feff}";
const LINE_END: &str = "\r\n";

/// Resultat av export
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub path: PathBuf,
    pub row_count: usize,
    pub file_size: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "Exporterade {} rader till {} ({} byte)",
            self.row_count,
            self.path.display(),
            self.file_size
        )
    }
}

pub struct ExportService;

impl ExportService {
    /// Filnamn på formen `<prefix>_<ÅÅÅÅ-MM-DD>.csv`
    pub fn generate_filename(prefix: &str) -> String {
        format!("{}_{}.csv", sanitize_filename(prefix), today())
    }

    /// Bygg CSV-innehåll med rubrikrad från tabellens kolumner
    pub fn to_csv<T: TableRow>(rows: &[&T]) -> String {
        let columns = T::columns();
        let mut csv = String::from(BOM);

        let header: Vec<String> = columns.iter().map(|c| Self::csv_escape(c.title)).collect();
        csv.push_str(&header.join(","));
        csv.push_str(LINE_END);

        for row in rows {
            let fields: Vec<String> = columns
                .iter()
                .map(|c| Self::csv_escape(&row.cell(c.id).display()))
                .collect();
            csv.push_str(&fields.join(","));
            csv.push_str(LINE_END);
        }

        csv
    }

    /// Skriv rader till `<dir>/<prefix>_<datum>.csv`
    pub fn export_to_dir<T: TableRow>(
        rows: &[&T],
        prefix: &str,
        dir: &Path,
    ) -> AppResult<ExportResult> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::generate_filename(prefix));
        Self::export_to_file(rows, &path)
    }

    pub fn export_to_file<T: TableRow>(rows: &[&T], path: &Path) -> AppResult<ExportResult> {
        let content = Self::to_csv(rows);
        std::fs::write(path, &content)?;

        let result = ExportResult {
            path: path.to_path_buf(),
            row_count: rows.len(),
            file_size: content.len(),
        };
        info!("{}", result.summary());
        Ok(result)
    }

    /// Citera alltid, dubbla inbäddade citattecken
    fn csv_escape(value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

use serde::{Deserialize, Serialize};

use super::{required, Entity};
use crate::sync::Topic;
use crate::ui::table::{Cell, Column, TableRow};
use crate::utils::AppResult;

/// Delprojekt, refererar projektet via namn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subproject {
    pub id: String,
    pub name: String,
    /// Projektets namn (inte id)
    pub project: String,
}

impl Subproject {
    pub fn new(id: String, name: &str, project: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            project: project.trim().to_string(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "Delprojektets namn")?;
        required(&self.project, "Projekt")?;
        Ok(())
    }
}

impl Entity for Subproject {
    const KEY: &'static str = "subprojects";
    const TOPIC: Topic = Topic::Subprojects;
    const LABEL: &'static str = "delprojekt";

    fn id(&self) -> &str {
        &self.id
    }

    /// Samma namn får finnas i olika projekt
    fn natural_key(&self) -> String {
        format!("{}\u{1f}{}", self.project, self.name)
    }

    fn seeds() -> Vec<Self> {
        vec![
            Subproject::new("1".into(), "Grundläggning", "Kvarteret Ekorren"),
            Subproject::new("2".into(), "Stomme", "Kvarteret Ekorren"),
            Subproject::new("3".into(), "Markarbeten", "Hamnpiren etapp 2"),
        ]
    }
}

const COLUMNS: &[Column] = &[
    Column::new("name", "Delprojekt", true),
    Column::new("project", "Projekt", true),
];

impl TableRow for Subproject {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "name" => Cell::text(&self.name),
            "project" => Cell::text(&self.project),
            _ => Cell::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_includes_project() {
        let a = Subproject::new("10".into(), "Stomme", "Lakeshire");
        let b = Subproject::new("11".into(), "Stomme", "Kvarteret Ekorren");
        assert_ne!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_validate() {
        assert!(Subproject::new("10".into(), "Tak", "Lakeshire").validate().is_ok());
        assert!(Subproject::new("10".into(), "Tak", "").validate().is_err());
    }
}

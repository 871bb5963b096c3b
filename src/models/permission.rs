use serde::{Deserialize, Serialize};

use super::{required, Entity};
use crate::sync::Topic;
use crate::ui::table::{Cell, Column, TableRow};
use crate::utils::AppResult;

/// Behörighet för en användare i ett projekt
///
/// Projekt och användare refereras via namn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPermission {
    pub id: String,
    pub project: String,
    pub assigned_user: String,
    /// Befattning i projektet
    pub designation: String,
}

impl ProjectPermission {
    pub fn new(id: String, project: &str, assigned_user: &str, designation: &str) -> Self {
        Self {
            id,
            project: project.trim().to_string(),
            assigned_user: assigned_user.trim().to_string(),
            designation: designation.trim().to_string(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        required(&self.project, "Projekt")?;
        required(&self.assigned_user, "Användare")?;
        required(&self.designation, "Befattning")?;
        Ok(())
    }

    /// Samma projekt och användare, utan hänsyn till versaler
    pub fn same_pair(&self, project: &str, user: &str) -> bool {
        let same = |a: &str, b: &str| a.trim().to_lowercase() == b.trim().to_lowercase();
        same(&self.project, project) && same(&self.assigned_user, user)
    }
}

impl Entity for ProjectPermission {
    const KEY: &'static str = "projectPermissions";
    const TOPIC: Topic = Topic::Permissions;
    const LABEL: &'static str = "behörighet";

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        format!("{}\u{1f}{}", self.project, self.assigned_user)
    }

    fn seeds() -> Vec<Self> {
        vec![
            ProjectPermission::new("1".into(), "Kvarteret Ekorren", "Anna Lind", "Projektledare"),
            ProjectPermission::new("2".into(), "Kvarteret Ekorren", "Erik Berg", "Platschef"),
        ]
    }
}

const COLUMNS: &[Column] = &[
    Column::new("project", "Projekt", true),
    Column::new("assignedUser", "Användare", true),
    Column::new("designation", "Befattning", true),
];

impl TableRow for ProjectPermission {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "project" => Cell::text(&self.project),
            "assignedUser" => Cell::text(&self.assigned_user),
            "designation" => Cell::text(&self.designation),
            _ => Cell::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_pair_ignores_case() {
        let p = ProjectPermission::new("10".into(), "Lakeshire", "test", "Snickare");
        assert!(p.same_pair("lakeshire", "TEST"));
        assert!(!p.same_pair("Lakeshire", "test2"));
    }

    #[test]
    fn test_json_field_names() {
        let p = ProjectPermission::new("10".into(), "Lakeshire", "test", "Snickare");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["assignedUser"], "test");
    }
}

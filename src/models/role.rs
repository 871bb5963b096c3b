use serde::{Deserialize, Serialize};

use super::{required, Entity};
use crate::sync::Topic;
use crate::ui::table::{Cell, Column, TableRow};
use crate::utils::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    /// Systemroller kan inte tas bort
    #[serde(default)]
    pub is_system_role: bool,
}

impl Role {
    pub fn new(id: String, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            is_system_role: false,
        }
    }

    fn system(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            is_system_role: true,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "Rollnamn")
    }
}

impl Entity for Role {
    const KEY: &'static str = "userRoles";
    const TOPIC: Topic = Topic::Roles;
    const LABEL: &'static str = "roll";

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        self.name.clone()
    }

    fn seeds() -> Vec<Self> {
        vec![
            Role::system("1", "Administratör"),
            Role::system("2", "Projektledare"),
            Role::system("3", "Platschef"),
            Role::system("4", "Arbetsledare"),
        ]
    }
}

const COLUMNS: &[Column] = &[
    Column::new("name", "Roll", true),
    Column::new("type", "Typ", false),
];

impl TableRow for Role {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "name" => Cell::text(&self.name),
            "type" => Cell::text(if self.is_system_role { "System" } else { "Egen" }),
            _ => Cell::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_are_system_roles() {
        assert!(Role::seeds().iter().all(|r| r.is_system_role));
    }

    #[test]
    fn test_json_field_names() {
        let role = Role::new("99".into(), " Kalkylator ");
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, r#"{"id":"99","name":"Kalkylator","isSystemRole":false}"#);
    }
}

use serde::{Deserialize, Serialize};

use super::{required, Entity};
use crate::sync::Topic;
use crate::ui::table::{Cell, Column, TableRow};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// Användare i teamhanteringen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamUser {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Rollens namn
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: UserStatus,
}

impl TeamUser {
    pub fn new(id: String, name: &str, email: &str, role: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role: role.trim().to_string(),
            status: UserStatus::default(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "Namn")?;
        required(&self.email, "E-post")?;

        let valid_email = match self.email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        };
        if !valid_email {
            return Err(AppError::validation(format!(
                "Ogiltig e-postadress: {}",
                self.email
            )));
        }

        Ok(())
    }
}

impl Entity for TeamUser {
    const KEY: &'static str = "manageTeamsUsers";
    const TOPIC: Topic = Topic::Users;
    const LABEL: &'static str = "användare";

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        self.email.clone()
    }

    fn seeds() -> Vec<Self> {
        vec![
            TeamUser::new("1".into(), "Anna Lind", "anna.lind@byggdesk.se", "Projektledare"),
            TeamUser::new("2".into(), "Erik Berg", "erik.berg@byggdesk.se", "Platschef"),
        ]
    }
}

const COLUMNS: &[Column] = &[
    Column::new("name", "Namn", true),
    Column::new("email", "E-post", true),
    Column::new("role", "Roll", true),
    Column::new("status", "Status", false),
];

impl TableRow for TeamUser {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "name" => Cell::text(&self.name),
            "email" => Cell::text(&self.email),
            "role" => Cell::text(&self.role),
            "status" => Cell::text(match self.status {
                UserStatus::Active => "Aktiv",
                UserStatus::Inactive => "Inaktiv",
            }),
            _ => Cell::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(TeamUser::new("9".into(), "Test", "test@bygg.se", "").validate().is_ok());
        assert!(TeamUser::new("9".into(), "Test", "test", "").validate().is_err());
        assert!(TeamUser::new("9".into(), "Test", "@bygg.se", "").validate().is_err());
        assert!(TeamUser::new("9".into(), "Test", "test@localhost", "").validate().is_err());
    }

    #[test]
    fn test_email_is_normalized() {
        let user = TeamUser::new("9".into(), "Test", " Test@Bygg.SE ", "");
        assert_eq!(user.email, "test@bygg.se");
    }
}

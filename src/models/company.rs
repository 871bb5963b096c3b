use serde::{Deserialize, Serialize};

use super::{required, Entity};
use crate::sync::Topic;
use crate::ui::table::{Cell, Column, TableRow};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
}

impl CompanyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Aktiv",
            Self::Inactive => "Inaktiv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub address: String,
    /// Organisationsnummer
    #[serde(default)]
    pub registration_no: String,
    /// Logotyp som data-URL ("data:image/png;base64,...")
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub status: CompanyStatus,
    /// Antal projekt
    #[serde(default)]
    pub projects: u32,
    /// Antal anställda
    #[serde(default)]
    pub employees: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Company {
    pub fn new(id: String, name: &str, code: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            code: code.trim().to_string(),
            address: String::new(),
            registration_no: String::new(),
            logo: None,
            status: CompanyStatus::default(),
            projects: 0,
            employees: 0,
            created_at: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "Företagsnamn")?;
        required(&self.code, "Företagskod")?;

        if let Some(logo) = &self.logo {
            if !logo.starts_with("data:image/") {
                return Err(AppError::validation(
                    "Logotypen måste vara en bild (data:image/...)",
                ));
            }
        }

        Ok(())
    }
}

impl Entity for Company {
    const KEY: &'static str = "companies";
    const TOPIC: Topic = Topic::Companies;
    const LABEL: &'static str = "företag";

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        self.name.clone()
    }

    fn seeds() -> Vec<Self> {
        vec![
            Company {
                address: "Kungsgatan 12, 753 21 Uppsala".into(),
                registration_no: "556677-8899".into(),
                projects: 1,
                employees: 48,
                created_at: Some("2023-01-10T08:00:00Z".into()),
                ..Company::new("1".into(), "Byggbolaget Nord AB", "BNA")
            },
            Company {
                address: "Hamngatan 3, 211 22 Malmö".into(),
                registration_no: "556123-4567".into(),
                projects: 1,
                employees: 23,
                created_at: Some("2023-06-01T08:00:00Z".into()),
                ..Company::new("2".into(), "Sydbygg Entreprenad AB", "SEA")
            },
        ]
    }
}

const COLUMNS: &[Column] = &[
    Column::new("name", "Företag", true),
    Column::new("code", "Kod", true),
    Column::new("registrationNo", "Org.nr", true),
    Column::new("address", "Adress", true),
    Column::new("status", "Status", true),
    Column::new("projects", "Projekt", false),
    Column::new("employees", "Anställda", false),
];

impl TableRow for Company {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "name" => Cell::text(&self.name),
            "code" => Cell::text(&self.code),
            "registrationNo" => Cell::text(&self.registration_no),
            "address" => Cell::text(&self.address),
            "status" => Cell::text(self.status.label()),
            "projects" => Cell::Number(f64::from(self.projects)),
            "employees" => Cell::Number(f64::from(self.employees)),
            _ => Cell::Empty,
        }
    }
}

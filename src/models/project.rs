use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{required, Entity};
use crate::sync::Topic;
use crate::ui::table::{Cell, Column, TableRow};
use crate::utils::date::{format_date, format_period};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planering",
            Self::Active => "Pågående",
            Self::OnHold => "Pausad",
            Self::Completed => "Avslutad",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Planning, Self::Active, Self::OnHold, Self::Completed]
    }

    /// Tolka både lagrat värde och svensk etikett
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::all().iter().copied().find(|status| {
            status.label().to_lowercase() == s || status.to_string().to_lowercase() == s
        })
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::Active => write!(f, "Active"),
            Self::OnHold => write!(f, "On Hold"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub code: String,
    /// Företagets namn
    pub company: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Färdigställandegrad i procent
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub location: String,
}

impl Project {
    pub fn new(id: String, name: &str, code: &str, company: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            code: code.trim().to_string(),
            company: company.trim().to_string(),
            start_date: None,
            end_date: None,
            status: ProjectStatus::default(),
            progress: 0,
            location: String::new(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "Projektnamn")?;
        required(&self.code, "Projektkod")?;
        required(&self.company, "Företag")?;

        if self.progress > 100 {
            return Err(AppError::validation(format!(
                "Framsteg måste vara 0-100 %, fick {}",
                self.progress
            )));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(AppError::validation(format!(
                    "Slutdatum {} är före startdatum {}",
                    format_date(end),
                    format_date(start)
                )));
            }
        }

        Ok(())
    }

    pub fn period(&self) -> String {
        format_period(self.start_date, self.end_date)
    }
}

impl Entity for Project {
    const KEY: &'static str = "projects";
    const TOPIC: Topic = Topic::Projects;
    const LABEL: &'static str = "projekt";

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        self.name.clone()
    }

    fn seeds() -> Vec<Self> {
        vec![
            Project {
                start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                end_date: NaiveDate::from_ymd_opt(2025, 12, 15),
                status: ProjectStatus::Active,
                progress: 45,
                location: "Uppsala".into(),
                ..Project::new("1".into(), "Kvarteret Ekorren", "P-1001", "Byggbolaget Nord AB")
            },
            Project {
                start_date: NaiveDate::from_ymd_opt(2024, 9, 1),
                end_date: NaiveDate::from_ymd_opt(2026, 6, 30),
                status: ProjectStatus::Planning,
                progress: 5,
                location: "Malmö".into(),
                ..Project::new("2".into(), "Hamnpiren etapp 2", "P-1002", "Sydbygg Entreprenad AB")
            },
        ]
    }
}

const COLUMNS: &[Column] = &[
    Column::new("name", "Projektnamn", true),
    Column::new("code", "Kod", true),
    Column::new("company", "Företag", true),
    Column::new("period", "Period", false),
    Column::new("status", "Status", true),
    Column::new("progress", "Framsteg", false),
    Column::new("location", "Plats", true),
];

impl TableRow for Project {
    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "name" => Cell::text(&self.name),
            "code" => Cell::text(&self.code),
            "company" => Cell::text(&self.company),
            "period" => Cell::text(self.period()),
            "status" => Cell::text(self.status.label()),
            "progress" => Cell::Number(f64::from(self.progress)),
            "location" => Cell::text(&self.location),
            _ => Cell::Empty,
        }
    }
}

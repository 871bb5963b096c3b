use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::db::Database;
use crate::models::{Company, CompanyStatus};
use crate::store::normalize_key;
use crate::utils::id::new_id;
use crate::utils::{AppError, AppResult};

pub struct CompanyService<'a> {
    db: &'a Database,
}

impl<'a> CompanyService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<Company>> {
        self.db.store::<Company>().load_merged()
    }

    /// Skapa företag. Sätter id och skapandetid.
    pub fn create(&self, company: &mut Company) -> AppResult<String> {
        if company.id.is_empty() {
            company.id = new_id();
        }
        if company.created_at.is_none() {
            company.created_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        company.validate()?;

        let candidate = company.clone();
        self.db.store::<Company>().mutate(|current, seeds| {
            for existing in seeds.iter().chain(current.iter()) {
                if normalize_key(&existing.name) == normalize_key(&candidate.name) {
                    return Err(AppError::already_exists(format!(
                        "Företaget \"{}\" finns redan",
                        candidate.name
                    )));
                }
                if normalize_key(&existing.code) == normalize_key(&candidate.code) {
                    return Err(AppError::already_exists(format!(
                        "Företagskoden \"{}\" används redan av \"{}\"",
                        candidate.code, existing.name
                    )));
                }
            }
            current.push(candidate);
            Ok(())
        })?;

        info!("Skapade företag {} ({})", company.name, company.id);
        Ok(company.id.clone())
    }

    pub fn set_status(&self, id: &str, status: CompanyStatus) -> AppResult<Company> {
        self.db.store::<Company>().update_by_id(id, |c| {
            c.status = status;
            Ok(())
        })
    }

    /// Byt eller ta bort logotyp
    pub fn set_logo(&self, id: &str, logo: Option<String>) -> AppResult<Company> {
        self.db.store::<Company>().update_by_id(id, |c| {
            c.logo = logo;
            c.validate()
        })
    }

    pub fn delete(&self, id: &str) -> AppResult<Company> {
        let company = self.db.store::<Company>().remove_by_id(id)?;
        info!("Tog bort företag {}", company.name);
        Ok(company)
    }
}

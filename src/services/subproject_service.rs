use std::collections::HashSet;

use crate::db::Database;
use crate::models::{Entity, Project, Subproject};
use crate::store::{find_by_key, normalize_key};
use crate::utils::id::new_id;
use crate::utils::{AppError, AppResult};

pub struct SubprojectService<'a> {
    db: &'a Database,
}

impl<'a> SubprojectService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<Subproject>> {
        self.db.store::<Subproject>().load_merged()
    }

    pub fn for_project(&self, project: &str) -> AppResult<Vec<Subproject>> {
        let key = normalize_key(project);
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| normalize_key(&s.project) == key)
            .collect())
    }

    pub fn add(&self, subproject: &mut Subproject) -> AppResult<String> {
        if subproject.id.is_empty() {
            subproject.id = new_id();
        }
        subproject.validate()?;

        let projects = self.db.store::<Project>().load_merged()?;
        if find_by_key(&projects, &subproject.project).is_none() {
            return Err(AppError::validation(format!(
                "Projektet \"{}\" finns inte",
                subproject.project
            )));
        }

        let candidate = subproject.clone();
        self.db.store::<Subproject>().mutate(|current, seeds| {
            let key = normalize_key(&candidate.natural_key());
            if seeds
                .iter()
                .chain(current.iter())
                .any(|s| normalize_key(&s.natural_key()) == key)
            {
                return Err(AppError::already_exists(format!(
                    "Delprojektet \"{}\" finns redan i \"{}\"",
                    candidate.name, candidate.project
                )));
            }
            current.push(candidate);
            Ok(())
        })?;

        Ok(subproject.id.clone())
    }

    pub fn delete(&self, id: &str) -> AppResult<Subproject> {
        self.db.store::<Subproject>().remove_by_id(id)
    }

    /// Delprojekt vars projekt inte längre finns
    pub fn orphaned(&self) -> AppResult<Vec<Subproject>> {
        let projects: HashSet<String> = self
            .db
            .store::<Project>()
            .load_merged()?
            .iter()
            .map(|p| normalize_key(&p.name))
            .collect();

        Ok(self
            .list()?
            .into_iter()
            .filter(|s| !projects.contains(&normalize_key(&s.project)))
            .collect())
    }
}

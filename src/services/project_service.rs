//! Projekt: skapa, lista, statusändring och borttagning

use tracing::info;

use crate::db::Database;
use crate::models::{Company, Project, ProjectPermission, ProjectStatus, Subproject};
use crate::store::{find_by_key, normalize_key};
use crate::utils::id::new_id;
use crate::utils::{AppError, AppResult};

/// Resultat av borttagning
///
/// Behörigheter och delprojekt som pekade på projektet tas inte bort utan
/// blir föräldralösa; antalet rapporteras här.
#[derive(Debug, Clone)]
pub struct ProjectDeletion {
    pub project: Project,
    pub orphaned_permissions: usize,
    pub orphaned_subprojects: usize,
}

impl ProjectDeletion {
    pub fn summary(&self) -> String {
        if self.orphaned_permissions == 0 && self.orphaned_subprojects == 0 {
            format!("Projektet \"{}\" togs bort", self.project.name)
        } else {
            format!(
                "Projektet \"{}\" togs bort. {} behörigheter och {} delprojekt saknar nu projekt",
                self.project.name, self.orphaned_permissions, self.orphaned_subprojects
            )
        }
    }
}

pub struct ProjectService<'a> {
    db: &'a Database,
}

impl<'a> ProjectService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Standardprojekt följda av egna projekt
    pub fn list(&self) -> AppResult<Vec<Project>> {
        self.db.store::<Project>().load_merged()
    }

    /// Projektnamn för rullistor
    pub fn names(&self) -> AppResult<Vec<String>> {
        Ok(self.list()?.into_iter().map(|p| p.name).collect())
    }

    /// Skapa projekt. Tilldelar id om det saknas.
    pub fn create(&self, project: &mut Project) -> AppResult<String> {
        if project.id.is_empty() {
            project.id = new_id();
        }
        project.validate()?;

        let companies = self.db.store::<Company>().load_merged()?;
        if find_by_key(&companies, &project.company).is_none() {
            return Err(AppError::validation(format!(
                "Företaget \"{}\" finns inte",
                project.company
            )));
        }

        let candidate = project.clone();
        self.db.store::<Project>().mutate(|current, seeds| {
            for existing in seeds.iter().chain(current.iter()) {
                if normalize_key(&existing.name) == normalize_key(&candidate.name) {
                    return Err(AppError::already_exists(format!(
                        "Ett projekt med namnet \"{}\" finns redan",
                        candidate.name
                    )));
                }
                if normalize_key(&existing.code) == normalize_key(&candidate.code) {
                    return Err(AppError::already_exists(format!(
                        "Projektkoden \"{}\" används redan av \"{}\"",
                        candidate.code, existing.name
                    )));
                }
            }
            current.push(candidate);
            Ok(())
        })?;

        info!("Skapade projekt {} ({})", project.name, project.id);
        Ok(project.id.clone())
    }

    pub fn set_status(&self, id: &str, status: ProjectStatus) -> AppResult<Project> {
        self.db.store::<Project>().update_by_id(id, |p| {
            p.status = status;
            if status == ProjectStatus::Completed {
                p.progress = 100;
            }
            Ok(())
        })
    }

    pub fn set_progress(&self, id: &str, progress: u8) -> AppResult<Project> {
        self.db.store::<Project>().update_by_id(id, |p| {
            p.progress = progress;
            p.validate()
        })
    }

    /// Ta bort ett eget projekt. Standardprojekt är skyddade.
    pub fn delete(&self, id: &str) -> AppResult<ProjectDeletion> {
        let project = self.db.store::<Project>().remove_by_id(id)?;

        // Namnet kan fortfarande finnas om data skrivits förbi valideringen
        let still_exists = find_by_key(&self.list()?, &project.name).is_some();
        let key = normalize_key(&project.name);

        let (orphaned_permissions, orphaned_subprojects) = if still_exists {
            (0, 0)
        } else {
            let permissions = self
                .db
                .store::<ProjectPermission>()
                .load_merged()?
                .iter()
                .filter(|p| normalize_key(&p.project) == key)
                .count();
            let subprojects = self
                .db
                .store::<Subproject>()
                .load_merged()?
                .iter()
                .filter(|s| normalize_key(&s.project) == key)
                .count();
            (permissions, subprojects)
        };

        info!("Tog bort projekt {} ({})", project.name, project.id);
        Ok(ProjectDeletion {
            project,
            orphaned_permissions,
            orphaned_subprojects,
        })
    }
}

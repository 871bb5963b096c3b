//! Projektbehörigheter (projekt x användare)

use std::collections::HashSet;

use tracing::info;

use crate::db::Database;
use crate::models::{Project, ProjectPermission};
use crate::store::{find_by_key, normalize_key};
use crate::utils::id::new_id;
use crate::utils::{AppError, AppResult};

pub struct PermissionService<'a> {
    db: &'a Database,
}

impl<'a> PermissionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<ProjectPermission>> {
        self.db.store::<ProjectPermission>().load_merged()
    }

    pub fn for_project(&self, project: &str) -> AppResult<Vec<ProjectPermission>> {
        let key = normalize_key(project);
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| normalize_key(&p.project) == key)
            .collect())
    }

    /// Lägg till behörighet. Varje användare kan bara ha en per projekt.
    pub fn add(&self, permission: &mut ProjectPermission) -> AppResult<String> {
        if permission.id.is_empty() {
            permission.id = new_id();
        }
        permission.validate()?;

        let projects = self.db.store::<Project>().load_merged()?;
        if find_by_key(&projects, &permission.project).is_none() {
            return Err(AppError::validation(format!(
                "Projektet \"{}\" finns inte",
                permission.project
            )));
        }

        let candidate = permission.clone();
        self.db.store::<ProjectPermission>().mutate(|current, seeds| {
            let duplicate = seeds
                .iter()
                .chain(current.iter())
                .any(|p| p.same_pair(&candidate.project, &candidate.assigned_user));
            if duplicate {
                return Err(AppError::already_exists(format!(
                    "Användaren \"{}\" har redan en behörighet i projektet \"{}\"",
                    candidate.assigned_user, candidate.project
                )));
            }
            current.push(candidate);
            Ok(())
        })?;

        info!(
            "Gav {} behörighet i {} ({})",
            permission.assigned_user, permission.project, permission.designation
        );
        Ok(permission.id.clone())
    }

    pub fn delete(&self, id: &str) -> AppResult<ProjectPermission> {
        self.db.store::<ProjectPermission>().remove_by_id(id)
    }

    /// Behörigheter vars projekt inte längre finns
    pub fn orphaned(&self) -> AppResult<Vec<ProjectPermission>> {
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
            .filter(|p| !projects.contains(&normalize_key(&p.project)))
            .collect())
    }

    /// Ta bort föräldralösa behörigheter. Returnerar antal borttagna.
    pub fn remove_orphaned(&self) -> AppResult<usize> {
        let orphan_ids: HashSet<String> = self.orphaned()?.into_iter().map(|p| p.id).collect();
        let removed = self
            .db
            .store::<ProjectPermission>()
            .retain(|p| !orphan_ids.contains(&p.id))?;
        if removed > 0 {
            info!("Tog bort {} föräldralösa behörigheter", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ProjectService;

    fn setup() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let mut project = Project::new(String::new(), "Lakeshire", "L-100", "Byggbolaget Nord AB");
        let id = ProjectService::new(&db).create(&mut project).unwrap();
        (db, id)
    }

    fn permission(project: &str, user: &str) -> ProjectPermission {
        ProjectPermission::new(String::new(), project, user, "Snickare")
    }

    #[test]
    fn test_duplicate_pair_rejected_with_user_name() {
        let (db, _) = setup();
        let service = PermissionService::new(&db);

        service.add(&mut permission("Lakeshire", "test")).unwrap();
        let err = service.add(&mut permission("lakeshire", "Test")).unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists(_)));
        assert!(err.to_string().contains("\"Test\""));
        assert_eq!(service.for_project("Lakeshire").unwrap().len(), 1);
    }

    #[test]
    fn test_same_user_other_project_allowed() {
        let (db, _) = setup();
        let service = PermissionService::new(&db);

        service.add(&mut permission("Lakeshire", "test")).unwrap();
        service.add(&mut permission("Kvarteret Ekorren", "test")).unwrap();
        assert_eq!(db.store::<ProjectPermission>().load().unwrap().len(), 2);
    }

    #[test]
    fn test_seed_pair_is_duplicate() {
        let (db, _) = setup();
        let result = PermissionService::new(&db).add(&mut permission("Kvarteret Ekorren", "Anna Lind"));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_project_rejected() {
        let (db, _) = setup();
        let result = PermissionService::new(&db).add(&mut permission("Finns inte", "test"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let (db, _) = setup();
        let mut p = ProjectPermission::new(String::new(), "Lakeshire", "test", " ");
        assert!(PermissionService::new(&db).add(&mut p).is_err());
    }

    #[test]
    fn test_orphans_after_project_delete() {
        let (db, project_id) = setup();
        let service = PermissionService::new(&db);
        service.add(&mut permission("Lakeshire", "test")).unwrap();
        assert!(service.orphaned().unwrap().is_empty());

        ProjectService::new(&db).delete(&project_id).unwrap();

        let orphans = service.orphaned().unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].assigned_user, "test");

        assert_eq!(service.remove_orphaned().unwrap(), 1);
        assert!(service.orphaned().unwrap().is_empty());
        assert!(db.storage().get("projectPermissions").unwrap().is_none());
    }
}

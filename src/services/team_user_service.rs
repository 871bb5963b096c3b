use tracing::info;

use crate::db::Database;
use crate::models::{Role, TeamUser, UserStatus};
use crate::store::find_by_key;
use crate::utils::id::new_id;
use crate::utils::{AppError, AppResult};

pub struct TeamUserService<'a> {
    db: &'a Database,
}

impl<'a> TeamUserService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<TeamUser>> {
        self.db.store::<TeamUser>().load_merged()
    }

    /// Namn för användarlistan i behörighetsformuläret
    pub fn names(&self) -> AppResult<Vec<String>> {
        Ok(self.list()?.into_iter().map(|u| u.name).collect())
    }

    pub fn add(&self, user: &mut TeamUser) -> AppResult<String> {
        if user.id.is_empty() {
            user.id = new_id();
        }
        user.validate()?;

        if !user.role.is_empty() {
            let roles = self.db.store::<Role>().load_merged()?;
            if find_by_key(&roles, &user.role).is_none() {
                return Err(AppError::validation(format!(
                    "Rollen \"{}\" finns inte",
                    user.role
                )));
            }
        }

        let candidate = user.clone();
        self.db.store::<TeamUser>().mutate(|current, seeds| {
            if seeds
                .iter()
                .chain(current.iter())
                .any(|u| u.email == candidate.email)
            {
                return Err(AppError::already_exists(format!(
                    "E-postadressen {} används redan",
                    candidate.email
                )));
            }
            current.push(candidate);
            Ok(())
        })?;

        info!("Lade till användare {}", user.email);
        Ok(user.id.clone())
    }

    pub fn set_status(&self, id: &str, status: UserStatus) -> AppResult<TeamUser> {
        self.db.store::<TeamUser>().update_by_id(id, |u| {
            u.status = status;
            Ok(())
        })
    }

    pub fn delete(&self, id: &str) -> AppResult<TeamUser> {
        self.db.store::<TeamUser>().remove_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RoleService;

    #[test]
    fn test_add_and_duplicate_email() {
        let db = Database::open_in_memory().unwrap();
        let service = TeamUserService::new(&db);

        let mut user = TeamUser::new(String::new(), "test", "test@bygg.se", "Platschef");
        service.add(&mut user).unwrap();

        let mut again = TeamUser::new(String::new(), "Test 2", "TEST@bygg.se", "");
        assert!(matches!(service.add(&mut again), Err(AppError::AlreadyExists(_))));

        let mut seed_email = TeamUser::new(String::new(), "Anna", "anna.lind@byggdesk.se", "");
        assert!(service.add(&mut seed_email).is_err());

        assert_eq!(service.names().unwrap(), vec!["Anna Lind", "Erik Berg", "test"]);
    }

    #[test]
    fn test_role_must_exist() {
        let db = Database::open_in_memory().unwrap();
        let service = TeamUserService::new(&db);

        let mut user = TeamUser::new(String::new(), "test", "test@bygg.se", "Kalkylator");
        assert!(matches!(service.add(&mut user), Err(AppError::Validation(_))));

        RoleService::new(&db).create("Kalkylator").unwrap();
        assert!(service.add(&mut user).is_ok());
    }

    #[test]
    fn test_set_status_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let service = TeamUserService::new(&db);
        let id = service
            .add(&mut TeamUser::new(String::new(), "test", "test@bygg.se", ""))
            .unwrap();

        let user = service.set_status(&id, UserStatus::Inactive).unwrap();
        assert_eq!(user.status, UserStatus::Inactive);

        service.delete(&id).unwrap();
        assert!(db.store::<TeamUser>().load().unwrap().is_empty());
        assert!(service.delete("1").unwrap_err().is_warning());
    }
}

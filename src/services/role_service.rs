use tracing::info;

use crate::db::Database;
use crate::models::Role;
use crate::store::normalize_key;
use crate::utils::id::new_id;
use crate::utils::{AppError, AppResult};

pub struct RoleService<'a> {
    db: &'a Database,
}

impl<'a> RoleService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<Role>> {
        self.db.store::<Role>().load_merged()
    }

    /// Skapa en egen roll. Namnet måste vara unikt utan hänsyn till versaler.
    pub fn create(&self, name: &str) -> AppResult<Role> {
        let role = Role::new(new_id(), name);
        role.validate()?;

        let candidate = role.clone();
        self.db.store::<Role>().mutate(|current, seeds| {
            ensure_unique_name(seeds.iter().chain(current.iter()), &candidate.name, None)?;
            current.push(candidate);
            Ok(())
        })?;

        info!("Skapade roll {}", role.name);
        Ok(role)
    }

    /// Byt namn på en egen roll. Systemroller kan inte byta namn.
    pub fn rename(&self, id: &str, name: &str) -> AppResult<Role> {
        let name = name.trim().to_string();

        let role = self.db.store::<Role>().mutate(|current, seeds| {
            if seeds.iter().any(|r| r.id == id) {
                return Err(AppError::protected("Systemroller kan inte byta namn"));
            }
            let index = current
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| AppError::not_found(format!("roll med id {}", id)))?;
            if current[index].is_system_role {
                return Err(AppError::protected(format!(
                    "\"{}\" är en systemroll och kan inte byta namn",
                    current[index].name
                )));
            }
            ensure_unique_name(seeds.iter().chain(current.iter()), &name, Some(id))?;

            let role = &mut current[index];
            role.name = name;
            role.validate()?;
            Ok(role.clone())
        })?;

        info!("Bytte namn på roll {} till {}", role.id, role.name);
        Ok(role)
    }

    /// Ta bort en egen roll. Systemroller kan inte tas bort.
    pub fn delete(&self, id: &str) -> AppResult<Role> {
        self.db.store::<Role>().mutate(|current, seeds| {
            if seeds.iter().any(|r| r.id == id) {
                return Err(AppError::protected("Systemroller kan inte tas bort"));
            }
            let index = current
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| AppError::not_found(format!("roll med id {}", id)))?;
            if current[index].is_system_role {
                return Err(AppError::protected(format!(
                    "\"{}\" är en systemroll och kan inte tas bort",
                    current[index].name
                )));
            }
            Ok(current.remove(index))
        })
    }
}

fn ensure_unique_name<'r>(
    roles: impl Iterator<Item = &'r Role>,
    name: &str,
    except_id: Option<&str>,
) -> AppResult<()> {
    let key = normalize_key(name);
    for role in roles {
        if Some(role.id.as_str()) == except_id {
            continue;
        }
        if normalize_key(&role.name) == key {
            return Err(AppError::already_exists(format!(
                "Rollen \"{}\" finns redan",
                role.name
            )));
        }
    }
    Ok(())
}

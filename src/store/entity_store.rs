//! Lagring av en posttyp som JSON-array under en fast nyckel
//!
//! Bara användarens poster sparas. Standardposterna ligger i
//! `seed_records` och läggs till vid läsning via [`EntityStore::load_merged`].

use std::collections::HashSet;
use std::marker::PhantomData;

use tracing::warn;

use super::merge::merge;
use crate::db::StorageRepository;
use crate::models::Entity;
use crate::utils::{AppError, AppResult};

pub struct EntityStore<T> {
    storage: StorageRepository,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> EntityStore<T> {
    pub fn new(storage: StorageRepository) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        T::KEY
    }

    /// Användarens poster. Trasig JSON ger en tom lista.
    pub fn load(&self) -> AppResult<Vec<T>> {
        let raw = self.storage.get(T::KEY)?;
        Ok(parse_records(T::KEY, raw.as_deref()))
    }

    /// Standardposter i ordning
    pub fn seeds(&self) -> AppResult<Vec<T>> {
        let rows = self.storage.seed_records(T::KEY)?;
        let seeds = rows
            .into_iter()
            .filter_map(|(id, json)| match serde_json::from_str(&json) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Ogiltig standardpost {}/{}: {}", T::KEY, id, e);
                    None
                }
            })
            .collect();
        Ok(seeds)
    }

    pub fn is_seed(&self, id: &str) -> AppResult<bool> {
        Ok(self.seeds()?.iter().any(|s| s.id() == id))
    }

    /// Standardposter följda av användarens poster, utan dubbletter
    pub fn load_merged(&self) -> AppResult<Vec<T>> {
        Ok(merge(self.seeds()?, self.load()?))
    }

    /// Ersätt hela samlingen
    ///
    /// Standardposter i `records` sparas inte. Blir resultatet tomt tas
    /// nyckeln bort.
    pub fn save(&self, records: &[T]) -> AppResult<()> {
        self.mutate(|current, _| {
            *current = records.to_vec();
            Ok(())
        })
    }

    /// Lägg till en post sist
    pub fn append(&self, record: T) -> AppResult<()> {
        self.mutate(|current, _| {
            current.push(record);
            Ok(())
        })
    }

    /// Ändra en användarpost på plats
    pub fn update_by_id<F>(&self, id: &str, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut T) -> AppResult<()>,
    {
        self.mutate(|current, seeds| {
            if seeds.iter().any(|s| s.id() == id) {
                return Err(AppError::protected(format!(
                    "Standard{} kan inte ändras",
                    T::LABEL
                )));
            }
            let record = current
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| AppError::not_found(format!("{} med id {}", T::LABEL, id)))?;
            f(record)?;
            Ok(record.clone())
        })
    }

    /// Ta bort en användarpost
    pub fn remove_by_id(&self, id: &str) -> AppResult<T> {
        self.mutate(|current, seeds| {
            if seeds.iter().any(|s| s.id() == id) {
                return Err(AppError::protected(format!(
                    "Standard{} kan inte tas bort",
                    T::LABEL
                )));
            }
            let index = current
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| AppError::not_found(format!("{} med id {}", T::LABEL, id)))?;
            Ok(current.remove(index))
        })
    }

    /// Behåll bara poster som uppfyller villkoret. Returnerar antal borttagna.
    pub fn retain<F>(&self, mut keep: F) -> AppResult<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.mutate(|current, _| {
            let before = current.len();
            current.retain(|r| keep(r));
            Ok(before - current.len())
        })
    }

    /// Läs-ändra-skriv mot senaste lagrade samlingen i en transaktion
    ///
    /// `f` får användarens poster och standardposterna. Returnerar `f` fel
    /// skrivs ingenting.
    pub fn mutate<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>, &[T]) -> AppResult<R>,
    {
        let seeds = self.seeds()?;
        let seed_ids: HashSet<&str> = seeds.iter().map(|s| s.id()).collect();
        let mut output = None;

        self.storage.update(T::KEY, |raw| {
            let mut records = parse_records::<T>(T::KEY, raw);
            output = Some(f(&mut records, &seeds)?);

            records.retain(|r| !seed_ids.contains(r.id()));
            if records.is_empty() {
                Ok(None)
            } else {
                Ok(Some(serde_json::to_string(&records)?))
            }
        })?;

        output.ok_or_else(|| AppError::other(format!("Ingen ändring av {}", T::KEY)))
    }

    pub fn revision(&self) -> AppResult<i64> {
        self.storage.revision(T::KEY)
    }
}

fn parse_records<T: Entity>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            // Behandlas som att ingen användardata finns
            warn!("Kunde inte tolka '{}', ignorerar lagrad data: {}", key, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Project, Role};
    use crate::sync::Topic;

    fn role(id: &str, name: &str) -> Role {
        Role::new(id.into(), name)
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.store::<Role>().load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let db = Database::open_in_memory().unwrap();
        db.storage().set("userRoles", "{inte json").unwrap();

        let store = db.store::<Role>();
        assert!(store.load().unwrap().is_empty());
        // Standardposter visas fortfarande
        assert_eq!(store.load_merged().unwrap().len(), Role::seeds().len());
    }

    #[test]
    fn test_save_strips_seeds() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Role>();

        let mut all = store.load_merged().unwrap();
        all.push(role("500", "Kalkylator"));
        store.save(&all).unwrap();

        let stored = db.storage().get("userRoles").unwrap().unwrap();
        let raw: Vec<Role> = serde_json::from_str(&stored).unwrap();
        assert_eq!(raw, vec![role("500", "Kalkylator")]);
    }

    #[test]
    fn test_empty_save_removes_key() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Role>();

        store.append(role("500", "Kalkylator")).unwrap();
        assert!(db.storage().get("userRoles").unwrap().is_some());

        store.save(&[]).unwrap();
        assert_eq!(db.storage().get("userRoles").unwrap(), None);

        // Bara standardposter kvar räknas också som tomt
        store.save(&Role::seeds()).unwrap();
        assert_eq!(db.storage().get("userRoles").unwrap(), None);
    }

    #[test]
    fn test_create_delete_sequence_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Role>();

        for i in 0..6 {
            store.append(role(&format!("{}", 1000 + i), &format!("Roll {}", i))).unwrap();
        }
        store.remove_by_id("1001").unwrap();
        store.remove_by_id("1004").unwrap();
        store.append(role("1010", "Sist")).unwrap();

        let ids: Vec<String> = store.load().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1000", "1002", "1003", "1005", "1010"]);

        let merged = store.load_merged().unwrap();
        assert_eq!(merged.len(), Role::seeds().len() + 5);
    }

    #[test]
    fn test_seed_cannot_be_removed_or_updated() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Role>();

        assert!(matches!(store.remove_by_id("1"), Err(AppError::Protected(_))));
        assert!(matches!(
            store.update_by_id("1", |r| {
                r.name = "Ny".into();
                Ok(())
            }),
            Err(AppError::Protected(_))
        ));
        assert!(store.is_seed("1").unwrap());
        assert!(!store.is_seed("999").unwrap());
    }

    #[test]
    fn test_update_and_missing_id() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Project>();
        store
            .append(Project::new("700".into(), "Lakeshire", "L-1", "Sydbygg"))
            .unwrap();

        let updated = store
            .update_by_id("700", |p| {
                p.progress = 60;
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.progress, 60);
        assert_eq!(store.load().unwrap()[0].progress, 60);

        assert!(matches!(store.remove_by_id("701"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_failed_mutation_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Role>();
        store.append(role("500", "Kalkylator")).unwrap();
        let revision = store.revision().unwrap();

        let result: AppResult<()> = store.mutate(|current, _| {
            current.clear();
            Err(AppError::validation("avbryt"))
        });
        assert!(result.is_err());
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(store.revision().unwrap(), revision);
    }

    #[test]
    fn test_two_handles_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("byggdesk.db");
        let first = Database::open(&path).unwrap();
        let second = Database::open(&path).unwrap();

        // Båda läser samma ögonblicksbild innan någon skriver
        let snapshot_a = first.store::<Role>().load().unwrap();
        let snapshot_b = second.store::<Role>().load().unwrap();
        assert_eq!(snapshot_a, snapshot_b);

        first.store::<Role>().append(role("500", "A")).unwrap();
        second.store::<Role>().append(role("501", "B")).unwrap();

        let ids: Vec<String> = first
            .store::<Role>()
            .load()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["500", "501"]);
    }

    #[test]
    fn test_retain_and_publish() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store::<Role>();
        store.append(role("500", "A")).unwrap();
        store.append(role("501", "B")).unwrap();

        let sub = db.subscribe(&[Topic::Roles]);
        assert_eq!(store.retain(|r| r.name != "A").unwrap(), 1);
        assert_eq!(sub.drain().len(), 1);

        // Inget borttaget, ingen skrivning
        assert_eq!(store.retain(|_| true).unwrap(), 0);
        assert!(sub.drain().is_empty());
    }
}

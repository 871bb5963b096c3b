pub mod company;
pub mod config;
pub mod permission;
pub mod project;
pub mod role;
pub mod session;
pub mod subproject;
pub mod team_user;

pub use company::*;
pub use config::*;
pub use permission::*;
pub use project::*;
pub use role::*;
pub use session::*;
pub use subproject::*;
pub use team_user::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::sync::Topic;
use crate::utils::AppResult;

/// En posttyp som lagras som en JSON-array under en fast nyckel
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Lagringsnyckel, t.ex. "projects"
    const KEY: &'static str;
    const TOPIC: Topic;
    /// Benämning i meddelanden ("projekt", "roll", ...)
    const LABEL: &'static str;

    fn id(&self) -> &str;

    /// Semantisk nyckel för dubblettkontroll (jämförs utan hänsyn till versaler)
    fn natural_key(&self) -> String;

    /// Standardposter med fasta id:n "1", "2", ...
    fn seeds() -> Vec<Self> {
        Vec::new()
    }
}

/// Standardposter för en nyckel, serialiserade för seed_records
pub struct SeedCollection {
    pub key: &'static str,
    /// (id, JSON)
    pub records: Vec<(String, String)>,
}

impl SeedCollection {
    pub fn of<T: Entity>() -> AppResult<Self> {
        let records = T::seeds()
            .iter()
            .map(|r| -> AppResult<(String, String)> {
                Ok((r.id().to_string(), serde_json::to_string(r)?))
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self {
            key: T::KEY,
            records,
        })
    }
}

/// Alla standardposter som migreringen skriver
pub fn seed_collections() -> AppResult<Vec<SeedCollection>> {
    Ok(vec![
        SeedCollection::of::<Company>()?,
        SeedCollection::of::<Project>()?,
        SeedCollection::of::<Subproject>()?,
        SeedCollection::of::<Role>()?,
        SeedCollection::of::<TeamUser>()?,
        SeedCollection::of::<ProjectPermission>()?,
    ])
}

/// Trimma och kontrollera att ett obligatoriskt fält inte är tomt
pub(crate) fn required(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(crate::utils::AppError::validation(format!(
            "{} måste anges",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_sequential() {
        for collection in seed_collections().unwrap() {
            for (i, (id, _)) in collection.records.iter().enumerate() {
                assert_eq!(id, &(i + 1).to_string(), "nyckel {}", collection.key);
            }
        }
    }

    #[test]
    fn test_seed_keys_have_topics() {
        for collection in seed_collections().unwrap() {
            assert!(Topic::for_key(collection.key).is_some());
        }
    }

    #[test]
    fn test_required() {
        assert!(required("Lakeshire", "Namn").is_ok());
        let err = required("   ", "Namn").unwrap_err();
        assert_eq!(err.to_string(), "Valideringsfel: Namn måste anges");
    }
}

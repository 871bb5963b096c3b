//! Sammanslagning av standardposter och användarens poster

use std::collections::HashSet;

use crate::models::Entity;

/// Normaliserad jämförelsenyckel (trimmad, gemener)
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Standardposter först, sedan användarens i skapandeordning
///
/// En post vars nyckel redan förekommit hoppas över. Första förekomsten
/// vinner, så en standardpost går alltid före en användarpost med samma
/// nyckel.
pub fn merge_by<T, F>(seeds: Vec<T>, user: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(seeds.len() + user.len());

    for record in seeds.into_iter().chain(user) {
        if seen.insert(normalize_key(&key(&record))) {
            merged.push(record);
        }
    }

    merged
}

/// Slå ihop på postens semantiska nyckel
pub fn merge<T: Entity>(seeds: Vec<T>, user: Vec<T>) -> Vec<T> {
    merge_by(seeds, user, |r| r.natural_key())
}

/// Hitta en post via semantisk nyckel
pub fn find_by_key<'a, T: Entity>(records: &'a [T], key: &str) -> Option<&'a T> {
    let key = normalize_key(key);
    records.iter().find(|r| normalize_key(&r.natural_key()) == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn role(id: &str, name: &str) -> Role {
        Role::new(id.into(), name)
    }

    #[test]
    fn test_seeds_first_then_user_in_order() {
        let seeds = vec![role("1", "Admin"), role("2", "Platschef")];
        let user = vec![role("300", "Kalkylator"), role("200", "Inköpare")];

        let names: Vec<String> = merge(seeds, user).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Admin", "Platschef", "Kalkylator", "Inköpare"]);
    }

    #[test]
    fn test_collision_keeps_seed() {
        let seeds = vec![role("1", "Admin")];
        let user = vec![role("100", " admin "), role("101", "Snickare")];

        let merged = merge(seeds, user);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged.iter().filter(|r| normalize_key(&r.name) == "admin").count(), 1);
    }

    #[test]
    fn test_duplicates_within_user_records() {
        let user = vec![role("100", "Snickare"), role("101", "SNICKARE")];
        let merged = merge(Vec::new(), user);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "100");
    }

    #[test]
    fn test_find_by_key() {
        let records = vec![role("1", "Admin"), role("2", "Platschef")];
        assert_eq!(find_by_key(&records, "platschef").map(|r| r.id.as_str()), Some("2"));
        assert!(find_by_key(&records, "Elektriker").is_none());
    }
}

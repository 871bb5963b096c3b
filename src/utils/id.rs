//! Tidsstämpelbaserade id:n för nya poster

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generera ett nytt id (millisekunder sedan epoken)
///
/// Två anrop inom samma millisekund får ändå olika id:n; värdet räknas
/// upp så att id:n alltid är strikt växande inom processen.
pub fn new_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_increasing() {
        let ids: Vec<i64> = (0..100).map(|_| new_id().parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_never_collide_with_seed_ids() {
        let id: i64 = new_id().parse().unwrap();
        assert!(id > 1_000_000);
    }
}

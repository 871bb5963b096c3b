//! Inloggningsstatus
//!
//! Lagras som två JSON-skalärer (`true`/`false` och en sträng) så att alla
//! fönster ser samma status.

use tracing::{info, warn};

use crate::db::Database;
use crate::models::Session;
use crate::utils::{AppError, AppResult};

pub struct SessionService<'a> {
    db: &'a Database,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn login(&self, email: &str) -> AppResult<Session> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::validation(format!(
                "Ogiltig e-postadress: {}",
                email
            )));
        }

        let storage = self.db.storage();
        storage.set(Session::EMAIL_KEY, &serde_json::to_string(&email)?)?;
        storage.set(Session::AUTH_KEY, "true")?;

        info!("Inloggad som {}", email);
        Ok(Session {
            is_authenticated: true,
            user_email: Some(email),
        })
    }

    pub fn logout(&self) -> AppResult<()> {
        let storage = self.db.storage();
        storage.remove(Session::EMAIL_KEY)?;
        storage.remove(Session::AUTH_KEY)?;
        info!("Utloggad");
        Ok(())
    }

    /// Aktuell status. Oläsbara värden räknas som utloggad.
    pub fn current(&self) -> AppResult<Session> {
        let storage = self.db.storage();

        let is_authenticated = match storage.get(Session::AUTH_KEY)? {
            Some(raw) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!("Ogiltigt värde för {}: {}", Session::AUTH_KEY, e);
                false
            }),
            None => false,
        };
        let user_email = storage
            .get(Session::EMAIL_KEY)?
            .and_then(|raw| serde_json::from_str::<String>(&raw).ok());

        Ok(Session {
            is_authenticated,
            user_email: user_email.filter(|_| is_authenticated),
        })
    }

    pub fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.current()?.is_authenticated)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Databasfel: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON-fel: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Valideringsfel: {0}")]
    Validation(String),

    #[error("Hittades inte: {0}")]
    NotFound(String),

    #[error("Redan finns: {0}")]
    AlreadyExists(String),

    /// Försök att ändra eller ta bort en standardpost
    #[error("Skyddad post: {0}")]
    Protected(String),

    /// Lagringskvoten räcker inte för skrivningen
    #[error("Lagringsutrymmet är fullt: {needed} byte behövs, {quota} byte tillåts")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn protected(msg: impl Into<String>) -> Self {
        Self::Protected(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Fel som användaren ska se som en varning snarare än ett fel
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Protected(_) | Self::QuotaExceeded { .. })
    }

    /// Fel som beror på användarens indata och kan rättas i formuläret
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::AlreadyExists(_) | Self::NotFound(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

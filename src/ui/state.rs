use crate::utils::AppResult;

/// Centraliserat applikationstillstånd
#[derive(Debug, Default)]
pub struct AppState {
    /// Statusmeddelande
    pub status_message: Option<StatusMessage>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visa statusmeddelande
    pub fn show_status(&mut self, message: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: message.to_string(),
            status_type,
        });
    }

    /// Visa framgångsmeddelande
    pub fn show_success(&mut self, message: &str) {
        self.show_status(message, StatusType::Success);
    }

    /// Visa felmeddelande
    pub fn show_error(&mut self, message: &str) {
        self.show_status(message, StatusType::Error);
    }

    pub fn show_warning(&mut self, message: &str) {
        self.show_status(message, StatusType::Warning);
    }

    /// Visa resultatet av en åtgärd
    ///
    /// Skyddade poster och fullt lagringsutrymme visas som varning, övriga
    /// fel som fel.
    pub fn report(&mut self, result: AppResult<String>) {
        match result {
            Ok(message) => self.show_success(&message),
            Err(e) if e.is_warning() => self.show_warning(&e.to_string()),
            Err(e) => self.show_error(&e.to_string()),
        }
    }

    /// Om senaste åtgärden misslyckades
    pub fn failed(&self) -> bool {
        matches!(
            self.status_message,
            Some(StatusMessage {
                status_type: StatusType::Error,
                ..
            })
        )
    }
}

/// Statusmeddelande
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
    Warning,
}

impl StatusType {
    pub fn label(&self) -> &'static str {
        match self {
            StatusType::Success => "OK",
            StatusType::Error => "Fel",
            StatusType::Warning => "Varning",
        }
    }
}

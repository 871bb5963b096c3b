/// Inloggningsstatus, lagras som två separata nycklar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user_email: Option<String>,
}

impl Session {
    pub const AUTH_KEY: &'static str = "isAuthenticated";
    pub const EMAIL_KEY: &'static str = "userEmail";
}

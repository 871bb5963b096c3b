//! Tjänster för Byggdesk
//!
//! Innehåller affärslogik som inte hör hemma i vyer eller databas:
//! validering, dubblettkontroller, skydd av standardposter och export.

pub mod company_service;
pub mod export;
pub mod permission_service;
pub mod project_service;
pub mod role_service;
pub mod session_service;
pub mod subproject_service;
pub mod team_user_service;

pub use company_service::CompanyService;
pub use export::{ExportResult, ExportService};
pub use permission_service::PermissionService;
pub use project_service::{ProjectDeletion, ProjectService};
pub use role_service::RoleService;
pub use session_service::SessionService;
pub use subproject_service::SubprojectService;
pub use team_user_service::TeamUserService;

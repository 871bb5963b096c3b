//! Projektbehörigheter med rullistor för projekt och användare

use std::collections::HashSet;

use crate::db::Database;
use crate::models::{Project, ProjectPermission, TeamUser};
use crate::services::PermissionService;
use crate::store::normalize_key;
use crate::sync::{Subscription, Topic};
use crate::ui::table::PageSize;
use crate::ui::views::EntityTableView;
use crate::utils::AppResult;

pub struct PermissionsView {
    db: Database,
    table: EntityTableView<ProjectPermission>,
    options_subscription: Subscription,
    project_options: Vec<String>,
    user_options: Vec<String>,
    /// Normaliserade projektnamn som finns
    known_projects: HashSet<String>,
}

impl PermissionsView {
    pub fn new(db: &Database, page_size: PageSize) -> AppResult<Self> {
        let mut view = Self {
            db: db.clone(),
            table: EntityTableView::new(db, page_size)?,
            options_subscription: db.subscribe(&[Topic::Projects, Topic::Users]),
            project_options: Vec::new(),
            user_options: Vec::new(),
            known_projects: HashSet::new(),
        };
        view.reload_options()?;
        Ok(view)
    }

    fn reload_options(&mut self) -> AppResult<()> {
        let projects = self.db.store::<Project>().load_merged()?;
        self.known_projects = projects.iter().map(|p| normalize_key(&p.name)).collect();
        self.project_options = projects.into_iter().map(|p| p.name).collect();

        self.user_options = self
            .db
            .store::<TeamUser>()
            .load_merged()?
            .into_iter()
            .map(|u| u.name)
            .collect();
        Ok(())
    }

    /// Hantera väntande ändringar i behörigheter, projekt och användare
    pub fn sync(&mut self) -> AppResult<bool> {
        let options_changed = !self.options_subscription.drain().is_empty();
        if options_changed {
            self.reload_options()?;
        }
        let table_changed = self.table.sync()?;
        Ok(options_changed || table_changed)
    }

    pub fn table(&self) -> &EntityTableView<ProjectPermission> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut EntityTableView<ProjectPermission> {
        &mut self.table
    }

    /// Projektnamn för rullistan, standardprojekt först
    pub fn project_options(&self) -> &[String] {
        &self.project_options
    }

    pub fn user_options(&self) -> &[String] {
        &self.user_options
    }

    /// Projektet behörigheten pekar på finns inte längre
    pub fn is_orphaned(&self, permission: &ProjectPermission) -> bool {
        !self.known_projects.contains(&normalize_key(&permission.project))
    }

    pub fn orphan_count(&self) -> usize {
        self.table.rows().iter().filter(|p| self.is_orphaned(p)).count()
    }

    /// Skapa behörighet från formuläret
    pub fn add(&mut self, project: &str, user: &str, designation: &str) -> AppResult<String> {
        let mut permission = ProjectPermission::new(String::new(), project, user, designation);
        let id = PermissionService::new(&self.db).add(&mut permission)?;
        self.sync()?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ProjectService, TeamUserService};

    #[test]
    fn test_dropdown_updates_without_remount() {
        let db = Database::open_in_memory().unwrap();
        let mut view = PermissionsView::new(&db, PageSize::Ten).unwrap();
        assert!(!view.project_options().iter().any(|p| p == "Lakeshire"));

        // Skrivet via en annan handle mot samma databas
        let other = db.clone();
        let mut project = Project::new(String::new(), "Lakeshire", "L-100", "Sydbygg Entreprenad AB");
        ProjectService::new(&other).create(&mut project).unwrap();

        assert!(view.sync().unwrap());
        assert_eq!(view.project_options().last().map(String::as_str), Some("Lakeshire"));
    }

    #[test]
    fn test_user_options_follow_team_users() {
        let db = Database::open_in_memory().unwrap();
        let mut view = PermissionsView::new(&db, PageSize::Ten).unwrap();
        assert_eq!(view.user_options(), &["Anna Lind", "Erik Berg"]);

        let mut user = TeamUser::new(String::new(), "test", "test@bygg.se", "");
        TeamUserService::new(&db).add(&mut user).unwrap();
        view.sync().unwrap();
        assert_eq!(view.user_options().len(), 3);
    }

    #[test]
    fn test_orphans_flagged_after_project_delete() {
        let db = Database::open_in_memory().unwrap();
        let mut project = Project::new(String::new(), "Lakeshire", "L-100", "Sydbygg Entreprenad AB");
        let project_id = ProjectService::new(&db).create(&mut project).unwrap();

        let mut view = PermissionsView::new(&db, PageSize::Ten).unwrap();
        view.add("Lakeshire", "test", "Snickare").unwrap();
        assert_eq!(view.orphan_count(), 0);

        ProjectService::new(&db).delete(&project_id).unwrap();
        view.sync().unwrap();
        assert_eq!(view.orphan_count(), 1);
        assert_eq!(view.table().rows().len(), 3);
    }
}

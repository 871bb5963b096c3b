use std::time::{Duration, Instant};

use byggdesk::models::{Entity, Project, ProjectPermission, Role};
use byggdesk::services::{PermissionService, ProjectService, RoleService};
use byggdesk::ui::{EntityTableView, PageSize, PermissionsView};
use byggdesk::{AppError, Database};

fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn lakeshire_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("byggdesk.db");

    // Två fönster mot samma databas
    let permissions_window = Database::open(&path).unwrap();
    let projects_window = Database::open(&path).unwrap();
    let _watcher = permissions_window
        .watch_external(Duration::from_millis(20))
        .unwrap();

    let mut view = PermissionsView::new(&permissions_window, PageSize::Ten).unwrap();
    assert!(!view.project_options().iter().any(|p| p == "Lakeshire"));

    // 1. Projektet skapas i det andra fönstret
    let mut lakeshire = Project::new(String::new(), "Lakeshire", "L-100", "Sydbygg Entreprenad AB");
    let project_id = ProjectService::new(&projects_window)
        .create(&mut lakeshire)
        .unwrap();

    // 2. Rullistan uppdateras utan att vyn skapas om
    let seen = wait_until(|| {
        view.sync().unwrap();
        view.project_options().iter().any(|p| p == "Lakeshire")
    });
    assert!(seen, "rullistan fick aldrig Lakeshire");

    // 3. Behörighet för "test", andra försöket avvisas med användarens namn
    view.add("Lakeshire", "test", "Snickare").unwrap();
    let err = view.add("Lakeshire", "test", "Elektriker").unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));
    assert!(err.to_string().contains("\"test\""));

    let stored: Vec<ProjectPermission> = permissions_window.store().load().unwrap();
    assert_eq!(stored.len(), 1);

    // 4. Projektet tas bort, behörigheten blir kvar men flaggas
    let deletion = ProjectService::new(&projects_window).delete(&project_id).unwrap();
    assert_eq!(deletion.orphaned_permissions, 1);

    let flagged = wait_until(|| {
        view.sync().unwrap();
        view.orphan_count() == 1
    });
    assert!(flagged);

    let orphans = PermissionService::new(&permissions_window).orphaned().unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].assigned_user, "test");
}

#[test]
fn surviving_records_round_trip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("byggdesk.db");

    let ids: Vec<String> = {
        let db = Database::open(&path).unwrap();
        let service = RoleService::new(&db);
        let mut ids = Vec::new();
        for name in ["Kalkylator", "Inköpare", "Lagerchef", "Konstruktör"] {
            ids.push(service.create(name).unwrap().id);
        }
        service.delete(&ids[1]).unwrap();
        ids
    };

    let db = Database::open(&path).unwrap();
    let stored: Vec<String> = db
        .store::<Role>()
        .load()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(stored, vec![ids[0].clone(), ids[2].clone(), ids[3].clone()]);

    // Standardposter sparas aldrig under nyckeln
    let raw = db.storage().get(Role::KEY).unwrap().unwrap();
    for seed in Role::seeds() {
        assert!(!raw.contains(&seed.name));
    }
}

#[test]
fn duplicate_names_never_appear_twice_in_merged_view() {
    let db = Database::open_in_memory().unwrap();

    // Skrivet förbi tjänsten, krockar med standardroll
    db.storage()
        .set(Role::KEY, r#"[{"id":"900","name":"PLATSCHEF","isSystemRole":false}]"#)
        .unwrap();

    let view = EntityTableView::<Role>::new(&db, PageSize::Ten).unwrap();
    let count = view
        .rows()
        .iter()
        .filter(|r| r.name.eq_ignore_ascii_case("platschef"))
        .count();
    assert_eq!(count, 1);
    assert!(matches!(
        RoleService::new(&db).create("Platschef"),
        Err(AppError::AlreadyExists(_))
    ));
}

#[test]
fn pagination_over_merged_rows() {
    let db = Database::open_in_memory().unwrap();
    let service = RoleService::new(&db);
    for i in 0..38 {
        service.create(&format!("Roll {:02}", i)).unwrap();
    }

    // 4 standardroller + 38 egna
    let mut view = EntityTableView::<Role>::new(&db, PageSize::Ten).unwrap();
    let page = view.page();
    assert_eq!(page.total, 42);
    assert_eq!(page.page_count, 5);
    assert_eq!(page.range(), Some((1, 10)));

    view.set_page(5);
    assert_eq!(view.page().range(), Some((41, 42)));

    view.set_page_size(PageSize::TwentyFive);
    assert_eq!(view.table().page(), 1);
    assert_eq!(view.page().page_count, 2);

    view.set_page(2);
    view.set_query("roll 1");
    assert_eq!(view.table().page(), 1);
    assert_eq!(view.page().total, 10);
}

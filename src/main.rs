//! Byggdesk - Entry Point

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use byggdesk::models::{
    AppSettings, Company, Entity, Project, ProjectPermission, ProjectStatus, Role, Subproject,
    TeamUser,
};
use byggdesk::services::{
    CompanyService, PermissionService, ProjectService, RoleService, SessionService,
    SubprojectService, TeamUserService,
};
use byggdesk::sync::{Origin, Topic};
use byggdesk::ui::{AppState, EntityTableView, PageSize, StatusType, TableRow};
use byggdesk::utils::date::parse_date;
use byggdesk::utils::path::{display_path, get_export_dir};
use byggdesk::{AppError, AppResult, Database};

use cli::{
    Cli, Command, CompanyAction, EntityKind, ListArgs, PermissionAction, ProjectAction,
    RoleAction, SubprojectAction, UserAction,
};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = AppSettings::load();
    if let Some(path) = &cli.database {
        settings.database_path = Some(path.clone());
    }

    // Initiera logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        settings.log_level.to_tracing()
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = settings.validate() {
        tracing::warn!("{}", e);
    }

    let db_path = settings.database_path();
    tracing::debug!("Databas: {}", display_path(&db_path));
    let db = Database::open(&db_path)
        .with_context(|| format!("Kunde inte öppna {}", display_path(&db_path)))?
        .with_quota(settings.storage_quota_bytes);

    let mut state = AppState::new();
    match run(cli.command, &db, &settings) {
        Err(e) if !e.is_warning() && !e.is_user_error() => return Err(e.into()),
        result => state.report(result),
    }

    if let Some(status) = &state.status_message {
        match status.status_type {
            StatusType::Success => println!("{}", status.text),
            other => eprintln!("{}: {}", other.label(), status.text),
        }
    }
    Ok(if state.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Kör kommandot och returnera statusmeddelandet
fn run(command: Command, db: &Database, settings: &AppSettings) -> AppResult<String> {
    match command {
        Command::Projects { action } => projects(action, db, settings),
        Command::Subprojects { action } => subprojects(action, db, settings),
        Command::Roles { action } => roles(action, db, settings),
        Command::Permissions { action } => permissions(action, db, settings),
        Command::Companies { action } => companies(action, db, settings),
        Command::Users { action } => users(action, db, settings),
        Command::Export { entity, dir, list } => {
            let dir = dir.unwrap_or_else(get_export_dir);
            match entity {
                EntityKind::Projects => export::<Project>(db, settings, &list, &dir),
                EntityKind::Subprojects => export::<Subproject>(db, settings, &list, &dir),
                EntityKind::Roles => export::<Role>(db, settings, &list, &dir),
                EntityKind::Permissions => export::<ProjectPermission>(db, settings, &list, &dir),
                EntityKind::Companies => export::<Company>(db, settings, &list, &dir),
                EntityKind::Users => export::<TeamUser>(db, settings, &list, &dir),
            }
        }
        Command::Watch { entities } => watch(db, settings, &entities),
        Command::Login { email } => {
            let session = SessionService::new(db).login(&email)?;
            Ok(format!("Inloggad som {}", session.user_email.unwrap_or_default()))
        }
        Command::Logout => {
            SessionService::new(db).logout()?;
            Ok("Utloggad".to_string())
        }
    }
}

fn projects(action: ProjectAction, db: &Database, settings: &AppSettings) -> AppResult<String> {
    let service = ProjectService::new(db);
    match action {
        ProjectAction::List(args) => list::<Project>(db, settings, &args),
        ProjectAction::Add {
            name,
            code,
            company,
            location,
            start,
            end,
        } => {
            let mut project = Project::new(String::new(), &name, &code, &company);
            project.location = location.unwrap_or_default();
            project.start_date = optional_date(start.as_deref())?;
            project.end_date = optional_date(end.as_deref())?;
            let id = service.create(&mut project)?;
            Ok(format!("Skapade projekt \"{}\" ({})", project.name, id))
        }
        ProjectAction::Status { id, status } => {
            let Some(status) = ProjectStatus::parse(&status.replace('-', " ")) else {
                return Err(AppError::validation(format!("Okänd status: {}", status)));
            };
            let project = service.set_status(&id, status)?;
            Ok(format!("{}: {}", project.name, project.status.label()))
        }
        ProjectAction::Delete { id } => {
            let deletion = service.delete(&id)?;
            Ok(deletion.summary())
        }
    }
}

fn subprojects(
    action: SubprojectAction,
    db: &Database,
    settings: &AppSettings,
) -> AppResult<String> {
    let service = SubprojectService::new(db);
    match action {
        SubprojectAction::List(args) => list::<Subproject>(db, settings, &args),
        SubprojectAction::Add { name, project } => {
            let mut subproject = Subproject::new(String::new(), &name, &project);
            let id = service.add(&mut subproject)?;
            Ok(format!("Skapade delprojekt \"{}\" ({})", subproject.name, id))
        }
        SubprojectAction::Delete { id } => {
            let removed = service.delete(&id)?;
            Ok(format!("Tog bort delprojekt \"{}\"", removed.name))
        }
    }
}

fn roles(action: RoleAction, db: &Database, settings: &AppSettings) -> AppResult<String> {
    let service = RoleService::new(db);
    match action {
        RoleAction::List(args) => list::<Role>(db, settings, &args),
        RoleAction::Add { name } => {
            let role = service.create(&name)?;
            Ok(format!("Skapade roll \"{}\" ({})", role.name, role.id))
        }
        RoleAction::Rename { id, name } => {
            let role = service.rename(&id, &name)?;
            Ok(format!("Rollen heter nu \"{}\"", role.name))
        }
        RoleAction::Delete { id } => {
            let removed = service.delete(&id)?;
            Ok(format!("Tog bort roll \"{}\"", removed.name))
        }
    }
}

fn permissions(
    action: PermissionAction,
    db: &Database,
    settings: &AppSettings,
) -> AppResult<String> {
    let service = PermissionService::new(db);
    match action {
        PermissionAction::List(args) => list::<ProjectPermission>(db, settings, &args),
        PermissionAction::Add {
            project,
            user,
            designation,
        } => {
            let mut permission = ProjectPermission::new(String::new(), &project, &user, &designation);
            let id = service.add(&mut permission)?;
            Ok(format!("Gav {} behörighet i \"{}\" ({})", user, project, id))
        }
        PermissionAction::Delete { id } => {
            let removed = service.delete(&id)?;
            Ok(format!(
                "Tog bort behörighet för {} i \"{}\"",
                removed.assigned_user, removed.project
            ))
        }
        PermissionAction::Orphans { remove } => {
            if remove {
                return Ok(format!("Tog bort {} behörigheter", service.remove_orphaned()?));
            }
            let orphans = service.orphaned()?;
            for p in &orphans {
                println!("{}\t{}\t{}\t{}", p.id, p.project, p.assigned_user, p.designation);
            }
            Ok(format!("{} behörigheter saknar projekt", orphans.len()))
        }
    }
}

fn companies(action: CompanyAction, db: &Database, settings: &AppSettings) -> AppResult<String> {
    let service = CompanyService::new(db);
    match action {
        CompanyAction::List(args) => list::<Company>(db, settings, &args),
        CompanyAction::Add {
            name,
            code,
            address,
            registration_no,
        } => {
            let mut company = Company::new(String::new(), &name, &code);
            company.address = address.unwrap_or_default();
            company.registration_no = registration_no.unwrap_or_default();
            let id = service.create(&mut company)?;
            Ok(format!("Skapade företag \"{}\" ({})", company.name, id))
        }
        CompanyAction::Delete { id } => {
            let removed = service.delete(&id)?;
            Ok(format!("Tog bort företag \"{}\"", removed.name))
        }
    }
}

fn users(action: UserAction, db: &Database, settings: &AppSettings) -> AppResult<String> {
    let service = TeamUserService::new(db);
    match action {
        UserAction::List(args) => list::<TeamUser>(db, settings, &args),
        UserAction::Add { name, email, role } => {
            let mut user = TeamUser::new(String::new(), &name, &email, &role);
            let id = service.add(&mut user)?;
            Ok(format!("Lade till {} ({})", user.email, id))
        }
        UserAction::Delete { id } => {
            let removed = service.delete(&id)?;
            Ok(format!("Tog bort {}", removed.email))
        }
    }
}

fn optional_date(value: Option<&str>) -> AppResult<Option<chrono::NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => match parse_date(s) {
            Some(date) => Ok(Some(date)),
            None => Err(AppError::validation(format!("Ogiltigt datum: {}", s))),
        },
    }
}

/// Tabellvy med sökning, sortering och sidstorlek från argumenten
fn table_view<T: Entity + TableRow>(
    db: &Database,
    settings: &AppSettings,
    args: &ListArgs,
) -> AppResult<EntityTableView<T>> {
    let page_size = match args.page_size {
        Some(size) => match PageSize::from_value(size) {
            Some(page_size) => page_size,
            None => {
                return Err(AppError::validation(format!(
                    "Sidstorlek {} stöds inte (10, 25, 50 eller 100)",
                    size
                )))
            }
        },
        None => settings.page_size(),
    };

    let mut view = EntityTableView::<T>::new(db, page_size)?;
    if let Some(query) = &args.search {
        view.set_query(query);
    }
    if let Some(column) = &args.sort {
        if !T::columns().iter().any(|c| c.id == column) {
            let known: Vec<&str> = T::columns().iter().map(|c| c.id).collect();
            return Err(AppError::validation(format!(
                "Okänd kolumn {} (välj bland {})",
                column,
                known.join(", ")
            )));
        }
        view.toggle_sort(column);
        if args.desc {
            view.toggle_sort(column);
        }
    }
    Ok(view)
}

fn list<T: Entity + TableRow>(
    db: &Database,
    settings: &AppSettings,
    args: &ListArgs,
) -> AppResult<String> {
    let mut view = table_view::<T>(db, settings, args)?;
    view.set_page(args.page);
    let page = view.page();

    let columns = T::columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.title.chars().count()).collect();
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| columns.iter().map(|c| row.cell(c.id).display()).collect())
        .collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c.title, *w))
        .collect();
    println!("ID\t{}", header.join("  "));
    for (row, cells) in page.rows.iter().zip(&cells) {
        let line: Vec<String> = cells.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        println!("{}\t{}", row.id(), line.join("  "));
    }

    Ok(match page.range() {
        Some((first, last)) => format!(
            "Visar {} till {} av {} (sida {} av {})",
            first, last, page.total, page.page, page.page_count
        ),
        None => "Inga poster".to_string(),
    })
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{}{}", value, " ".repeat(width.saturating_sub(len)))
}

fn export<T: Entity + TableRow>(
    db: &Database,
    settings: &AppSettings,
    args: &ListArgs,
    dir: &Path,
) -> AppResult<String> {
    let view = table_view::<T>(db, settings, args)?;
    let result = view.export_csv(dir)?;
    Ok(result.summary())
}

fn watch(db: &Database, settings: &AppSettings, entities: &[EntityKind]) -> AppResult<String> {
    let topics: Vec<Topic> = if entities.is_empty() {
        Topic::all().to_vec()
    } else {
        entities.iter().map(|e| e.topic()).collect()
    };

    let subscription = db.subscribe(&topics);
    let _watcher = db.watch_external(settings.poll_interval())?;
    eprintln!(
        "Bevakar {} (Ctrl+C avslutar)",
        topics.iter().map(|t| t.signal_name()).collect::<Vec<_>>().join(", ")
    );

    loop {
        if let Some(event) = subscription.next_timeout(Duration::from_secs(1)) {
            let origin = match event.origin {
                Origin::Local => "lokal",
                Origin::External => "extern",
            };
            println!(
                "{}\t{}\t{}",
                chrono::Local::now().format("%H:%M:%S"),
                event.topic,
                origin
            );
        }
    }
}

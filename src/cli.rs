use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use byggdesk::sync::Topic;

#[derive(Parser, Debug)]
#[command(name = "byggdesk")]
#[command(about = "Administration av byggprojekt, roller och behörigheter")]
#[command(version)]
pub struct Cli {
    /// Databasfil (ersätter inställningen)
    #[arg(long, value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Utförlig loggning
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Projekt
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Delprojekt
    Subprojects {
        #[command(subcommand)]
        action: SubprojectAction,
    },
    /// Roller
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },
    /// Projektbehörigheter
    Permissions {
        #[command(subcommand)]
        action: PermissionAction,
    },
    /// Företag
    Companies {
        #[command(subcommand)]
        action: CompanyAction,
    },
    /// Användare
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Exportera en tabell som CSV
    Export {
        entity: EntityKind,
        /// Målkatalog (standard: Dokument)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Skriv ut ändringar gjorda av andra processer
    Watch {
        /// Tabeller att bevaka (standard: alla)
        entities: Vec<EntityKind>,
    },
    /// Logga in
    Login { email: String },
    /// Logga ut
    Logout,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Sök i alla sökbara kolumner
    #[arg(long)]
    pub search: Option<String>,
    /// Kolumn att sortera på
    #[arg(long)]
    pub sort: Option<String>,
    /// Fallande sortering
    #[arg(long, requires = "sort")]
    pub desc: bool,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// 10, 25, 50 eller 100
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    List(ListArgs),
    Add {
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: Option<String>,
        /// ÅÅÅÅ-MM-DD
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Ändra status: planning, active, on-hold, completed
    Status { id: String, status: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SubprojectAction {
    List(ListArgs),
    Add {
        name: String,
        #[arg(long)]
        project: String,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum RoleAction {
    List(ListArgs),
    Add { name: String },
    Rename { id: String, name: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PermissionAction {
    List(ListArgs),
    Add {
        #[arg(long)]
        project: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        designation: String,
    },
    Delete { id: String },
    /// Visa eller ta bort behörigheter vars projekt saknas
    Orphans {
        #[arg(long)]
        remove: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CompanyAction {
    List(ListArgs),
    Add {
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        registration_no: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    List(ListArgs),
    Add {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        role: String,
    },
    Delete { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Projects,
    Subprojects,
    Roles,
    Permissions,
    Companies,
    Users,
}

impl EntityKind {
    pub fn topic(self) -> Topic {
        match self {
            EntityKind::Projects => Topic::Projects,
            EntityKind::Subprojects => Topic::Subprojects,
            EntityKind::Roles => Topic::Roles,
            EntityKind::Permissions => Topic::Permissions,
            EntityKind::Companies => Topic::Companies,
            EntityKind::Users => Topic::Users,
        }
    }
}

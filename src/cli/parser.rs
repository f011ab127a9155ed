use crate::models::reference::ReferenceKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for entrybook
/// Web application to keep entries, vendors and departments in SQLite
#[derive(Parser)]
#[command(
    name = "entrybook",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small CRUD web application: list, create, edit and delete entries stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use an alternate configuration file
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RefKindArg {
    Vendor,
    Department,
}

impl From<RefKindArg> for ReferenceKind {
    fn from(k: RefKindArg) -> Self {
        match k {
            RefKindArg::Vendor => ReferenceKind::Vendor,
            RefKindArg::Department => ReferenceKind::Department,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Start the web server
    Serve {
        /// Host to bind to (overrides the configuration)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on (overrides the configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show or check the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing or invalid fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Add or list vendors and departments
    Ref {
        /// Which reference table to work on
        #[arg(value_enum)]
        kind: RefKindArg,

        #[arg(long = "add", value_name = "NAME", help = "Add a new row with this name")]
        add: Option<String>,

        #[arg(long = "list", help = "List rows in option order")]
        list: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

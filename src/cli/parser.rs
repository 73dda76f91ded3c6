use clap::{Parser, Subcommand};

/// Command-line interface definition for rBerichtsheft
/// CLI application to record weekly training reports with SQLite
#[derive(Parser)]
#[command(
    name = "rberichtsheft",
    version = env!("CARGO_PKG_VERSION"),
    about = "Record weekly apprenticeship training reports in a local SQLite store",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the settings stored in the database
    Settings {
        #[arg(long = "list", help = "List all stored settings")]
        list: bool,

        #[arg(long = "get", value_name = "KEY", help = "Print a single setting")]
        get: Option<String>,

        #[arg(
            long = "set",
            value_name = "KEY=VALUE",
            help = "Store a setting (JSON values are stored structured)"
        )]
        set: Option<String>,
    },

    /// Add or replace the report of an ISO week
    Add {
        /// Year of the ISO week (default: week after the last report)
        year: Option<i32>,

        /// ISO week number (1-53)
        week: Option<u32>,

        #[arg(long = "nr", help = "Sequence number (default: last number + 1)")]
        nr: Option<i64>,

        #[arg(long = "name", help = "Trainee name (default: 'trainee_name' setting)")]
        name: Option<String>,

        /// Day entries in weekday order: CATEGORY|HH:MM|activities
        #[arg(
            long = "day",
            value_name = "CATEGORY|HH:MM|TEXT",
            help = "Day entry, repeat up to five times (Monday first)"
        )]
        days: Vec<String>,
    },

    /// List stored reports
    List {
        #[arg(long, short, help = "Only reports of this year")]
        year: Option<i32>,
    },

    /// Show a single report with its day entries
    Show {
        /// Report id (YYYY-WW)
        id: String,
    },

    /// Delete a report, or all of them
    Del {
        /// Report id (YYYY-WW)
        #[arg(required_unless_present = "all")]
        id: Option<String>,

        #[arg(long = "all", conflicts_with = "id", help = "Delete ALL reports")]
        all: bool,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Import reports from a JSON file (object keyed by report id)
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Manage text templates
    Templates {
        #[arg(long = "list", help = "List templates in order")]
        list: bool,

        #[arg(long = "add", value_name = "TEXT", help = "Append a template")]
        add: Option<String>,

        #[arg(long = "remove", value_name = "N", help = "Remove template number N")]
        remove: Option<usize>,

        #[arg(long = "clear", help = "Remove all templates")]
        clear: bool,
    },

    /// Show statistics over all reports
    Stats,

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

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

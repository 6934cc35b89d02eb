use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rollcall
/// RFID attendance console for schools, backed by SQLite
#[derive(Parser, Debug)]
#[command(
    name = "rollcall",
    version = env!("CARGO_PKG_VERSION"),
    about = "School attendance console: students, classes, RFID taps and a live display on SQLite",
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

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

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

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create an admin account
    Register {
        #[arg(long, help = "Full name")]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, help = "At least 6 characters")]
        password: String,

        #[arg(long, help = "Repeat the password")]
        confirm: String,
    },

    /// Sign in as an admin
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,

    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Manage classes
    Class {
        #[command(subcommand)]
        action: RefAction,
    },

    /// Manage departments
    Dept {
        #[command(subcommand)]
        action: RefAction,
    },

    /// Manage sections
    Section {
        #[command(subcommand)]
        action: RefAction,
    },

    /// Manage attendance records
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },

    /// Record an RFID card tap (what the reader does at the gate)
    Tap {
        /// Card UID as read by the reader
        uid: String,

        #[arg(
            long = "at",
            help = "Tap time (YYYY-MM-DD HH:MM:SS), defaults to now"
        )]
        at: Option<String>,
    },

    /// Attendance report, optionally exported to a file
    Report {
        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, or ranges like YYYY-MM:YYYY-MM)"
        )]
        range: Option<String>,

        #[arg(long, help = "present, late, excused, sick, absent")]
        status: Option<String>,

        #[arg(long, help = "Class name")]
        class: Option<String>,

        #[arg(long, help = "Match on student name or NIS")]
        search: Option<String>,

        #[arg(long, value_enum, requires = "file", help = "Export format")]
        export: Option<ExportFormat>,

        #[arg(long, value_name = "FILE", help = "Output file path (absolute path required)")]
        file: Option<String>,

        #[arg(long, help = "Overwrite the output file without asking")]
        force: bool,
    },

    /// Totals shown on the settings screen
    Stats,

    /// Live display of the latest tap
    Live {
        #[arg(long, help = "Fetch once, print and exit")]
        once: bool,

        #[arg(long = "for", value_name = "SECS", help = "Stop after this many seconds")]
        for_secs: Option<u64>,
    },
}

/// Shared by `class`, `dept` and `section`.
#[derive(Subcommand, Debug)]
pub enum RefAction {
    /// Add an entry
    Add { name: String },

    /// List entries with their number of students
    List {
        #[arg(long)]
        search: Option<String>,
    },

    /// Rename an entry
    Rename { name: String, new_name: String },

    /// Delete an entry no student refers to
    Del {
        name: String,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentAction {
    /// Register a student
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, help = "School registration number")]
        nis: String,

        #[arg(long, help = "RFID card UID")]
        rfid: Option<String>,

        #[arg(long)]
        class: Option<String>,

        #[arg(long)]
        dept: Option<String>,

        #[arg(long)]
        section: Option<String>,
    },

    /// List students
    List {
        #[arg(long, help = "Match on name or NIS")]
        search: Option<String>,
    },

    /// Update a student identified by NIS
    Update {
        nis: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "new-nis")]
        new_nis: Option<String>,

        #[arg(long, conflicts_with = "clear_rfid")]
        rfid: Option<String>,

        #[arg(long = "clear-rfid", help = "Detach the RFID card")]
        clear_rfid: bool,

        #[arg(long, help = "Class name, empty to clear")]
        class: Option<String>,

        #[arg(long, help = "Department name, empty to clear")]
        dept: Option<String>,

        #[arg(long, help = "Section name, empty to clear")]
        section: Option<String>,
    },

    /// Delete a student and their attendance
    Del {
        nis: String,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceAction {
    /// List attendance records with a per-status summary
    List {
        #[arg(long, short, help = "YYYY, YYYY-MM, YYYY-MM-DD or a start:end range")]
        range: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        class: Option<String>,

        #[arg(long, help = "Match on student name or NIS")]
        search: Option<String>,
    },

    /// Add a manual entry
    Add {
        /// Student NIS
        nis: String,

        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[arg(long = "in", help = "Check-in time (HH:MM[:SS])")]
        check_in: Option<String>,

        #[arg(long = "out", help = "Check-out time (HH:MM[:SS])")]
        check_out: Option<String>,

        #[arg(long, help = "present/hadir, late/terlambat, excused/izin, sick/sakit, absent/alpha")]
        status: String,

        #[arg(long)]
        note: Option<String>,
    },

    /// Edit a record by id
    Edit {
        id: String,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long = "out", conflicts_with = "clear_out", help = "Check-out time (HH:MM[:SS])")]
        check_out: Option<String>,

        #[arg(long = "clear-out", help = "Remove the check-out time")]
        clear_out: bool,
    },

    /// Delete a record by id
    Del {
        id: String,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

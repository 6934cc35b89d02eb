//! rollcall library root.
//! Exposes the CLI parser, the high-level run() function and the modules
//! the live display and the tests build on.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod live;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use core::session::{Access, check_access};
use errors::AppResult;
use tracing_subscriber::{EnvFilter, fmt};
use ui::messages::info;

/// Diagnostics go to stderr; `RUST_LOG` wins over the configured filter.
fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Access::AlreadySignedIn(s) = check_access(&cli.command, cfg)? {
        info(format!(
            "Already signed in as {} <{}>. Run `rollcall logout` first.",
            s.full_name, s.email
        ));
        return Ok(());
    }

    use cli::commands as c;
    match &cli.command {
        Commands::Init => c::init::handle(cli),
        Commands::Config { .. } => c::config::handle(&cli.command),
        Commands::Db { .. } => c::db::handle(&cli.command, cfg),
        Commands::Log { .. } => c::log::handle(&cli.command, cfg),
        Commands::Register { .. }
        | Commands::Login { .. }
        | Commands::Logout
        | Commands::Whoami => c::auth::handle(&cli.command, cfg),
        Commands::Student { .. } => c::student::handle(&cli.command, cfg),
        Commands::Class { .. } | Commands::Dept { .. } | Commands::Section { .. } => {
            c::refdata::handle(&cli.command, cfg)
        }
        Commands::Attendance { .. } => c::attendance::handle(&cli.command, cfg),
        Commands::Tap { .. } => c::tap::handle(&cli.command, cfg),
        Commands::Report { .. } => c::report::handle(&cli.command, cfg),
        Commands::Stats => c::stats::handle(cfg),
        Commands::Live { .. } => c::live::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    init_logging(&cfg);
    tracing::debug!(database = %cfg.database, "starting");

    dispatch(&cli, &cfg)
}

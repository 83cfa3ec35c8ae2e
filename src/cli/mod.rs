pub mod commands;
pub mod init;
pub mod client;
pub mod project;
pub mod task;
pub mod timer;
pub mod payment;
pub mod report;
pub mod export;
pub mod search;

pub use commands::*;

use rusqlite::Connection;

use crate::config::{self, Config};
use crate::db::connection;
use crate::error::FptError;
use crate::output;

/// Per-invocation settings handed to every command handler.
pub struct Context {
    pub json: bool,
    pub config: Config,
}

/// Run one parsed invocation and return the process exit code.
pub fn run(cli: Cli) -> i32 {
    let json = cli.json;
    let result = dispatch(cli);
    finish(result, json)
}

fn dispatch(cli: Cli) -> Result<(), FptError> {
    let config = config::load_config(cli.db)?;
    let ctx = Context {
        json: cli.json,
        config,
    };

    // Opening creates the file and schema, so `init` only reports.
    let conn: Connection = connection::open_db(&ctx.config.database_path)?;
    match cli.command {
        Commands::Init => init::run(&ctx),
        Commands::Client(cmd) => client::run(cmd, &conn, &ctx),
        Commands::Project(cmd) => project::run(cmd, &conn, &ctx),
        Commands::Task(cmd) => task::run(cmd, &conn, &ctx),
        Commands::Timer(cmd) => timer::run(cmd, &conn, &ctx),
        Commands::Payment(cmd) => payment::run(cmd, &conn, &ctx),
        Commands::Progress { project } => report::run_progress(project.as_deref(), &conn, &ctx),
        Commands::Report { client, project } => {
            report::run_report(client.as_deref(), project.as_deref(), &conn, &ctx)
        }
        Commands::Export { path } => export::run(path, &conn, &ctx),
        Commands::Search { term } => search::run(&term, &conn, &ctx),
    }
}

/// Report a failed command and map it to an exit code.
pub fn finish(result: Result<(), FptError>, json_output: bool) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::debug!("Command failed with {}: {}", e.code.as_str(), e.message);
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            e.exit_code()
        }
    }
}

use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::TimerCommands;
use crate::cli::Context;
use crate::db::{connection, task_repo, time_log_repo};
use crate::error::FptError;
use crate::models::{self, TimeLog};
use crate::output;

pub fn run(cmd: TimerCommands, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    match cmd {
        TimerCommands::Start { task_id } => {
            let log = connection::with_transaction(conn, |conn| {
                let task = task_repo::resolve_task(conn, &task_id)?;
                time_log_repo::start_timer(conn, task.id, models::now())
            })?;
            log::info!("Started timer {} for task {}", log.id, log.task_id);
            if ctx.json {
                output::json::print(&output::json::success(json!({
                    "time_log": output::json::time_log_json(&log)
                })));
            } else {
                output::text::print_timer_started(&log);
            }
            Ok(())
        }
        TimerCommands::Stop { task_id } => {
            let log = connection::with_transaction(conn, |conn| {
                let task = task_repo::resolve_task(conn, &task_id)?;
                time_log_repo::stop_timer(conn, task.id, models::now())
            })?;
            log::info!("Stopped timer {} for task {}", log.id, log.task_id);
            if ctx.json {
                output::json::print(&output::json::success(json!({
                    "time_log": output::json::time_log_json(&log)
                })));
            } else {
                output::text::print_timer_stopped(&log);
            }
            Ok(())
        }
        TimerCommands::List { task } => {
            let logs = match task {
                Some(reference) => {
                    let task = task_repo::resolve_task(conn, &reference)?;
                    time_log_repo::list_time_logs_by_task(conn, task.id)?
                }
                None => time_log_repo::list_time_logs(conn)?,
            };
            if ctx.json {
                let total: i64 = logs.iter().filter_map(TimeLog::duration_minutes).sum();
                output::json::print(&output::json::success(json!({
                    "time_logs": logs.iter().map(output::json::time_log_json).collect::<Vec<_>>(),
                    "total_minutes": total
                })));
            } else {
                output::text::print_time_logs(&logs);
            }
            Ok(())
        }
    }
}

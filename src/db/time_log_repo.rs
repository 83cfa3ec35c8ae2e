use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::FptError;
use crate::models::TimeLog;

use super::task_repo;

const TIME_LOG_COLUMNS: &str = "id, task_id, start_time, end_time";

/// Open a new time log for a task. Fails if one is already open.
pub fn start_timer(conn: &Connection, task_id: i64, at: NaiveDateTime) -> Result<TimeLog, FptError> {
    task_repo::get_task_by_id(conn, task_id)?;
    if open_log_for_task(conn, task_id)?.is_some() {
        return Err(FptError::timer_already_running(task_id));
    }

    conn.execute(
        "INSERT INTO time_logs (task_id, start_time) VALUES (?1, ?2)",
        params![task_id, at],
    )?;
    let id = conn.last_insert_rowid();
    log::trace!("Opened time log {id} for task {task_id}");
    get_time_log_by_id(conn, id)
}

/// Close the most recently started open log of a task.
pub fn stop_timer(conn: &Connection, task_id: i64, at: NaiveDateTime) -> Result<TimeLog, FptError> {
    task_repo::get_task_by_id(conn, task_id)?;
    let open = open_log_for_task(conn, task_id)?
        .ok_or_else(|| FptError::no_running_timer(task_id))?;
    if at < open.start_time {
        return Err(FptError::validation(format!(
            "Stop time {at} is before the timer start {}",
            open.start_time
        )));
    }

    conn.execute(
        "UPDATE time_logs SET end_time = ?1 WHERE id = ?2",
        params![at, open.id],
    )?;
    log::trace!("Closed time log {} for task {task_id}", open.id);
    get_time_log_by_id(conn, open.id)
}

pub fn get_time_log_by_id(conn: &Connection, id: i64) -> Result<TimeLog, FptError> {
    conn.query_row(
        &format!("SELECT {TIME_LOG_COLUMNS} FROM time_logs WHERE id = ?1"),
        params![id],
        row_to_time_log,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FptError::time_log_not_found(id),
        _ => FptError::from(e),
    })
}

pub fn open_log_for_task(conn: &Connection, task_id: i64) -> Result<Option<TimeLog>, FptError> {
    let log = conn
        .query_row(
            &format!(
                "SELECT {TIME_LOG_COLUMNS} FROM time_logs
                 WHERE task_id = ?1 AND end_time IS NULL
                 ORDER BY start_time DESC, id DESC
                 LIMIT 1"
            ),
            params![task_id],
            row_to_time_log,
        )
        .optional()?;
    Ok(log)
}

pub fn list_time_logs(conn: &Connection) -> Result<Vec<TimeLog>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TIME_LOG_COLUMNS} FROM time_logs ORDER BY id ASC"
    ))?;
    let logs = stmt
        .query_map([], row_to_time_log)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(logs)
}

pub fn list_time_logs_by_task(conn: &Connection, task_id: i64) -> Result<Vec<TimeLog>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TIME_LOG_COLUMNS} FROM time_logs WHERE task_id = ?1 ORDER BY id ASC"
    ))?;
    let logs = stmt
        .query_map(params![task_id], row_to_time_log)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(logs)
}

fn row_to_time_log(row: &rusqlite::Row) -> rusqlite::Result<TimeLog> {
    Ok(TimeLog {
        id: row.get(0)?,
        task_id: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
    })
}

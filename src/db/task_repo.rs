use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::error::FptError;
use crate::models::Task;

use super::{like_contains, project_repo};

const TASK_COLUMNS: &str = "id, project_id, description, is_completed, created_at, completed_at";

pub fn create_task(
    conn: &Connection,
    project_id: i64,
    description: &str,
    created_at: NaiveDateTime,
) -> Result<Task, FptError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(FptError::validation("Task description must not be empty"));
    }
    project_repo::get_project_by_id(conn, project_id)?;

    conn.execute(
        "INSERT INTO tasks (project_id, description, is_completed, created_at)
         VALUES (?1, ?2, 0, ?3)",
        params![project_id, description, created_at],
    )?;
    let id = conn.last_insert_rowid();
    log::trace!("Inserted task {id} in project {project_id}");
    get_task_by_id(conn, id)
}

pub fn get_task_by_id(conn: &Connection, id: i64) -> Result<Task, FptError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FptError::task_not_found(&id.to_string()),
        _ => FptError::from(e),
    })
}

/// Resolve a task reference. Tasks are addressed by numeric ID only.
pub fn resolve_task(conn: &Connection, reference: &str) -> Result<Task, FptError> {
    let reference = reference.trim();
    let id = reference
        .parse::<i64>()
        .map_err(|_| FptError::task_not_found(reference))?;
    get_task_by_id(conn, id)
}

pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, FptError> {
    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC"))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn list_tasks_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Task>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1 ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![project_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn search_tasks(conn: &Connection, term: &str) -> Result<Vec<Task>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE description LIKE ?1 ESCAPE '\\' ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![like_contains(term)], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Flip an incomplete task to complete. Returns `false` when the task was
/// already complete and nothing changed.
pub fn mark_task_complete(
    conn: &Connection,
    id: i64,
    completed_at: NaiveDateTime,
) -> Result<bool, FptError> {
    let changed = conn.execute(
        "UPDATE tasks SET is_completed = 1, completed_at = ?1
         WHERE id = ?2 AND is_completed = 0",
        params![completed_at, id],
    )?;
    Ok(changed == 1)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        description: row.get(2)?,
        is_completed: row.get(3)?,
        created_at: row.get(4)?,
        completed_at: row.get(5)?,
    })
}

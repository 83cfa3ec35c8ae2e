use rusqlite::Connection;

use crate::error::FptError;

pub fn run_migrations(conn: &Connection) -> Result<(), FptError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
            contact_person TEXT,
            email TEXT,
            phone TEXT
        );

        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            description TEXT,
            deadline TEXT,
            priority TEXT NOT NULL DEFAULT 'Medium'
                CHECK (priority IN ('Low', 'Medium', 'High')),
            status TEXT NOT NULL DEFAULT 'Pending'
                CHECK (status IN ('Pending', 'In Progress', 'Completed', 'On Hold')),
            is_recurring INTEGER NOT NULL DEFAULT 0,
            recurrence_interval TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            description TEXT NOT NULL CHECK (length(trim(description)) > 0),
            is_completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            completed_at TEXT,
            CHECK ((is_completed = 0) = (completed_at IS NULL))
        );

        CREATE TABLE IF NOT EXISTS payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            amount REAL NOT NULL CHECK (amount >= 0),
            payment_type TEXT NOT NULL
                CHECK (payment_type IN ('Invoice', 'Received', 'Pending')),
            date TEXT NOT NULL,
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS time_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            start_time TEXT NOT NULL,
            end_time TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_projects_client ON projects(client_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        CREATE INDEX IF NOT EXISTS idx_payments_project ON payments(project_id);
        CREATE INDEX IF NOT EXISTS idx_time_logs_task ON time_logs(task_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_time_logs_one_open
            ON time_logs(task_id) WHERE end_time IS NULL;
        ",
    )?;
    Ok(())
}

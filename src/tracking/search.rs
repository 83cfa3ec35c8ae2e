use rusqlite::Connection;

use crate::db::{client_repo, payment_repo, project_repo, task_repo};
use crate::error::FptError;
use crate::models::{Client, Payment, Project, Task};

/// Matches per entity type. Empty groups are kept so callers can say so.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub term: String,
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub payments: Vec<Payment>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
            && self.projects.is_empty()
            && self.tasks.is_empty()
            && self.payments.is_empty()
    }

    pub fn total(&self) -> usize {
        self.clients.len() + self.projects.len() + self.tasks.len() + self.payments.len()
    }
}

/// Case-insensitive substring search over client name/contact/email/phone,
/// project name/description, task description and payment notes.
pub fn search(conn: &Connection, term: &str) -> Result<SearchResults, FptError> {
    if term.trim().is_empty() {
        return Err(FptError::validation("Search term must not be empty"));
    }
    let results = SearchResults {
        term: term.to_string(),
        clients: client_repo::search_clients(conn, term)?,
        projects: project_repo::search_projects(conn, term)?,
        tasks: task_repo::search_tasks(conn, term)?,
        payments: payment_repo::search_payments(conn, term)?,
    };
    log::debug!("Search '{term}' matched {} rows", results.total());
    Ok(results)
}

use std::collections::HashMap;

use rusqlite::Connection;

use crate::db::{client_repo, payment_repo, project_repo, task_repo};
use crate::error::FptError;
use crate::models::{Client, Payment, PaymentType, Project, Task};

use super::progress::ProjectProgress;

/// Which part of the client → project hierarchy to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Client(i64),
    Project(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentTotals {
    pub invoiced: f64,
    pub received: f64,
    pub pending: f64,
}

impl PaymentTotals {
    pub fn from_payments(payments: &[Payment]) -> Self {
        payments.iter().fold(Self::default(), |mut acc, p| {
            match p.payment_type {
                PaymentType::Invoice => acc.invoiced += p.amount,
                PaymentType::Received => acc.received += p.amount,
                PaymentType::Pending => acc.pending += p.amount,
            }
            acc
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub project: Project,
    pub progress: ProjectProgress,
    pub tasks: Vec<Task>,
    pub payments: Vec<Payment>,
    pub totals: PaymentTotals,
}

#[derive(Debug, Clone)]
pub struct ClientReport {
    pub client: Client,
    pub projects: Vec<ProjectReport>,
}

/// Load a project's tasks and payments and summarise them.
pub fn project_report(conn: &Connection, project: Project) -> Result<ProjectReport, FptError> {
    let tasks = task_repo::list_tasks_by_project(conn, project.id)?;
    let payments = payment_repo::list_payments_by_project(conn, project.id)?;
    Ok(ProjectReport {
        progress: ProjectProgress::from_tasks(&tasks),
        totals: PaymentTotals::from_payments(&payments),
        project,
        tasks,
        payments,
    })
}

/// Clients by name, each with its projects (by id) and their tasks and
/// payments (by id). Scoped reports keep only the owning client.
pub fn assemble(conn: &Connection, scope: ReportScope) -> Result<Vec<ClientReport>, FptError> {
    let clients = match scope {
        ReportScope::All => client_repo::list_clients(conn)?,
        ReportScope::Client(id) => vec![client_repo::get_client_by_id(conn, id)?],
        ReportScope::Project(id) => {
            let project = project_repo::get_project_by_id(conn, id)?;
            vec![client_repo::get_client_by_id(conn, project.client_id)?]
        }
    };

    let mut reports = Vec::with_capacity(clients.len());
    for client in clients {
        let projects = match scope {
            ReportScope::Project(id) => vec![project_repo::get_project_by_id(conn, id)?],
            _ => project_repo::list_projects_by_client(conn, client.id)?,
        };
        let projects = projects
            .into_iter()
            .map(|p| project_report(conn, p))
            .collect::<Result<Vec<_>, _>>()?;
        reports.push(ClientReport { client, projects });
    }
    Ok(reports)
}

/// Id → name lookups for labelling rows with their parent.
#[derive(Debug, Default)]
pub struct NameIndex {
    clients: HashMap<i64, String>,
    projects: HashMap<i64, String>,
}

impl NameIndex {
    pub fn load(conn: &Connection) -> Result<Self, FptError> {
        let clients = client_repo::list_clients(conn)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let projects = project_repo::list_projects(conn)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        Ok(Self { clients, projects })
    }

    pub fn client(&self, id: i64) -> &str {
        self.clients.get(&id).map(String::as_str).unwrap_or("N/A")
    }

    pub fn project(&self, id: i64) -> &str {
        self.projects.get(&id).map(String::as_str).unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::error::ErrorCode;
    use crate::models::{self, NewClient, NewPayment, NewProject};

    fn client(conn: &Connection, name: &str) -> Client {
        client_repo::create_client(
            conn,
            &NewClient {
                name: name.into(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn project(conn: &Connection, client_id: i64, name: &str) -> Project {
        project_repo::create_project(
            conn,
            &NewProject {
                client_id,
                name: name.into(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn pay(conn: &Connection, project_id: i64, amount: f64, kind: PaymentType) {
        payment_repo::create_payment(
            conn,
            &NewPayment {
                project_id,
                amount,
                payment_type: kind,
                date: models::now(),
                notes: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_assemble_orders_clients_by_name() {
        let conn = open_in_memory().unwrap();
        let zeta = client(&conn, "Zeta");
        let acme = client(&conn, "Acme");
        project(&conn, zeta.id, "Z1");
        let a2 = project(&conn, acme.id, "A2");
        let a1 = project(&conn, acme.id, "A1");
        task_repo::create_task(&conn, a2.id, "first", models::now()).unwrap();

        let report = assemble(&conn, ReportScope::All).unwrap();
        let names: Vec<_> = report.iter().map(|c| c.client.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Zeta"]);

        let project_ids: Vec<_> = report[0].projects.iter().map(|p| p.project.id).collect();
        assert_eq!(project_ids, vec![a2.id, a1.id]);
        assert_eq!(report[0].projects[0].tasks.len(), 1);
        assert_eq!(report[0].projects[0].progress.percentage, 0.0);
    }

    #[test]
    fn test_project_scope_keeps_single_branch() {
        let conn = open_in_memory().unwrap();
        let acme = client(&conn, "Acme");
        let other = client(&conn, "Other");
        project(&conn, acme.id, "A1");
        let a2 = project(&conn, acme.id, "A2");
        project(&conn, other.id, "O1");

        let report = assemble(&conn, ReportScope::Project(a2.id)).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].client.id, acme.id);
        assert_eq!(report[0].projects.len(), 1);
        assert_eq!(report[0].projects[0].project.id, a2.id);

        let err = assemble(&conn, ReportScope::Project(999)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }

    #[test]
    fn test_client_scope() {
        let conn = open_in_memory().unwrap();
        let acme = client(&conn, "Acme");
        client(&conn, "Other");
        project(&conn, acme.id, "A1");
        let report = assemble(&conn, ReportScope::Client(acme.id)).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].projects.len(), 1);
    }

    #[test]
    fn test_payment_totals() {
        let conn = open_in_memory().unwrap();
        let acme = client(&conn, "Acme");
        let p = project(&conn, acme.id, "Site");
        pay(&conn, p.id, 300.0, PaymentType::Received);
        pay(&conn, p.id, 200.0, PaymentType::Pending);
        pay(&conn, p.id, 500.0, PaymentType::Invoice);
        pay(&conn, p.id, 25.5, PaymentType::Received);

        let r = project_report(&conn, p).unwrap();
        assert_eq!(
            r.totals,
            PaymentTotals {
                invoiced: 500.0,
                received: 325.5,
                pending: 200.0
            }
        );
    }

    #[test]
    fn test_name_index_falls_back() {
        let conn = open_in_memory().unwrap();
        let acme = client(&conn, "Acme");
        let p = project(&conn, acme.id, "Site");
        let index = NameIndex::load(&conn).unwrap();
        assert_eq!(index.client(acme.id), "Acme");
        assert_eq!(index.project(p.id), "Site");
        assert_eq!(index.project(-1), "N/A");
    }
}

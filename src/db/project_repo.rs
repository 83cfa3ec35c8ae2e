use rusqlite::{params, Connection};

use crate::error::FptError;
use crate::models::{self, NewProject, Priority, Project, ProjectStatus};

use super::{client_repo, like_contains};

const PROJECT_COLUMNS: &str = "id, client_id, name, description, deadline, priority, status,
                               is_recurring, recurrence_interval, created_at";

pub fn create_project(conn: &Connection, new: &NewProject) -> Result<Project, FptError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(FptError::validation("Project name must not be empty"));
    }
    client_repo::get_client_by_id(conn, new.client_id)?;

    let interval = client_repo::non_blank(new.recurrence_interval.as_deref());
    if interval.is_some() && !new.is_recurring {
        return Err(FptError::validation(
            "A recurrence interval requires the project to be recurring",
        ));
    }

    conn.execute(
        "INSERT INTO projects (client_id, name, description, deadline, priority, status,
                               is_recurring, recurrence_interval, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new.client_id,
            name,
            client_repo::non_blank(new.description.as_deref()),
            new.deadline,
            new.priority.as_str(),
            ProjectStatus::Pending.as_str(),
            new.is_recurring,
            interval,
            models::now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::trace!("Inserted project {id} ({name}) for client {}", new.client_id);
    get_project_by_id(conn, id)
}

pub fn get_project_by_id(conn: &Connection, id: i64) -> Result<Project, FptError> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
        params![id],
        row_to_project,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FptError::project_not_found(&id.to_string()),
        _ => FptError::from(e),
    })
}

/// Resolve a project reference: exact name → numeric ID → unique partial name.
pub fn resolve_project(conn: &Connection, reference: &str) -> Result<Project, FptError> {
    let reference = reference.trim();

    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE name = ?1 ORDER BY id"
    ))?;
    let exact = stmt
        .query_map(params![reference], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(project) = pick_one(reference, exact)? {
        return Ok(project);
    }

    if let Ok(id) = reference.parse::<i64>() {
        return get_project_by_id(conn, id);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id"
    ))?;
    let partial = stmt
        .query_map(params![like_contains(reference)], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    pick_one(reference, partial)?.ok_or_else(|| FptError::project_not_found(reference))
}

fn pick_one(reference: &str, mut projects: Vec<Project>) -> Result<Option<Project>, FptError> {
    match projects.len() {
        0 => Ok(None),
        1 => Ok(Some(projects.remove(0))),
        _ => {
            let candidates: Vec<String> = projects
                .iter()
                .map(|p| format!("{} ({})", p.name, p.id))
                .collect();
            Err(FptError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_projects(conn: &Connection) -> Result<Vec<Project>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id ASC"
    ))?;
    let projects = stmt
        .query_map([], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn list_projects_by_client(conn: &Connection, client_id: i64) -> Result<Vec<Project>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE client_id = ?1 ORDER BY id ASC"
    ))?;
    let projects = stmt
        .query_map(params![client_id], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn search_projects(conn: &Connection, term: &str) -> Result<Vec<Project>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects
         WHERE name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
         ORDER BY id ASC"
    ))?;
    let projects = stmt
        .query_map(params![like_contains(term)], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn update_project_status(
    conn: &Connection,
    id: i64,
    status: ProjectStatus,
) -> Result<(), FptError> {
    let changed = conn.execute(
        "UPDATE projects SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(FptError::project_not_found(&id.to_string()));
    }
    log::trace!("Project {id} status set to {}", status.as_str());
    Ok(())
}

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        client_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        deadline: row.get(4)?,
        priority: Priority::from_str(&row.get::<_, String>(5)?).unwrap_or_default(),
        status: ProjectStatus::from_str(&row.get::<_, String>(6)?).unwrap_or_default(),
        is_recurring: row.get(7)?,
        recurrence_interval: row.get(8)?,
        created_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::error::ErrorCode;
    use crate::models::NewClient;

    fn setup() -> (Connection, i64) {
        let conn = open_in_memory().unwrap();
        let client = client_repo::create_client(
            &conn,
            &NewClient {
                name: "Acme".into(),
                ..Default::default()
            },
        )
        .unwrap();
        (conn, client.id)
    }

    fn new_project(client_id: i64, name: &str) -> NewProject {
        NewProject {
            client_id,
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_defaults() {
        let (conn, client_id) = setup();
        let project = create_project(&conn, &new_project(client_id, "Redesign")).unwrap();
        assert_eq!(project.priority, Priority::Medium);
        assert_eq!(project.status, ProjectStatus::Pending);
        assert!(!project.is_recurring);
        assert_eq!(project.deadline, None);
    }

    #[test]
    fn test_create_with_deadline_and_recurrence() {
        let (conn, client_id) = setup();
        let project = create_project(
            &conn,
            &NewProject {
                deadline: Some(models::parse_date("2025-07-30").unwrap()),
                priority: Priority::High,
                is_recurring: true,
                recurrence_interval: Some("monthly".into()),
                ..new_project(client_id, "Retainer")
            },
        )
        .unwrap();
        let fetched = get_project_by_id(&conn, project.id).unwrap();
        assert_eq!(fetched.deadline.unwrap().to_string(), "2025-07-30");
        assert_eq!(fetched.priority, Priority::High);
        assert_eq!(fetched.recurrence_interval.as_deref(), Some("monthly"));
    }

    #[test]
    fn test_interval_without_recurring_rejected() {
        let (conn, client_id) = setup();
        let err = create_project(
            &conn,
            &NewProject {
                recurrence_interval: Some("weekly".into()),
                ..new_project(client_id, "Odd")
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_unknown_client_leaves_store_unchanged() {
        let (conn, _) = setup();
        let err = create_project(&conn, &new_project(42, "Ghost")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ClientNotFound);
        assert!(list_projects(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_and_status_update() {
        let (conn, client_id) = setup();
        let p = create_project(&conn, &new_project(client_id, "Website Redesign")).unwrap();
        create_project(&conn, &new_project(client_id, "Logo")).unwrap();

        assert_eq!(resolve_project(&conn, "Website Redesign").unwrap().id, p.id);
        assert_eq!(resolve_project(&conn, "website").unwrap().id, p.id);
        assert_eq!(resolve_project(&conn, &p.id.to_string()).unwrap().id, p.id);
        assert_eq!(
            resolve_project(&conn, "Mobile").unwrap_err().code,
            ErrorCode::ProjectNotFound
        );

        update_project_status(&conn, p.id, ProjectStatus::OnHold).unwrap();
        assert_eq!(get_project_by_id(&conn, p.id).unwrap().status, ProjectStatus::OnHold);
        assert_eq!(
            update_project_status(&conn, 999, ProjectStatus::Pending).unwrap_err().code,
            ErrorCode::ProjectNotFound
        );
    }

    #[test]
    fn test_list_by_client() {
        let (conn, client_id) = setup();
        let other = client_repo::create_client(
            &conn,
            &NewClient {
                name: "Globex".into(),
                ..Default::default()
            },
        )
        .unwrap();
        create_project(&conn, &new_project(client_id, "A")).unwrap();
        create_project(&conn, &new_project(other.id, "B")).unwrap();
        create_project(&conn, &new_project(client_id, "C")).unwrap();

        let names: Vec<_> = list_projects_by_client(&conn, client_id)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}

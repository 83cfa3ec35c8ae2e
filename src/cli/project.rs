use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::ProjectCommands;
use crate::cli::Context;
use crate::db::{client_repo, connection, project_repo, task_repo};
use crate::error::FptError;
use crate::models::{self, NewProject, Priority};
use crate::output;
use crate::tracking::progress::ProjectProgress;
use crate::tracking::report::NameIndex;

pub fn run(cmd: ProjectCommands, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    match cmd {
        ProjectCommands::Add {
            name,
            client,
            description,
            priority,
            deadline,
            recurring,
            interval,
        } => {
            // Validate input before touching the store.
            let priority = Priority::from_str(&priority).ok_or_else(|| {
                FptError::validation(format!(
                    "Invalid priority '{priority}'. Use Low, Medium or High"
                ))
            })?;
            let deadline = deadline.as_deref().map(models::parse_date).transpose()?;
            run_add(
                &client,
                NewProject {
                    client_id: 0,
                    name,
                    description,
                    deadline,
                    priority,
                    is_recurring: recurring,
                    recurrence_interval: interval,
                },
                conn,
                ctx,
            )
        }
        ProjectCommands::List { client } => run_list(client.as_deref(), conn, ctx),
    }
}

fn run_add(
    client_ref: &str,
    mut new: NewProject,
    conn: &Connection,
    ctx: &Context,
) -> Result<(), FptError> {
    let (project, client) = connection::with_transaction(conn, |conn| {
        let client = client_repo::resolve_client(conn, client_ref)?;
        new.client_id = client.id;
        let project = project_repo::create_project(conn, &new)?;
        Ok((project, client))
    })?;
    log::info!("Added project {} ({}) for {}", project.name, project.id, client.name);

    if ctx.json {
        let names = NameIndex::load(conn)?;
        output::json::print(&output::json::success(json!({
            "project": output::json::project_with_progress(
                &project,
                &ProjectProgress::from_tasks(&[]),
                &names
            )
        })));
    } else {
        output::text::print_project_added(&project, &client.name);
    }
    Ok(())
}

fn run_list(client_ref: Option<&str>, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let projects = match client_ref {
        Some(reference) => {
            let client = client_repo::resolve_client(conn, reference)?;
            project_repo::list_projects_by_client(conn, client.id)?
        }
        None => project_repo::list_projects(conn)?,
    };
    let rows = projects
        .into_iter()
        .map(|p| {
            let tasks = task_repo::list_tasks_by_project(conn, p.id)?;
            Ok((p, ProjectProgress::from_tasks(&tasks)))
        })
        .collect::<Result<Vec<_>, FptError>>()?;
    let names = NameIndex::load(conn)?;

    if ctx.json {
        let projects_json: Vec<_> = rows
            .iter()
            .map(|(p, progress)| output::json::project_with_progress(p, progress, &names))
            .collect();
        output::json::print(&output::json::success(json!({ "projects": projects_json })));
    } else {
        output::text::print_projects(&rows, &names);
    }
    Ok(())
}

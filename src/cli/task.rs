use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::Context;
use crate::db::{connection, project_repo, task_repo};
use crate::error::FptError;
use crate::models;
use crate::output;
use crate::tracking::propagate::{self, CompletionOutcome};
use crate::tracking::report::NameIndex;

pub fn run(cmd: TaskCommands, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    match cmd {
        TaskCommands::Add {
            project,
            description,
        } => run_add(&project, &description, conn, ctx),
        TaskCommands::List { project } => run_list(project.as_deref(), conn, ctx),
        TaskCommands::Complete { id } => run_complete(&id, conn, ctx),
    }
}

fn run_add(
    project_ref: &str,
    description: &str,
    conn: &Connection,
    ctx: &Context,
) -> Result<(), FptError> {
    let (task, project, status_change) = connection::with_transaction(conn, |conn| {
        let project = project_repo::resolve_project(conn, project_ref)?;
        propagate::add_task(conn, project.id, description, models::now())
    })?;
    log::info!("Added task {} to project {}", task.id, project.id);

    if ctx.json {
        let names = NameIndex::load(conn)?;
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task, &names),
            "project_status": project.status.as_str(),
            "status_change": status_change.map(|c| json!({
                "from": c.from.as_str(),
                "to": c.to.as_str()
            }))
        })));
    } else {
        output::text::print_task_added(&task, &project.name, ctx.config.truncate_width);
        if let Some(change) = status_change {
            output::text::print_status_change(&change);
        }
    }
    Ok(())
}

fn run_list(project_ref: Option<&str>, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let tasks = match project_ref {
        Some(reference) => {
            let project = project_repo::resolve_project(conn, reference)?;
            task_repo::list_tasks_by_project(conn, project.id)?
        }
        None => task_repo::list_tasks(conn)?,
    };
    let names = NameIndex::load(conn)?;

    if ctx.json {
        let tasks_json: Vec<_> = tasks
            .iter()
            .map(|t| output::json::task_json(t, &names))
            .collect();
        output::json::print(&output::json::success(json!({ "tasks": tasks_json })));
    } else {
        output::text::print_tasks(&tasks, &names, ctx.config.truncate_width);
    }
    Ok(())
}

fn run_complete(reference: &str, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let outcome = connection::with_transaction(conn, |conn| {
        let task = task_repo::resolve_task(conn, reference)?;
        propagate::complete_task(conn, task.id, models::now())
    })?;
    let names = NameIndex::load(conn)?;
    let width = ctx.config.truncate_width;

    match outcome {
        CompletionOutcome::Completed {
            task,
            project,
            progress,
            status_change,
        } => {
            if ctx.json {
                output::json::print(&output::json::success(json!({
                    "task": output::json::task_json(&task, &names),
                    "already_complete": false,
                    "project": output::json::project_with_progress(&project, &progress, &names),
                    "status_change": status_change.map(|c| json!({
                        "from": c.from.as_str(),
                        "to": c.to.as_str()
                    }))
                })));
            } else {
                output::text::print_task_completed(&task, status_change.as_ref(), &progress, width);
            }
        }
        CompletionOutcome::AlreadyComplete { task } => {
            if ctx.json {
                output::json::print(&output::json::success(json!({
                    "task": output::json::task_json(&task, &names),
                    "already_complete": true,
                    "message": "Task is already marked complete"
                })));
            } else {
                output::text::print_task_already_complete(&task, width);
            }
        }
    }
    Ok(())
}

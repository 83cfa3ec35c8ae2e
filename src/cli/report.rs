use rusqlite::Connection;
use serde_json::json;

use crate::cli::Context;
use crate::db::{client_repo, project_repo};
use crate::error::FptError;
use crate::output;
use crate::tracking::report::{self, NameIndex, ReportScope};

pub fn run_progress(
    project_ref: Option<&str>,
    conn: &Connection,
    ctx: &Context,
) -> Result<(), FptError> {
    let projects = match project_ref {
        Some(reference) => vec![project_repo::resolve_project(conn, reference)?],
        None => project_repo::list_projects(conn)?,
    };
    let reports = projects
        .into_iter()
        .map(|p| report::project_report(conn, p))
        .collect::<Result<Vec<_>, _>>()?;
    let names = NameIndex::load(conn)?;

    if ctx.json {
        let projects_json: Vec<_> = reports
            .iter()
            .map(|r| output::json::project_with_progress(&r.project, &r.progress, &names))
            .collect();
        output::json::print(&output::json::success(json!({ "projects": projects_json })));
    } else {
        output::text::print_progress_report(&reports, &names);
    }
    Ok(())
}

pub fn run_report(
    client_ref: Option<&str>,
    project_ref: Option<&str>,
    conn: &Connection,
    ctx: &Context,
) -> Result<(), FptError> {
    let scope = match (client_ref, project_ref) {
        (_, Some(reference)) => {
            ReportScope::Project(project_repo::resolve_project(conn, reference)?.id)
        }
        (Some(reference), None) => {
            ReportScope::Client(client_repo::resolve_client(conn, reference)?.id)
        }
        (None, None) => ReportScope::All,
    };
    let clients = report::assemble(conn, scope)?;

    if ctx.json {
        let names = NameIndex::load(conn)?;
        output::json::print(&output::json::success(output::json::report_json(&clients, &names)));
    } else {
        output::text::print_report(&clients, ctx.config.truncate_width);
    }
    Ok(())
}

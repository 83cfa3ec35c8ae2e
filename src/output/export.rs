use std::fs::File;
use std::io::Write;
use std::path::Path;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::{client_repo, payment_repo, project_repo, task_repo, time_log_repo};
use crate::error::FptError;
use crate::models::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::tracking::progress::ProjectProgress;
use crate::tracking::report::NameIndex;

const NA: &str = "N/A";

/// Row counts written per section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub clients: usize,
    pub projects: usize,
    pub tasks: usize,
    pub payments: usize,
    pub time_logs: usize,
}

/// Write every entity to `path` as sectioned CSV.
///
/// A failure part-way leaves whatever was already written on disk.
pub fn export_to_path(conn: &Connection, path: &Path) -> Result<ExportSummary, FptError> {
    let file = File::create(path).map_err(|e| {
        FptError::export(format!("Error exporting data to '{}': {e}", path.display()))
    })?;
    let summary = write_export(conn, file)?;
    log::info!("Exported {summary:?} to {}", path.display());
    Ok(summary)
}

/// Sections in order Clients, Projects, Tasks, Payments, TimeLogs. Each is a
/// marker row, a header row, data rows and a blank separator row.
pub fn write_export<W: Write>(conn: &Connection, out: W) -> Result<ExportSummary, FptError> {
    let names = NameIndex::load(conn)?;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
    let mut summary = ExportSummary::default();

    section(&mut writer, "Clients", &["ID", "Name", "Contact Person", "Email", "Phone"])?;
    for c in client_repo::list_clients(conn)? {
        writer.write_record([
            c.id.to_string(),
            c.name,
            c.contact_person.unwrap_or_default(),
            c.email.unwrap_or_default(),
            c.phone.unwrap_or_default(),
        ])?;
        summary.clients += 1;
    }
    end_section(&mut writer)?;

    section(
        &mut writer,
        "Projects",
        &[
            "ID",
            "Project Name",
            "Client Name",
            "Description",
            "Deadline",
            "Priority",
            "Status",
            "Progress (%)",
        ],
    )?;
    for p in project_repo::list_projects(conn)? {
        let tasks = task_repo::list_tasks_by_project(conn, p.id)?;
        let progress = ProjectProgress::from_tasks(&tasks);
        writer.write_record([
            p.id.to_string(),
            p.name.clone(),
            names.client(p.client_id).to_string(),
            p.description.clone().unwrap_or_default(),
            p.deadline
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| NA.into()),
            p.priority.as_str().to_string(),
            p.status.as_str().to_string(),
            format!("{:.2}", progress.percentage),
        ])?;
        summary.projects += 1;
    }
    end_section(&mut writer)?;

    section(
        &mut writer,
        "Tasks",
        &["ID", "Project Name", "Description", "Completed", "Created At", "Completed At"],
    )?;
    for t in task_repo::list_tasks(conn)? {
        writer.write_record([
            t.id.to_string(),
            names.project(t.project_id).to_string(),
            t.description,
            if t.is_completed { "Yes" } else { "No" }.to_string(),
            t.created_at.format(TIMESTAMP_FORMAT).to_string(),
            t.completed_at
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| NA.into()),
        ])?;
        summary.tasks += 1;
    }
    end_section(&mut writer)?;

    section(
        &mut writer,
        "Payments",
        &["ID", "Project Name", "Amount", "Type", "Date", "Notes"],
    )?;
    for p in payment_repo::list_payments(conn)? {
        writer.write_record([
            p.id.to_string(),
            names.project(p.project_id).to_string(),
            format!("{:.2}", p.amount),
            p.payment_type.as_str().to_string(),
            p.date.format(TIMESTAMP_FORMAT).to_string(),
            p.notes.unwrap_or_default(),
        ])?;
        summary.payments += 1;
    }
    end_section(&mut writer)?;

    section(
        &mut writer,
        "TimeLogs",
        &["ID", "Task ID", "Start", "End", "Duration (min)"],
    )?;
    for l in time_log_repo::list_time_logs(conn)? {
        writer.write_record([
            l.id.to_string(),
            l.task_id.to_string(),
            l.start_time.format(TIMESTAMP_FORMAT).to_string(),
            l.end_time
                .map(|e| e.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| NA.into()),
            l.duration_minutes()
                .map(|m| m.to_string())
                .unwrap_or_else(|| NA.into()),
        ])?;
        summary.time_logs += 1;
    }
    end_section(&mut writer)?;

    writer.flush()?;
    Ok(summary)
}

fn section<W: Write>(
    writer: &mut csv::Writer<W>,
    name: &str,
    headers: &[&str],
) -> Result<(), FptError> {
    writer.write_record([format!("--- {name} ---")])?;
    writer.write_record(headers)?;
    Ok(())
}

fn end_section<W: Write>(writer: &mut csv::Writer<W>) -> Result<(), FptError> {
    writer.write_record(None::<&[u8]>)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::models::{self, NewClient, NewPayment, NewProject, PaymentType};

    fn seed(conn: &Connection) -> Vec<(i64, f64, PaymentType)> {
        let client = client_repo::create_client(
            conn,
            &NewClient {
                name: "Clarion Hotel".into(),
                email: Some("ops@clarion.test".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let project = project_repo::create_project(
            conn,
            &NewProject {
                client_id: client.id,
                name: "Website Redesign".into(),
                deadline: Some(models::parse_date("2025-07-30").unwrap()),
                ..Default::default()
            },
        )
        .unwrap();
        let t = task_repo::create_task(conn, project.id, "Design mockups", models::now()).unwrap();
        task_repo::create_task(conn, project.id, "Implement, frontend", models::now()).unwrap();
        task_repo::mark_task_complete(conn, t.id, models::now()).unwrap();

        [
            (300.0, PaymentType::Received, Some("deposit")),
            (200.0, PaymentType::Pending, None),
            (99.999, PaymentType::Invoice, Some("quote \"final\", v2")),
        ]
        .into_iter()
        .map(|(amount, kind, notes)| {
            let p = payment_repo::create_payment(
                conn,
                &NewPayment {
                    project_id: project.id,
                    amount,
                    payment_type: kind,
                    date: models::now(),
                    notes: notes.map(String::from),
                },
            )
            .unwrap();
            (p.id, p.amount, p.payment_type)
        })
        .collect()
    }

    fn export_string(conn: &Connection) -> (String, ExportSummary) {
        let mut buf = Vec::new();
        let summary = write_export(conn, &mut buf).unwrap();
        (String::from_utf8(buf).unwrap(), summary)
    }

    fn section_rows(csv_text: &str, name: &str) -> Vec<csv::StringRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_text.as_bytes());
        let marker = format!("--- {name} ---");
        let mut rows = Vec::new();
        let mut inside = false;
        for record in reader.records() {
            let record = record.unwrap();
            let first = record.get(0).unwrap_or("");
            if first.starts_with("--- ") {
                inside = first == marker;
                continue;
            }
            if inside && !(record.len() == 1 && first.is_empty()) {
                rows.push(record);
            }
        }
        rows
    }

    #[test]
    fn test_sections_in_order() {
        let conn = open_in_memory().unwrap();
        seed(&conn);
        let (text, summary) = export_string(&conn);
        let markers: Vec<_> = text.lines().filter(|l| l.starts_with("--- ")).collect();
        assert_eq!(
            markers,
            vec![
                "--- Clients ---",
                "--- Projects ---",
                "--- Tasks ---",
                "--- Payments ---",
                "--- TimeLogs ---"
            ]
        );
        assert_eq!(
            summary,
            ExportSummary {
                clients: 1,
                projects: 1,
                tasks: 2,
                payments: 3,
                time_logs: 0
            }
        );
    }

    #[test]
    fn test_project_row_formats() {
        let conn = open_in_memory().unwrap();
        seed(&conn);
        let (text, _) = export_string(&conn);
        let rows = section_rows(&text, "Projects");
        assert_eq!(&rows[0][0], "ID");
        let row = &rows[1];
        assert_eq!(&row[2], "Clarion Hotel");
        assert_eq!(&row[4], "2025-07-30");
        assert_eq!(&row[6], "Pending");
        assert_eq!(&row[7], "50.00");
    }

    #[test]
    fn test_payment_triples_survive_reparse() {
        let conn = open_in_memory().unwrap();
        let stored = seed(&conn);
        let (text, _) = export_string(&conn);

        let rows = section_rows(&text, "Payments");
        let parsed: Vec<(i64, f64, PaymentType)> = rows
            .iter()
            .skip(1)
            .map(|r| {
                (
                    r[0].parse().unwrap(),
                    r[2].parse().unwrap(),
                    PaymentType::from_str(&r[3]).unwrap(),
                )
            })
            .collect();
        assert_eq!(parsed, stored);
        assert_eq!(&rows[3][5], "quote \"final\", v2");
        assert_eq!(&rows[3][2], "100.00");
        assert_eq!(stored[2].1, 100.0);
    }

    #[test]
    fn test_missing_values_placeholders() {
        let conn = open_in_memory().unwrap();
        seed(&conn);
        let (text, _) = export_string(&conn);

        let clients = section_rows(&text, "Clients");
        assert_eq!(&clients[1][2], "");
        assert_eq!(&clients[1][3], "ops@clarion.test");
        assert_eq!(&clients[1][4], "");

        let projects = section_rows(&text, "Projects");
        assert_eq!(&projects[1][3], "");

        let tasks = section_rows(&text, "Tasks");
        assert_eq!(&tasks[1][3], "Yes");
        assert_ne!(&tasks[1][5], "N/A");
        assert_eq!(&tasks[2][3], "No");
        assert_eq!(&tasks[2][5], "N/A");

        let payments = section_rows(&text, "Payments");
        assert_eq!(&payments[2][5], "");
    }

    #[test]
    fn test_empty_store_still_has_headers() {
        let conn = open_in_memory().unwrap();
        let (text, summary) = export_string(&conn);
        assert_eq!(summary, ExportSummary::default());
        assert!(text.contains("ID,Name,Contact Person,Email,Phone"));
        assert_eq!(section_rows(&text, "Payments").len(), 1);
    }

    #[test]
    fn test_export_to_unwritable_path() {
        let conn = open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        let err = export_to_path(&conn, &path).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ExportError);
        assert!(err.message.contains("out.csv"));
    }
}

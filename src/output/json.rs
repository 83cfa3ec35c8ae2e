use serde_json::{json, Value};

use crate::error::FptError;
use crate::models::{Client, Payment, Project, Task, TimeLog, DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::tracking::progress::ProjectProgress;
use crate::tracking::report::{ClientReport, NameIndex, PaymentTotals, ProjectReport};
use crate::tracking::search::SearchResults;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &FptError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

/// Pretty-print a JSON value on stdout.
pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => log::error!("Could not serialize JSON output: {e}"),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn progress_json(p: &ProjectProgress) -> Value {
    json!({
        "total": p.total,
        "completed": p.completed,
        "percentage": round2(p.percentage)
    })
}

pub fn totals_json(t: &PaymentTotals) -> Value {
    json!({
        "invoiced": round2(t.invoiced),
        "received": round2(t.received),
        "pending": round2(t.pending)
    })
}

pub fn client_json(c: &Client) -> Value {
    json!({
        "id": c.id,
        "name": c.name,
        "contact_person": c.contact_person,
        "email": c.email,
        "phone": c.phone
    })
}

pub fn project_json(p: &Project, names: &NameIndex) -> Value {
    json!({
        "id": p.id,
        "client_id": p.client_id,
        "client": names.client(p.client_id),
        "name": p.name,
        "description": p.description,
        "deadline": p.deadline.map(|d| d.format(DATE_FORMAT).to_string()),
        "priority": p.priority.as_str(),
        "status": p.status.as_str(),
        "is_recurring": p.is_recurring,
        "recurrence_interval": p.recurrence_interval
    })
}

pub fn project_with_progress(p: &Project, progress: &ProjectProgress, names: &NameIndex) -> Value {
    let mut v = project_json(p, names);
    v["progress"] = progress_json(progress);
    v
}

pub fn task_json(t: &Task, names: &NameIndex) -> Value {
    json!({
        "id": t.id,
        "project_id": t.project_id,
        "project": names.project(t.project_id),
        "description": t.description,
        "is_completed": t.is_completed,
        "created_at": t.created_at.format(TIMESTAMP_FORMAT).to_string(),
        "completed_at": t.completed_at.map(|at| at.format(TIMESTAMP_FORMAT).to_string())
    })
}

pub fn payment_json(p: &Payment, names: &NameIndex) -> Value {
    json!({
        "id": p.id,
        "project_id": p.project_id,
        "project": names.project(p.project_id),
        "amount": round2(p.amount),
        "type": p.payment_type.as_str(),
        "date": p.date.format(TIMESTAMP_FORMAT).to_string(),
        "notes": p.notes
    })
}

pub fn time_log_json(l: &TimeLog) -> Value {
    json!({
        "id": l.id,
        "task_id": l.task_id,
        "start_time": l.start_time.format(TIMESTAMP_FORMAT).to_string(),
        "end_time": l.end_time.map(|e| e.format(TIMESTAMP_FORMAT).to_string()),
        "duration_minutes": l.duration_minutes()
    })
}

pub fn project_report_json(r: &ProjectReport, names: &NameIndex) -> Value {
    let mut v = project_with_progress(&r.project, &r.progress, names);
    v["tasks"] = json!(r.tasks.iter().map(|t| task_json(t, names)).collect::<Vec<_>>());
    v["payments"] = json!(r.payments.iter().map(|p| payment_json(p, names)).collect::<Vec<_>>());
    v["totals"] = totals_json(&r.totals);
    v
}

pub fn report_json(clients: &[ClientReport], names: &NameIndex) -> Value {
    let clients: Vec<_> = clients
        .iter()
        .map(|c| {
            let mut v = client_json(&c.client);
            v["projects"] = json!(c
                .projects
                .iter()
                .map(|r| project_report_json(r, names))
                .collect::<Vec<_>>());
            v
        })
        .collect();
    json!({ "clients": clients })
}

pub fn search_json(r: &SearchResults, names: &NameIndex) -> Value {
    json!({
        "term": r.term,
        "clients": r.clients.iter().map(client_json).collect::<Vec<_>>(),
        "projects": r.projects.iter().map(|p| project_json(p, names)).collect::<Vec<_>>(),
        "tasks": r.tasks.iter().map(|t| task_json(t, names)).collect::<Vec<_>>(),
        "payments": r.payments.iter().map(|p| payment_json(p, names)).collect::<Vec<_>>()
    })
}

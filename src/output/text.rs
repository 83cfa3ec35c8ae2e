use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{row, Table};

use crate::models::{Client, Payment, Project, Task, TimeLog, DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::tracking::progress::ProjectProgress;
use crate::tracking::propagate::StatusChange;
use crate::tracking::report::{ClientReport, NameIndex, ProjectReport};
use crate::tracking::search::SearchResults;

/// Shorten `s` to `width` characters plus an ellipsis. Display only.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let head: String = s.chars().take(width).collect();
    format!("{head}...")
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn print_client_added(c: &Client) {
    println!("Client '{}' added with ID: {}", c.name, c.id);
}

pub fn print_clients(clients: &[Client]) {
    if clients.is_empty() {
        println!("No clients found.");
        return;
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Name", "Contact Person", "Email", "Phone"]);
    for c in clients {
        table.add_row(row![
            c.id,
            c.name,
            or_na(c.contact_person.as_deref()),
            or_na(c.email.as_deref()),
            or_na(c.phone.as_deref())
        ]);
    }
    table.printstd();
}

pub fn print_project_added(p: &Project, client_name: &str) {
    println!(
        "Project '{}' added for client '{}' with ID: {}",
        p.name, client_name, p.id
    );
}

pub fn print_projects(projects: &[(Project, ProjectProgress)], names: &NameIndex) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    let mut table = Table::new();
    table.set_titles(row![
        "ID", "Project Name", "Client", "Deadline", "Priority", "Status", "Recurring", "Progress"
    ]);
    for (p, progress) in projects {
        let deadline = p
            .deadline
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "N/A".into());
        let recurring = match (p.is_recurring, p.recurrence_interval.as_deref()) {
            (true, Some(interval)) => interval.to_string(),
            (true, None) => "Yes".into(),
            (false, _) => "No".into(),
        };
        table.add_row(row![
            p.id,
            p.name,
            names.client(p.client_id),
            deadline,
            p.priority.as_str(),
            p.status.as_str(),
            recurring,
            format!("{:.2}%", progress.percentage)
        ]);
    }
    table.printstd();
}

pub fn print_task_added(t: &Task, project_name: &str, width: usize) {
    println!(
        "Task '{}' added to project '{}' with ID: {}",
        truncate(&t.description, width),
        project_name,
        t.id
    );
}

pub fn print_tasks(tasks: &[Task], names: &NameIndex, width: usize) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Project Name", "Description", "Completed", "Completed At"]);
    for t in tasks {
        let completed_at = t
            .completed_at
            .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "N/A".into());
        table.add_row(row![
            t.id,
            names.project(t.project_id),
            truncate(&t.description, width),
            yes_no(t.is_completed),
            completed_at
        ]);
    }
    table.printstd();
}

pub fn print_task_completed(
    t: &Task,
    change: Option<&StatusChange>,
    progress: &ProjectProgress,
    width: usize,
) {
    println!(
        "Task '{}' (ID: {}) marked as complete.",
        truncate(&t.description, width),
        t.id
    );
    println!(
        "Project progress: {:.2}% ({}/{})",
        progress.percentage, progress.completed, progress.total
    );
    if let Some(change) = change {
        print_status_change(change);
    }
}

pub fn print_status_change(change: &StatusChange) {
    println!(
        "Project status: {} -> {}",
        change.from.as_str(),
        change.to.as_str()
    );
}

pub fn print_task_already_complete(t: &Task, width: usize) {
    println!(
        "Task '{}' (ID: {}) is already marked complete.",
        truncate(&t.description, width),
        t.id
    );
}

pub fn print_progress_report(reports: &[ProjectReport], names: &NameIndex) {
    if reports.is_empty() {
        println!("No projects found for the given criteria.");
        return;
    }
    let mut table = Table::new();
    table.set_titles(row![
        "Project ID", "Project Name", "Client", "Status", "Progress (%)", "Total Tasks", "Completed Tasks"
    ]);
    for r in reports {
        table.add_row(row![
            r.project.id,
            r.project.name,
            names.client(r.project.client_id),
            r.project.status.as_str(),
            format!("{:.2}", r.progress.percentage),
            r.progress.total,
            r.progress.completed
        ]);
    }
    table.printstd();
}

pub fn print_payment_logged(p: &Payment, project_name: &str) {
    println!(
        "Payment of {} ({}) logged for project '{}' with ID: {}",
        money(p.amount),
        p.payment_type.as_str(),
        project_name,
        p.id
    );
}

pub fn print_payments(payments: &[Payment], names: &NameIndex, width: usize) {
    if payments.is_empty() {
        println!("No payments found.");
        return;
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Project Name", "Amount", "Type", "Date", "Notes"]);
    for p in payments {
        table.add_row(row![
            p.id,
            names.project(p.project_id),
            money(p.amount),
            p.payment_type.as_str(),
            p.date.format(TIMESTAMP_FORMAT),
            truncate(p.notes.as_deref().unwrap_or(""), width)
        ]);
    }
    table.printstd();
}

pub fn print_timer_started(log: &TimeLog) {
    println!(
        "Timer started for task {} at {} (log ID: {})",
        log.task_id,
        log.start_time.format(TIMESTAMP_FORMAT),
        log.id
    );
}

pub fn print_timer_stopped(log: &TimeLog) {
    println!(
        "Timer stopped for task {}. Duration: {} minutes",
        log.task_id,
        log.duration_minutes().unwrap_or(0)
    );
}

pub fn print_time_logs(logs: &[TimeLog]) {
    if logs.is_empty() {
        println!("No time logs found.");
        return;
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Task ID", "Start", "End", "Duration (min)"]);
    for l in logs {
        let end = l
            .end_time
            .map(|e| e.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "running".into());
        let duration = l
            .duration_minutes()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".into());
        table.add_row(row![l.id, l.task_id, l.start_time.format(TIMESTAMP_FORMAT), end, duration]);
    }
    table.printstd();
    let total: i64 = logs.iter().filter_map(TimeLog::duration_minutes).sum();
    println!("Total logged: {total} minutes");
}

pub fn print_report(clients: &[ClientReport], width: usize) {
    if clients.is_empty() {
        println!("No clients found.");
        return;
    }
    for c in clients {
        println!("Client: {} (ID: {})", c.client.name, c.client.id);
        if c.projects.is_empty() {
            println!("  No projects.");
        }
        for r in &c.projects {
            let p = &r.project;
            println!(
                "  Project: {} (ID: {}) [{}] priority={} progress={:.2}% ({}/{})",
                p.name,
                p.id,
                p.status.as_str(),
                p.priority.as_str(),
                r.progress.percentage,
                r.progress.completed,
                r.progress.total
            );
            if let Some(deadline) = p.deadline {
                println!("    Deadline: {}", deadline.format(DATE_FORMAT));
            }
            for t in &r.tasks {
                let mark = if t.is_completed { "x" } else { " " };
                println!("    [{mark}] {} {}", t.id, truncate(&t.description, width));
            }
            for pay in &r.payments {
                println!(
                    "    {} {} {} {}",
                    pay.date.format(DATE_FORMAT),
                    pay.payment_type.as_str(),
                    money(pay.amount),
                    truncate(pay.notes.as_deref().unwrap_or(""), width)
                );
            }
            if !r.payments.is_empty() {
                println!(
                    "    Totals: received {} / pending {} / invoiced {}",
                    money(r.totals.received),
                    money(r.totals.pending),
                    money(r.totals.invoiced)
                );
            }
        }
    }
}

pub fn print_search(results: &SearchResults, names: &NameIndex, width: usize) {
    println!("\n--- Search Results for '{}' ---\n", results.term);
    let rule = "-".repeat(40);

    if results.clients.is_empty() {
        println!("No clients found matching the search term.");
    } else {
        println!("Clients Found:");
        let mut table = plain_table();
        table.set_titles(row!["ID", "Name", "Contact Person", "Email", "Phone"]);
        for c in &results.clients {
            table.add_row(row![
                c.id,
                c.name,
                or_na(c.contact_person.as_deref()),
                or_na(c.email.as_deref()),
                or_na(c.phone.as_deref())
            ]);
        }
        table.printstd();
    }
    println!("{rule}");

    if results.projects.is_empty() {
        println!("No projects found matching the search term.");
    } else {
        println!("Projects Found:");
        let mut table = plain_table();
        table.set_titles(row!["ID", "Project Name", "Client", "Description"]);
        for p in &results.projects {
            table.add_row(row![
                p.id,
                p.name,
                names.client(p.client_id),
                truncate(p.description.as_deref().unwrap_or(""), width)
            ]);
        }
        table.printstd();
    }
    println!("{rule}");

    if results.tasks.is_empty() {
        println!("No tasks found matching the search term.");
    } else {
        println!("Tasks Found:");
        let mut table = plain_table();
        table.set_titles(row!["ID", "Project Name", "Description", "Completed"]);
        for t in &results.tasks {
            table.add_row(row![
                t.id,
                names.project(t.project_id),
                truncate(&t.description, width),
                yes_no(t.is_completed)
            ]);
        }
        table.printstd();
    }
    println!("{rule}");

    if results.payments.is_empty() {
        println!("No payments found matching the search term.");
    } else {
        println!("Payments Found:");
        let mut table = plain_table();
        table.set_titles(row!["ID", "Project Name", "Amount", "Type", "Notes"]);
        for p in &results.payments {
            table.add_row(row![
                p.id,
                names.project(p.project_id),
                money(p.amount),
                p.payment_type.as_str(),
                truncate(p.notes.as_deref().unwrap_or(""), width)
            ]);
        }
        table.printstd();
    }
    println!("{rule}");
}

fn plain_table() -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    table
}

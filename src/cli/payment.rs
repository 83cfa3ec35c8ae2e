use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::PaymentCommands;
use crate::cli::Context;
use crate::db::{connection, payment_repo, project_repo};
use crate::error::FptError;
use crate::models::{self, NewPayment, PaymentType};
use crate::output;
use crate::tracking::report::{NameIndex, PaymentTotals};

pub fn run(cmd: PaymentCommands, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    match cmd {
        PaymentCommands::Log {
            project,
            amount,
            payment_type,
            date,
            notes,
        } => {
            let amount = parse_amount(&amount)?;
            let payment_type = PaymentType::from_str(&payment_type).ok_or_else(|| {
                FptError::validation(format!(
                    "Invalid payment type '{payment_type}'. Use Invoice, Received or Pending"
                ))
            })?;
            let date = match date.as_deref() {
                Some(d) => models::parse_date(d)?.and_time(chrono::NaiveTime::default()),
                None => models::now(),
            };
            run_log(&project, amount, payment_type, date, notes, conn, ctx)
        }
        PaymentCommands::List { project } => run_list(project.as_deref(), conn, ctx),
    }
}

fn parse_amount(input: &str) -> Result<f64, FptError> {
    let trimmed = input.trim().trim_start_matches('$');
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(FptError::validation(format!(
            "Invalid amount '{input}'. Expected a non-negative number"
        ))),
    }
}

fn run_log(
    project_ref: &str,
    amount: f64,
    payment_type: PaymentType,
    date: chrono::NaiveDateTime,
    notes: Option<String>,
    conn: &Connection,
    ctx: &Context,
) -> Result<(), FptError> {
    let (payment, project) = connection::with_transaction(conn, |conn| {
        let project = project_repo::resolve_project(conn, project_ref)?;
        let payment = payment_repo::create_payment(
            conn,
            &NewPayment {
                project_id: project.id,
                amount,
                payment_type,
                date,
                notes,
            },
        )?;
        Ok((payment, project))
    })?;
    log::info!("Logged payment {} for project {}", payment.id, project.id);

    if ctx.json {
        let names = NameIndex::load(conn)?;
        output::json::print(&output::json::success(json!({
            "payment": output::json::payment_json(&payment, &names)
        })));
    } else {
        output::text::print_payment_logged(&payment, &project.name);
    }
    Ok(())
}

fn run_list(project_ref: Option<&str>, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let payments = match project_ref {
        Some(reference) => {
            let project = project_repo::resolve_project(conn, reference)?;
            payment_repo::list_payments_by_project(conn, project.id)?
        }
        None => payment_repo::list_payments(conn)?,
    };
    let names = NameIndex::load(conn)?;

    if ctx.json {
        let payments_json: Vec<_> = payments
            .iter()
            .map(|p| output::json::payment_json(p, &names))
            .collect();
        output::json::print(&output::json::success(json!({
            "payments": payments_json,
            "totals": output::json::totals_json(&PaymentTotals::from_payments(&payments))
        })));
    } else {
        output::text::print_payments(&payments, &names, ctx.config.truncate_width);
    }
    Ok(())
}

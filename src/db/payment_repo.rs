use rusqlite::{params, Connection};

use crate::error::FptError;
use crate::models::{round_cents, NewPayment, Payment, PaymentType};

use super::{client_repo, like_contains, project_repo};

const PAYMENT_COLUMNS: &str = "id, project_id, amount, payment_type, date, notes";

pub fn create_payment(conn: &Connection, new: &NewPayment) -> Result<Payment, FptError> {
    if !new.amount.is_finite() || new.amount < 0.0 {
        return Err(FptError::validation(format!(
            "Payment amount must be a non-negative number, got {}",
            new.amount
        )));
    }
    project_repo::get_project_by_id(conn, new.project_id)?;
    let amount = round_cents(new.amount);

    conn.execute(
        "INSERT INTO payments (project_id, amount, payment_type, date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.project_id,
            amount,
            new.payment_type.as_str(),
            new.date,
            client_repo::non_blank(new.notes.as_deref()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::trace!("Inserted payment {id} for project {}", new.project_id);
    get_payment_by_id(conn, id)
}

pub fn get_payment_by_id(conn: &Connection, id: i64) -> Result<Payment, FptError> {
    conn.query_row(
        &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?1"),
        params![id],
        row_to_payment,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FptError::payment_not_found(id),
        _ => FptError::from(e),
    })
}

pub fn list_payments(conn: &Connection) -> Result<Vec<Payment>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY id ASC"
    ))?;
    let payments = stmt
        .query_map([], row_to_payment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(payments)
}

pub fn list_payments_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Payment>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE project_id = ?1 ORDER BY id ASC"
    ))?;
    let payments = stmt
        .query_map(params![project_id], row_to_payment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(payments)
}

pub fn search_payments(conn: &Connection, term: &str) -> Result<Vec<Payment>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE notes LIKE ?1 ESCAPE '\\' ORDER BY id ASC"
    ))?;
    let payments = stmt
        .query_map(params![like_contains(term)], row_to_payment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(payments)
}

fn row_to_payment(row: &rusqlite::Row) -> rusqlite::Result<Payment> {
    let kind: String = row.get(3)?;
    let payment_type = PaymentType::from_str(&kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown payment type '{kind}'").into(),
        )
    })?;
    Ok(Payment {
        id: row.get(0)?,
        project_id: row.get(1)?,
        amount: row.get(2)?,
        payment_type,
        date: row.get(4)?,
        notes: row.get(5)?,
    })
}

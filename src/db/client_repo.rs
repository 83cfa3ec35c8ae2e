use rusqlite::{params, Connection, OptionalExtension};

use crate::error::FptError;
use crate::models::{Client, NewClient};

use super::like_contains;

const CLIENT_COLUMNS: &str = "id, name, contact_person, email, phone";

pub fn create_client(conn: &Connection, new: &NewClient) -> Result<Client, FptError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(FptError::validation("Client name must not be empty"));
    }
    if find_client_by_name(conn, name)?.is_some() {
        return Err(FptError::client_name_conflict(name));
    }

    conn.execute(
        "INSERT INTO clients (name, contact_person, email, phone) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            non_blank(new.contact_person.as_deref()),
            non_blank(new.email.as_deref()),
            non_blank(new.phone.as_deref())
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::trace!("Inserted client {id} ({name})");
    get_client_by_id(conn, id)
}

pub fn get_client_by_id(conn: &Connection, id: i64) -> Result<Client, FptError> {
    conn.query_row(
        &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
        params![id],
        row_to_client,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FptError::client_not_found(&id.to_string()),
        _ => FptError::from(e),
    })
}

pub fn find_client_by_name(conn: &Connection, name: &str) -> Result<Option<Client>, FptError> {
    let client = conn
        .query_row(
            &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE name = ?1"),
            params![name],
            row_to_client,
        )
        .optional()?;
    Ok(client)
}

/// Resolve a client reference: exact name → numeric ID → unique partial name.
pub fn resolve_client(conn: &Connection, reference: &str) -> Result<Client, FptError> {
    let reference = reference.trim();
    if let Some(client) = find_client_by_name(conn, reference)? {
        return Ok(client);
    }

    if let Ok(id) = reference.parse::<i64>() {
        return get_client_by_id(conn, id);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id"
    ))?;
    let mut clients = stmt
        .query_map(params![like_contains(reference)], row_to_client)?
        .collect::<Result<Vec<_>, _>>()?;

    match clients.len() {
        0 => Err(FptError::client_not_found(reference)),
        1 => Ok(clients.remove(0)),
        _ => {
            let candidates: Vec<String> = clients
                .iter()
                .map(|c| format!("{} ({})", c.name, c.id))
                .collect();
            Err(FptError::ambiguous_ref(reference, &candidates))
        }
    }
}

/// All clients, ordered by name.
pub fn list_clients(conn: &Connection) -> Result<Vec<Client>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name ASC, id ASC"
    ))?;
    let clients = stmt
        .query_map([], row_to_client)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clients)
}

pub fn search_clients(conn: &Connection, term: &str) -> Result<Vec<Client>, FptError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients
         WHERE name LIKE ?1 ESCAPE '\\'
            OR contact_person LIKE ?1 ESCAPE '\\'
            OR email LIKE ?1 ESCAPE '\\'
            OR phone LIKE ?1 ESCAPE '\\'
         ORDER BY id ASC"
    ))?;
    let clients = stmt
        .query_map(params![like_contains(term)], row_to_client)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clients)
}

/// Delete a client together with everything it owns.
pub fn delete_client(conn: &Connection, id: i64) -> Result<(), FptError> {
    let changed = conn.execute("DELETE FROM clients WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(FptError::client_not_found(&id.to_string()));
    }
    log::trace!("Deleted client {id} and its projects");
    Ok(())
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        contact_person: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
    })
}

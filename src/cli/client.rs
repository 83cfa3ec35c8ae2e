use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::ClientCommands;
use crate::cli::Context;
use crate::db::{client_repo, connection};
use crate::error::FptError;
use crate::models::NewClient;
use crate::output;

pub fn run(cmd: ClientCommands, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    match cmd {
        ClientCommands::Add {
            name,
            contact,
            email,
            phone,
        } => run_add(
            NewClient {
                name,
                contact_person: contact,
                email,
                phone,
            },
            conn,
            ctx,
        ),
        ClientCommands::List => run_list(conn, ctx),
    }
}

fn run_add(new: NewClient, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let client = connection::with_transaction(conn, |conn| client_repo::create_client(conn, &new))?;
    log::info!("Added client {} ({})", client.name, client.id);

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "client": output::json::client_json(&client)
        })));
    } else {
        output::text::print_client_added(&client);
    }
    Ok(())
}

fn run_list(conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let clients = client_repo::list_clients(conn)?;
    if ctx.json {
        let clients_json: Vec<_> = clients.iter().map(output::json::client_json).collect();
        output::json::print(&output::json::success(json!({ "clients": clients_json })));
    } else {
        output::text::print_clients(&clients);
    }
    Ok(())
}

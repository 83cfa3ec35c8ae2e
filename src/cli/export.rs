use std::path::PathBuf;

use rusqlite::Connection;
use serde_json::json;

use crate::cli::Context;
use crate::error::FptError;
use crate::output;

pub fn run(path: Option<PathBuf>, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let path = path.unwrap_or_else(|| ctx.config.export_path.clone());
    let summary = output::export::export_to_path(conn, &path)?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "path": path.to_string_lossy(),
            "summary": summary
        })));
    } else {
        println!("All data exported successfully to '{}'", path.display());
    }
    Ok(())
}

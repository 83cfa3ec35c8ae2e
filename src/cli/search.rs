use rusqlite::Connection;

use crate::cli::Context;
use crate::error::FptError;
use crate::output;
use crate::tracking::report::NameIndex;
use crate::tracking::search;

pub fn run(term: &str, conn: &Connection, ctx: &Context) -> Result<(), FptError> {
    let results = search::search(conn, term)?;
    let names = NameIndex::load(conn)?;

    if ctx.json {
        output::json::print(&output::json::success(output::json::search_json(&results, &names)));
    } else {
        output::text::print_search(&results, &names, ctx.config.truncate_width);
    }
    Ok(())
}

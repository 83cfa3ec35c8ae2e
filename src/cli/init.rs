use serde_json::json;

use crate::cli::Context;
use crate::error::FptError;
use crate::output;

pub fn run(ctx: &Context) -> Result<(), FptError> {
    let path = &ctx.config.database_path;
    if ctx.json {
        output::json::print(&output::json::success(json!({
            "path": path.to_string_lossy()
        })));
    } else {
        println!("Database ready at {}", path.display());
    }
    Ok(())
}

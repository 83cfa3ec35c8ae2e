pub mod connection;
pub mod migrations;
pub mod client_repo;
pub mod project_repo;
pub mod task_repo;
pub mod payment_repo;
pub mod time_log_repo;

pub use connection::*;

/// `LIKE` pattern matching `term` anywhere, with `%`, `_` and `\` taken
/// literally. Use with `ESCAPE '\'`.
pub fn like_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

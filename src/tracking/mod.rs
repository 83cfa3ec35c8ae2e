pub mod progress;
pub mod propagate;
pub mod report;
pub mod search;

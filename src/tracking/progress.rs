use crate::models::Task;

/// Completion summary of one project's task set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectProgress {
    pub total: usize,
    pub completed: usize,
    pub percentage: f64,
}

impl ProjectProgress {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_completed).count();
        Self {
            total,
            completed,
            percentage: ratio(completed, total),
        }
    }

    /// True only for a non-empty task set with every task complete.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn is_started(&self) -> bool {
        self.completed > 0
    }
}

/// Percentage of completed tasks in [0, 100]; 0 for an empty set.
pub fn percentage(tasks: &[Task]) -> f64 {
    ProjectProgress::from_tasks(tasks).percentage
}

fn ratio(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64) * 100.0
}

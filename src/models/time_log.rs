use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeLog {
    pub id: i64,
    pub task_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

impl TimeLog {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Whole minutes between start and end; `None` while the log is open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_minutes())
    }
}

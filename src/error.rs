use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ClientNotFound,
    ProjectNotFound,
    TaskNotFound,
    PaymentNotFound,
    TimeLogNotFound,
    AmbiguousRef,
    ClientNameConflict,
    TimerAlreadyRunning,
    NoRunningTimer,
    ValidationError,
    ExportError,
    ConfigError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientNotFound => "CLIENT_NOT_FOUND",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::PaymentNotFound => "PAYMENT_NOT_FOUND",
            Self::TimeLogNotFound => "TIME_LOG_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::ClientNameConflict => "CLIENT_NAME_CONFLICT",
            Self::TimerAlreadyRunning => "TIMER_ALREADY_RUNNING",
            Self::NoRunningTimer => "NO_RUNNING_TIMER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ExportError => "EXPORT_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Exit status for a command that failed with this code.
    ///
    /// User-level failures end the invocation cleanly with status 0; only a
    /// broken store or configuration is reported as a process failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseError | Self::ConfigError => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct FptError {
    pub code: ErrorCode,
    pub message: String,
}

impl FptError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn client_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::ClientNotFound,
            format!("Client not found: {reference}"),
        )
    }

    pub fn project_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            format!("Project not found: {reference}"),
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {reference}"),
        )
    }

    pub fn payment_not_found(id: i64) -> Self {
        Self::new(ErrorCode::PaymentNotFound, format!("Payment not found: {id}"))
    }

    pub fn time_log_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TimeLogNotFound, format!("Time log not found: {id}"))
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn client_name_conflict(name: &str) -> Self {
        Self::new(
            ErrorCode::ClientNameConflict,
            format!("Client '{name}' already exists"),
        )
    }

    pub fn timer_already_running(task_id: i64) -> Self {
        Self::new(
            ErrorCode::TimerAlreadyRunning,
            format!("Task {task_id} already has a running timer"),
        )
    }

    pub fn no_running_timer(task_id: i64) -> Self {
        Self::new(
            ErrorCode::NoRunningTimer,
            format!("Task {task_id} has no running timer"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExportError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl From<rusqlite::Error> for FptError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<csv::Error> for FptError {
    fn from(e: csv::Error) -> Self {
        Self::export(format!("Error exporting data: {e}"))
    }
}

impl From<std::io::Error> for FptError {
    fn from(e: std::io::Error) -> Self {
        Self::export(format!("Error exporting data: {e}"))
    }
}

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

const VERSION: &str = env!("FPT_VERSION");

#[derive(Parser)]
#[command(
    name = "fpt",
    version = VERSION,
    about = "Freelance project tracker: clients, projects, tasks, time and payments",
    after_help = "\
STORAGE:
  SQLite database at $FPT_HOME/freelance_tracker.db (default: the OS data dir under fpt/).
  Override with --db <path> or FPT_DB. Optional settings in $FPT_HOME/config.json:
    {\"database_path\": \"...\", \"truncate_width\": 60, \"export_path\": \"freelance_data.csv\"}

REFERENCES:
  Clients and projects: exact name, numeric ID, or a unique part of the name.
  Tasks: numeric ID.

EXIT CODES:
  0  Success, or a reported user error (not found, duplicate, invalid input)
  1  Database or configuration failure

STATUS RULES:
  Completing a task recomputes its project's status:
    all tasks complete          -> Completed
    some complete, was Pending  -> In Progress
  Adding a task to a Completed project moves it back to In Progress.
  Completing an already complete task changes nothing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Database file to use
    #[arg(long, global = true, env = "FPT_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// More log output on stderr (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence log output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database if it does not exist yet
    Init,

    /// Client management
    #[command(subcommand)]
    Client(ClientCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task tracking
    #[command(subcommand)]
    Task(TaskCommands),

    /// Time tracking per task
    #[command(subcommand)]
    Timer(TimerCommands),

    /// Payment logging
    #[command(subcommand)]
    Payment(PaymentCommands),

    /// Task completion percentage per project
    Progress {
        /// Only this project (name or ID)
        #[arg(long)]
        project: Option<String>,
    },

    /// Client → project → task/payment overview
    Report {
        /// Only this client (name or ID)
        #[arg(long)]
        client: Option<String>,
        /// Only this project (name or ID)
        #[arg(long, conflicts_with = "client")]
        project: Option<String>,
    },

    /// Export everything to a sectioned CSV file
    #[command(after_help = "\
NOTE:
  Sections: Clients, Projects, Tasks, Payments, TimeLogs.
  Amounts use two decimals, deadlines YYYY-MM-DD, timestamps YYYY-MM-DD HH:MM:SS.
  If writing fails part-way, the partial file is left in place.")]
    Export {
        /// Output file (default: freelance_data.csv or export_path from config)
        path: Option<PathBuf>,
    },

    /// Search clients, projects, tasks and payment notes
    Search {
        /// Case-insensitive substring to look for
        term: String,
    },
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a new client
    Add {
        /// Client name (must be unique)
        name: String,
        /// Contact person at the client
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List all clients
    List,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Add a project for a client
    Add {
        /// Project name
        name: String,
        /// Owning client (name or ID)
        #[arg(long)]
        client: String,
        #[arg(long)]
        description: Option<String>,
        /// Low, Medium or High
        #[arg(long, default_value = "Medium")]
        priority: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Mark the project as recurring
        #[arg(long)]
        recurring: bool,
        /// Recurrence interval, e.g. "monthly"
        #[arg(long, requires = "recurring")]
        interval: Option<String>,
    },
    /// List projects with their progress
    List {
        /// Only projects of this client (name or ID)
        #[arg(long)]
        client: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a project
    Add {
        /// Owning project (name or ID)
        #[arg(long)]
        project: String,
        /// What needs doing
        description: String,
    },
    /// List tasks
    List {
        /// Only tasks of this project (name or ID)
        #[arg(long)]
        project: Option<String>,
    },
    /// Mark a task complete and update its project's status
    Complete {
        /// Task ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TimerCommands {
    /// Start timing a task
    Start {
        /// Task ID
        task_id: String,
    },
    /// Stop the running timer of a task
    Stop {
        /// Task ID
        task_id: String,
    },
    /// List time logs
    List {
        /// Only logs of this task ID
        #[arg(long)]
        task: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment for a project
    Log {
        /// Project (name or ID)
        #[arg(long)]
        project: String,
        /// Amount, e.g. 150.00
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Invoice, Received or Pending
        payment_type: String,
        /// Payment date (YYYY-MM-DD); defaults to now
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List payments
    List {
        /// Only payments of this project (name or ID)
        #[arg(long)]
        project: Option<String>,
    },
}

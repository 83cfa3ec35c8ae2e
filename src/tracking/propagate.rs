use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::{project_repo, task_repo};
use crate::error::FptError;
use crate::models::{Project, ProjectStatus, Task};

use super::progress::ProjectProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    /// The task flipped to complete in this call.
    Completed {
        task: Task,
        project: Project,
        progress: ProjectProgress,
        status_change: Option<StatusChange>,
    },
    /// The task was already complete; nothing was written.
    AlreadyComplete { task: Task },
}

/// Status the project should move to given its tasks, or `None` to keep it.
///
/// - all tasks complete (and at least one task) → Completed
/// - Completed but some task incomplete → In Progress
/// - Pending with some but not all tasks complete → In Progress
///
/// On Hold is only left when every task is complete.
pub fn reconcile_status(current: ProjectStatus, tasks: &[Task]) -> Option<ProjectStatus> {
    let progress = ProjectProgress::from_tasks(tasks);
    let next = if progress.is_complete() {
        ProjectStatus::Completed
    } else if current == ProjectStatus::Completed {
        // Only reachable when a task was un-completed outside this tool.
        ProjectStatus::InProgress
    } else if current == ProjectStatus::Pending && progress.is_started() {
        ProjectStatus::InProgress
    } else {
        current
    };
    (next != current).then_some(next)
}

/// Mark a task complete and propagate the result to its project.
///
/// Run inside a transaction; every write here belongs to one command.
pub fn complete_task(
    conn: &Connection,
    task_id: i64,
    now: NaiveDateTime,
) -> Result<CompletionOutcome, FptError> {
    let task = task_repo::get_task_by_id(conn, task_id)?;
    if task.is_completed || !task_repo::mark_task_complete(conn, task_id, now)? {
        log::debug!("Task {task_id} already complete, nothing to do");
        return Ok(CompletionOutcome::AlreadyComplete { task });
    }

    let mut project = project_repo::get_project_by_id(conn, task.project_id)?;
    let tasks = task_repo::list_tasks_by_project(conn, project.id)?;
    let progress = ProjectProgress::from_tasks(&tasks);
    let status_change = apply_status(conn, &mut project, &tasks)?;

    let task = task_repo::get_task_by_id(conn, task_id)?;
    Ok(CompletionOutcome::Completed {
        task,
        project,
        progress,
        status_change,
    })
}

/// Add a task and bring its project's status back in line. A Completed
/// project with a new open task returns to In Progress.
pub fn add_task(
    conn: &Connection,
    project_id: i64,
    description: &str,
    now: NaiveDateTime,
) -> Result<(Task, Project, Option<StatusChange>), FptError> {
    let task = task_repo::create_task(conn, project_id, description, now)?;
    let mut project = project_repo::get_project_by_id(conn, project_id)?;
    let tasks = task_repo::list_tasks_by_project(conn, project_id)?;
    let status_change = apply_status(conn, &mut project, &tasks)?;
    Ok((task, project, status_change))
}

fn apply_status(
    conn: &Connection,
    project: &mut Project,
    tasks: &[Task],
) -> Result<Option<StatusChange>, FptError> {
    let Some(to) = reconcile_status(project.status, tasks) else {
        return Ok(None);
    };
    project_repo::update_project_status(conn, project.id, to)?;
    let change = StatusChange {
        from: project.status,
        to,
    };
    log::info!(
        "Project {} status {} -> {}",
        project.id,
        change.from.as_str(),
        change.to.as_str()
    );
    project.status = to;
    Ok(Some(change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{client_repo, connection::open_in_memory};
    use crate::error::ErrorCode;
    use crate::models::{self, NewClient, NewProject, Priority};

    fn task(id: i64, done: bool) -> Task {
        let now = models::now();
        Task {
            id,
            project_id: 1,
            description: format!("task {id}"),
            is_completed: done,
            created_at: now,
            completed_at: done.then_some(now),
        }
    }

    fn at(h: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// Acme / Redesign (High) with two tasks.
    fn acme_redesign() -> (Connection, Project, Vec<Task>) {
        let conn = open_in_memory().unwrap();
        let client = client_repo::create_client(
            &conn,
            &NewClient {
                name: "Acme".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let project = project_repo::create_project(
            &conn,
            &NewProject {
                client_id: client.id,
                name: "Redesign".into(),
                priority: Priority::High,
                ..Default::default()
            },
        )
        .unwrap();
        let tasks = vec![
            task_repo::create_task(&conn, project.id, "Mockups", models::now()).unwrap(),
            task_repo::create_task(&conn, project.id, "Frontend", models::now()).unwrap(),
        ];
        (conn, project, tasks)
    }

    #[test]
    fn test_reconcile_rules() {
        use ProjectStatus::*;
        let none_done = [task(1, false), task(2, false)];
        let half = [task(1, true), task(2, false)];
        let all = [task(1, true), task(2, true)];

        assert_eq!(reconcile_status(Pending, &none_done), None);
        assert_eq!(reconcile_status(Pending, &half), Some(InProgress));
        assert_eq!(reconcile_status(Pending, &all), Some(Completed));
        assert_eq!(reconcile_status(InProgress, &half), None);
        assert_eq!(reconcile_status(InProgress, &all), Some(Completed));
        assert_eq!(reconcile_status(Completed, &all), None);
        assert_eq!(reconcile_status(OnHold, &half), None);
        assert_eq!(reconcile_status(OnHold, &all), Some(Completed));
    }

    #[test]
    fn test_reconcile_empty_never_completes() {
        for status in [
            ProjectStatus::Pending,
            ProjectStatus::InProgress,
            ProjectStatus::OnHold,
            ProjectStatus::Completed,
        ] {
            assert_eq!(reconcile_status(status, &[]), None);
        }
    }

    #[test]
    fn test_reconcile_reverts_stale_completed() {
        let half = [task(1, true), task(2, false)];
        assert_eq!(
            reconcile_status(ProjectStatus::Completed, &half),
            Some(ProjectStatus::InProgress)
        );
    }

    #[test]
    fn test_two_task_scenario() {
        let (conn, project, tasks) = acme_redesign();

        match complete_task(&conn, tasks[0].id, at(9)).unwrap() {
            CompletionOutcome::Completed {
                task,
                project,
                progress,
                status_change,
            } => {
                assert!(task.is_completed);
                assert_eq!(task.completed_at, Some(at(9)));
                assert_eq!(project.status, ProjectStatus::InProgress);
                assert_eq!(progress.percentage, 50.0);
                assert_eq!(
                    status_change,
                    Some(StatusChange {
                        from: ProjectStatus::Pending,
                        to: ProjectStatus::InProgress
                    })
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        match complete_task(&conn, tasks[1].id, at(10)).unwrap() {
            CompletionOutcome::Completed {
                project,
                progress,
                status_change,
                ..
            } => {
                assert_eq!(project.status, ProjectStatus::Completed);
                assert_eq!(progress.percentage, 100.0);
                assert_eq!(status_change.map(|c| c.to), Some(ProjectStatus::Completed));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let stored = project_repo::get_project_by_id(&conn, project.id).unwrap();
        assert_eq!(stored.status, ProjectStatus::Completed);
    }

    #[test]
    fn test_repeat_completion_is_a_no_op() {
        let (conn, project, tasks) = acme_redesign();
        complete_task(&conn, tasks[0].id, at(9)).unwrap();
        complete_task(&conn, tasks[1].id, at(10)).unwrap();

        let outcome = complete_task(&conn, tasks[1].id, at(11)).unwrap();
        match outcome {
            CompletionOutcome::AlreadyComplete { task } => {
                assert_eq!(task.completed_at, Some(at(10)));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let stored = task_repo::get_task_by_id(&conn, tasks[1].id).unwrap();
        assert_eq!(stored.completed_at, Some(at(10)));
        let stored = project_repo::get_project_by_id(&conn, project.id).unwrap();
        assert_eq!(stored.status, ProjectStatus::Completed);
    }

    #[test]
    fn test_completion_timestamp_iff_flag() {
        let (conn, project, tasks) = acme_redesign();
        complete_task(&conn, tasks[0].id, at(9)).unwrap();
        for t in task_repo::list_tasks_by_project(&conn, project.id).unwrap() {
            assert_eq!(t.is_completed, t.completed_at.is_some());
        }
    }

    #[test]
    fn test_on_hold_project_stays_on_hold_until_done() {
        let (conn, project, tasks) = acme_redesign();
        project_repo::update_project_status(&conn, project.id, ProjectStatus::OnHold).unwrap();

        match complete_task(&conn, tasks[0].id, at(9)).unwrap() {
            CompletionOutcome::Completed { status_change, project, .. } => {
                assert_eq!(status_change, None);
                assert_eq!(project.status, ProjectStatus::OnHold);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_task() {
        let (conn, _, _) = acme_redesign();
        let err = complete_task(&conn, 12345, at(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn test_adding_task_reopens_completed_project() {
        let (conn, project, tasks) = acme_redesign();
        complete_task(&conn, tasks[0].id, at(9)).unwrap();
        complete_task(&conn, tasks[1].id, at(10)).unwrap();

        let (task, project, change) = add_task(&conn, project.id, "Fix footer", at(11)).unwrap();
        assert!(!task.is_completed);
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(
            change,
            Some(StatusChange {
                from: ProjectStatus::Completed,
                to: ProjectStatus::InProgress
            })
        );

        let stored = project_repo::get_project_by_id(&conn, project.id).unwrap();
        let tasks = task_repo::list_tasks_by_project(&conn, project.id).unwrap();
        let all_done = tasks.iter().all(|t| t.is_completed);
        assert!(stored.status != ProjectStatus::Completed || all_done);
    }

    #[test]
    fn test_adding_task_to_pending_project_keeps_status() {
        let (conn, project, _) = acme_redesign();
        let (_, project, change) = add_task(&conn, project.id, "Copywriting", at(9)).unwrap();
        assert_eq!(change, None);
        assert_eq!(project.status, ProjectStatus::Pending);
    }

    #[test]
    fn test_adding_task_to_unknown_project() {
        let (conn, _, _) = acme_redesign();
        let err = add_task(&conn, 404, "Nothing", at(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectNotFound);
    }
}

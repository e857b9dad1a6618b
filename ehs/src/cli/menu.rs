use crate::cli::console::Console;
use crate::cli::tables::*;
use crate::error::{ehs_error, EhsError};
use crate::ledger::db_ops::{Repo, UserRepo};
use crate::ledger::worker::ReportWorker;
use crate::ledger::ViolationLabel;
use crate::session::{ManagerSession, ReportOutcome, Session, WorkerSession};
use anyhow::Result;
use entity::Role;
use log::{debug, error, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};

const MAIN_MENU: &str = "\n=== EHS System ===\n1. Register\n2. Login\n0. Exit";

const MANAGER_MENU: &str = "\n--- Manager Menu ---
1. Assign Task
2. Report Violation
3. View Rules
4. Add Rule
5. View Feedback of rules
6. View Assigned Tasks
7. Delete the task
8. Delete rules
0. Logout";

const WORKER_MENU: &str = "\n--- Worker Menu ---
1. View Assigned Tasks
2. Report Task Work
3. View Safety Rules
4. Give Feedback for Rules
5. View Feedback of Rules
0. Logout";

/// Whether the user asked to leave or the input ran dry
enum Flow {
    Continue,
    Stop,
}

/// Shared handles for every interactive session
#[derive(Clone)]
pub struct App {
    pub repo: Arc<dyn Repo + Send + Sync>,
    pub reporter: ReportWorker,
}

impl App {
    pub fn new(repo: Arc<dyn Repo + Send + Sync>, reporter: ReportWorker) -> Self {
        App { repo, reporter }
    }

    /// Top level loop, returns on Exit or end of input
    pub async fn run<R, W>(&self, console: &mut Console<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            console.say(MAIN_MENU).await?;
            let Some(choice) = console.read_line("Choice: ").await? else {
                break;
            };
            let flow = match choice.trim() {
                "0" => break,
                "1" => self.register(console).await?,
                "2" => self.login(console).await?,
                _ => {
                    console.say("Invalid choice!").await?;
                    Flow::Continue
                }
            };
            if let Flow::Stop = flow {
                break;
            }
        }
        console.say("Exiting...").await?;
        Ok(())
    }

    async fn read_credentials<R, W>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Option<(String, String)>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(username) = console
            .read_non_empty(
                "Username: ",
                "Username cannot be empty. Please enter a valid username.",
            )
            .await?
        else {
            return Ok(None);
        };
        let Some(password) = console
            .read_non_empty(
                "Password: ",
                "Password cannot be empty. Please enter a valid password.",
            )
            .await?
        else {
            return Ok(None);
        };
        Ok(Some((username, password)))
    }

    async fn register<R, W>(&self, console: &mut Console<R, W>) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some((username, password)) = self.read_credentials(console).await? else {
            return Ok(Flow::Stop);
        };
        let role = loop {
            let Some(raw) = console.read_line("Enter role (worker/manager): ").await? else {
                return Ok(Flow::Stop);
            };
            match raw.trim().parse::<Role>() {
                Ok(role) => break role,
                Err(_) if raw.trim().is_empty() => {
                    console
                        .say("Role cannot be empty. Please enter a valid role.")
                        .await?
                }
                Err(_) => {
                    console
                        .say("Invalid role. Please enter 'worker' or 'manager'.")
                        .await?
                }
            }
        };

        if self.repo.exists(username.clone(), password.clone()).await? {
            console
                .say("User already exists with these credentials!")
                .await?;
            return Ok(Flow::Continue);
        }
        match self.repo.register(username, password, role).await {
            Ok(id) => {
                console
                    .say(&format!("Registration successful! Your id is {}.", id))
                    .await?
            }
            Err(e) => report_error(console, "Registration failed", &e).await?,
        }
        Ok(Flow::Continue)
    }

    async fn login<R, W>(&self, console: &mut Console<R, W>) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some((username, password)) = self.read_credentials(console).await? else {
            return Ok(Flow::Stop);
        };
        let session = match Session::login(
            self.repo.clone(),
            self.reporter.clone(),
            username,
            password,
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                report_error(console, "Login failed", &e).await?;
                return Ok(Flow::Continue);
            }
        };

        console.say(&format!("Logged in successfully as {}!", session.role())).await?;
        match session {
            Session::Manager(manager) => manager_menu(&manager, console).await,
            Session::Worker(mut worker) => worker_menu(&mut worker, console).await,
        }
    }
}

/// Print an error the way the menus show them, store failures also go to the log
async fn report_error<R, W>(
    console: &mut Console<R, W>,
    context: &str,
    err: &anyhow::Error,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match ehs_error(err) {
        Some(e @ EhsError::Store(_)) | Some(e @ EhsError::MediaCopy { .. }) => {
            error!("{}: {}", context, e);
            console.say(&format!("{}: {}", context, e)).await
        }
        Some(e) if e.is_input_error() => {
            debug!("{}: {}", context, e);
            console.say(&format!("{}: {}", context, e)).await
        }
        Some(e) => {
            warn!("{}: {}", context, e);
            console.say(&format!("{}: {}", context, e)).await
        }
        None => {
            error!("{}: {:#}", context, err);
            console.say(&format!("{}: {:#}", context, err)).await
        }
    }
}

async fn manager_menu<R, W>(manager: &ManagerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        console.say(MANAGER_MENU).await?;
        let Some(choice) = console.read_line("Enter choice: ").await? else {
            return Ok(Flow::Stop);
        };
        let flow = match choice.trim() {
            "1" => assign_task(manager, console).await?,
            "2" => report_violation(manager, console).await?,
            "3" => {
                show_rules(console, manager.view_rules().await).await?;
                Flow::Continue
            }
            "4" => add_rule(manager, console).await?,
            "5" => {
                show_feedback(console, manager.view_feedback().await).await?;
                Flow::Continue
            }
            "6" => {
                show_tasks(console, manager.list_all().await, true).await?;
                Flow::Continue
            }
            "7" => delete_task(manager, console).await?,
            "8" => delete_rule(manager, console).await?,
            "0" => {
                console.say("Logging out...").await?;
                return Ok(Flow::Continue);
            }
            _ => {
                console.say("Invalid choice!").await?;
                Flow::Continue
            }
        };
        if let Flow::Stop = flow {
            return Ok(Flow::Stop);
        }
    }
}

async fn worker_menu<R, W>(worker: &mut WorkerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let flow = loop {
        let finished = worker.collect_finished().await;
        announce_reports(console, finished).await?;

        console.say(WORKER_MENU).await?;
        let Some(choice) = console.read_line("Enter choice: ").await? else {
            break Flow::Stop;
        };
        let flow = match choice.trim() {
            "1" => {
                show_tasks(console, worker.list_tasks().await, false).await?;
                Flow::Continue
            }
            "2" => report_task_work(worker, console).await?,
            "3" => {
                show_rules(console, worker.view_rules().await).await?;
                Flow::Continue
            }
            "4" => give_feedback(worker, console).await?,
            "5" => {
                show_feedback(console, worker.view_feedback().await).await?;
                Flow::Continue
            }
            "0" => {
                console.say("Logging out...").await?;
                break Flow::Continue;
            }
            _ => {
                console.say("Invalid choice!").await?;
                Flow::Continue
            }
        };
        if let Flow::Stop = flow {
            break Flow::Stop;
        }
    };

    if worker.pending_reports() > 0 {
        console
            .say(&format!(
                "Waiting for {} report(s) to finish...",
                worker.pending_reports()
            ))
            .await?;
        let outcomes = worker.wait_reports().await;
        announce_reports(console, outcomes).await?;
    }
    Ok(flow)
}

async fn announce_reports<R, W>(
    console: &mut Console<R, W>,
    outcomes: Vec<ReportOutcome>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for (task_id, outcome) in outcomes {
        match outcome {
            Ok(_) => {
                console
                    .say(&format!("Task {} report submitted successfully.", task_id))
                    .await?
            }
            Err(e) => {
                report_error(
                    console,
                    &format!("Failed to submit report for task {}", task_id),
                    &e,
                )
                .await?
            }
        }
    }
    Ok(())
}

async fn show_tasks<R, W>(
    console: &mut Console<R, W>,
    tasks: Result<Vec<entity::tasks::Model>>,
    with_worker: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match tasks {
        Ok(tasks) if tasks.is_empty() => console.say("No tasks found.").await,
        Ok(tasks) => console.say(&task_table(&tasks, with_worker)).await,
        Err(e) => report_error(console, "Failed to load tasks", &e).await,
    }
}

async fn show_rules<R, W>(
    console: &mut Console<R, W>,
    rules: Result<Vec<entity::rules::Model>>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match rules {
        Ok(rules) if rules.is_empty() => console.say("No safety rules yet.").await,
        Ok(rules) => console.say(&rule_table(&rules)).await,
        Err(e) => report_error(console, "Failed to load rules", &e).await,
    }
}

async fn show_feedback<R, W>(
    console: &mut Console<R, W>,
    rules: Result<Vec<entity::rules::Model>>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match rules {
        Ok(rules) if rules.is_empty() => console.say("No safety rules yet.").await,
        Ok(rules) => console.say(&feedback_table(&rules)).await,
        Err(e) => report_error(console, "Failed to load feedback", &e).await,
    }
}

async fn assign_task<R, W>(manager: &ManagerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match manager.list_workers().await {
        Ok(workers) if workers.is_empty() => console.say("No workers registered yet.").await?,
        Ok(workers) => {
            console.say("\n--- Available Workers ---").await?;
            console.say(&account_table(&workers)).await?
        }
        Err(e) => report_error(console, "Failed to load workers", &e).await?,
    }

    let Some(worker_id) = console
        .read_id(
            "Enter worker ID (non-negative number): ",
            "Invalid input. Please try again.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };
    let Some(description) = console
        .read_non_empty(
            "Enter task description: ",
            "Task description cannot be empty.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };

    match manager.assign(worker_id, description).await {
        Ok(task_id) => {
            console
                .say(&format!("Task {} assigned successfully.", task_id))
                .await?
        }
        Err(e) => report_error(console, "Failed to assign task", &e).await?,
    }
    Ok(Flow::Continue)
}

async fn report_violation<R, W>(
    manager: &ManagerSession,
    console: &mut Console<R, W>,
) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("\n--- Assigned Tasks ---").await?;
    show_tasks(console, manager.list_pending().await, true).await?;

    let Some(task_id) = console
        .read_id(
            "Enter Task ID to report violation: ",
            "Invalid input. Task ID must be a non-negative number.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };
    let label = loop {
        let Some(raw) = console
            .read_line("Enter new task status (e.g., violation, incomplete): ")
            .await?
        else {
            return Ok(Flow::Stop);
        };
        match ViolationLabel::parse(&raw) {
            Ok(label) => break label,
            Err(_) => {
                console
                    .say("Invalid input. Task status must be a non-numeric string.")
                    .await?
            }
        }
    };
    let Some(comment) = console
        .read_line("Enter violation comment (optional): ")
        .await?
    else {
        return Ok(Flow::Stop);
    };

    match manager
        .report_violation(task_id, label.as_str(), comment)
        .await
    {
        Ok(()) => console.say("Task updated with violation info.").await?,
        Err(e) => report_error(console, "Failed to update task", &e).await?,
    }
    Ok(Flow::Continue)
}

async fn add_rule<R, W>(manager: &ManagerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(text) = console
        .read_non_empty(
            "Enter the new safety rule: ",
            "Rule cannot be empty. Please enter a valid safety rule.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };
    match manager.add_rule(text).await {
        Ok(_) => console.say("New rule added successfully.").await?,
        Err(e) => report_error(console, "Failed to add rule", &e).await?,
    }
    Ok(Flow::Continue)
}

async fn delete_task<R, W>(manager: &ManagerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("\n--- Existing Tasks ---").await?;
    show_tasks(console, manager.list_all().await, true).await?;

    let Some(task_id) = console
        .read_id(
            "Enter Task ID to delete: ",
            "Invalid input. Task ID must be a non-negative number.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };
    match manager.delete_task(task_id).await {
        Ok(()) => console.say("Task deleted successfully.").await?,
        Err(e) => report_error(console, "Failed to delete task", &e).await?,
    }
    Ok(Flow::Continue)
}

async fn delete_rule<R, W>(manager: &ManagerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("\n--- Existing Rules ---").await?;
    show_rules(console, manager.view_rules().await).await?;

    let Some(rule_id) = console
        .read_id(
            "Enter Rule ID to delete: ",
            "Invalid input. Rule ID must be a non-negative number.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };
    match manager.delete_rule(rule_id).await {
        Ok(()) => console.say("Rule deleted successfully.").await?,
        Err(e) => report_error(console, "Failed to delete rule", &e).await?,
    }
    Ok(Flow::Continue)
}

async fn report_task_work<R, W>(
    worker: &mut WorkerSession,
    console: &mut Console<R, W>,
) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let open = match worker.list_open_tasks().await {
        Ok(open) => open,
        Err(e) => {
            report_error(console, "Failed to fetch assigned tasks", &e).await?;
            return Ok(Flow::Continue);
        }
    };
    if open.is_empty() {
        console.say("No open tasks to report.").await?;
        return Ok(Flow::Continue);
    }
    console.say("\nAssigned Tasks:").await?;
    console.say(&task_table(&open, false)).await?;

    let task_id = loop {
        let Some(id) = console
            .read_id(
                "Enter Task ID to report: ",
                "Invalid or unassigned task ID. Try again.",
            )
            .await?
        else {
            return Ok(Flow::Stop);
        };
        if open.iter().any(|t| t.id == id) {
            break id;
        }
        console
            .say("Invalid or unassigned task ID. Try again.")
            .await?;
    };
    let Some(report) = console.read_line("Enter report description: ").await? else {
        return Ok(Flow::Stop);
    };
    let Some(media) = console
        .read_non_empty(
            "Enter path to media file: ",
            "Media path cannot be empty.",
        )
        .await?
    else {
        return Ok(Flow::Stop);
    };

    match worker
        .report_work(task_id, report, PathBuf::from(media.trim()))
        .await
    {
        Ok(handle) => {
            worker.track(handle);
            console
                .say(&format!(
                    "Report for task {} accepted, saving in the background.",
                    task_id
                ))
                .await?
        }
        Err(e) => report_error(console, "Failed to submit report", &e).await?,
    }
    Ok(Flow::Continue)
}

async fn give_feedback<R, W>(worker: &WorkerSession, console: &mut Console<R, W>) -> Result<Flow>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("\n--- Available Rules ---").await?;
    show_rules(console, worker.view_rules().await).await?;

    let Some(rule_id) = console
        .read_id("Enter Rule ID to give feedback: ", "Invalid Rule ID. Try again.")
        .await?
    else {
        return Ok(Flow::Stop);
    };
    let Some(feedback) = console
        .read_non_empty("Enter your feedback: ", "Feedback cannot be empty.")
        .await?
    else {
        return Ok(Flow::Stop);
    };
    match worker.give_feedback(rule_id, feedback).await {
        Ok(()) => console.say("Feedback submitted successfully.").await?,
        Err(e) => report_error(console, "Failed to submit feedback", &e).await?,
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::db_ops::{DbOpsImpl, RuleRepo, TaskRepo};
    use crate::ledger::open_memory_store;
    use crate::media::FileMedia;
    use entity::STATUS_COMPLETED;
    use std::time::Duration;

    async fn app(dir: &tempfile::TempDir) -> (App, Arc<DbOpsImpl>) {
        let repo = Arc::new(DbOpsImpl::new(open_memory_store().await.unwrap()));
        let media = Arc::new(FileMedia::new(dir.path().join("uploads")));
        let reporter = ReportWorker::new(repo.clone(), media, Duration::ZERO);
        (App::new(repo.clone(), reporter), repo)
    }

    async fn drive(app: &App, input: String) -> String {
        let mut console = Console::new(input.as_bytes(), Vec::new());
        app.run(&mut console).await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn register_rejects_bad_role_then_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = app(&dir).await;
        let out = drive(&app, "1\nalice\npw1\n\nadmin\nworker\n0\n".into()).await;
        assert!(out.contains("Role cannot be empty"));
        assert!(out.contains("Invalid role. Please enter 'worker' or 'manager'."));
        assert!(out.contains("Registration successful!"));
        assert!(out.ends_with("Exiting...\n"));
        assert!(repo.exists("alice".into(), "pw1".into()).await.unwrap());

        let out = drive(&app, "1\nalice\npw1\nworker\n1\nalice\nother\nmanager\n0\n".into()).await;
        assert!(out.contains("User already exists with these credentials!"));
        assert!(out.contains("Registration failed: user alice already exists"));
        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_login_returns_to_main_menu() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir).await;
        let out = drive(&app, "2\nghost\nnope\n7\n0\n".into()).await;
        assert!(out.contains("Login failed: invalid credentials"));
        assert!(out.contains("Invalid choice!"));
        assert!(!out.contains("Manager Menu"));
    }

    #[tokio::test]
    async fn manager_assigns_and_reports_violation() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = app(&dir).await;
        let alice = repo
            .register("alice".into(), "pw1".into(), Role::Worker)
            .await
            .unwrap();
        repo.register("bob".into(), "pw2".into(), Role::Manager)
            .await
            .unwrap();

        let script = format!(
            "2\nbob\npw2\n1\nx\n{alice}\ninspect valve\n2\n1\n123\n\nunsafe-ladder\nno harness\n6\n0\n0\n"
        );
        let out = drive(&app, script).await;
        assert!(out.contains("Logged in successfully as manager!"));
        assert!(out.contains("Invalid input. Please try again."));
        assert!(out.contains("Task 1 assigned successfully."));
        assert_eq!(
            out.matches("Invalid input. Task status must be a non-numeric string.")
                .count(),
            2
        );
        assert!(out.contains("Task updated with violation info."));
        assert!(out.contains("unsafe-ladder"));
        assert!(out.contains("Logging out..."));

        let task = repo.get_task(1).await.unwrap();
        assert_eq!(task.status, "unsafe-ladder");
        assert_eq!(task.violation_comment.as_deref(), Some("no harness"));
    }

    #[tokio::test]
    async fn manager_deletes_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = app(&dir).await;
        repo.register("bob".into(), "pw2".into(), Role::Manager)
            .await
            .unwrap();
        repo.add_rule("wear helmets".into()).await.unwrap();

        let out = drive(&app, "2\nbob\npw2\n7\n9\n8\n9\n8\n1\n3\n0\n0\n".into()).await;
        assert!(out.contains("Failed to delete task: task 9 not found"));
        assert!(out.contains("Failed to delete rule: rule 9 not found"));
        assert!(out.contains("Rule deleted successfully."));
        assert!(out.contains("No safety rules yet."));
        assert!(repo.list_rules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn worker_reports_and_waits_on_logout() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = app(&dir).await;
        let alice = repo
            .register("alice".into(), "pw1".into(), Role::Worker)
            .await
            .unwrap();
        let task_id = repo.assign(alice, "inspect valve".into()).await.unwrap();
        let rule_id = repo.add_rule("wear helmets".into()).await.unwrap();
        let media = dir.path().join("valve.jpg");
        tokio::fs::write(&media, b"jpeg").await.unwrap();

        let script = format!(
            "2\nalice\npw1\n2\n99\n{task_id}\nfixed\n{}\n4\n{rule_id}\ntoo hot\n5\n0\n0\n",
            media.display()
        );
        let out = drive(&app, script).await;
        assert!(out.contains("Invalid or unassigned task ID. Try again."));
        assert!(out.contains("accepted, saving in the background"));
        assert!(out.contains("Feedback submitted successfully."));
        assert!(out.contains("too hot"));
        assert!(out.contains(&format!("Task {} report submitted successfully.", task_id)));

        let task = repo.get_task(task_id).await.unwrap();
        assert_eq!(task.status, STATUS_COMPLETED);
        assert_eq!(task.worker_report.as_deref(), Some("fixed"));
    }

    #[tokio::test]
    async fn worker_sees_media_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = app(&dir).await;
        let alice = repo
            .register("alice".into(), "pw1".into(), Role::Worker)
            .await
            .unwrap();
        let task_id = repo.assign(alice, "inspect valve".into()).await.unwrap();

        let script =
            format!("2\nalice\npw1\n2\n{task_id}\nfixed\n/definitely/not/here.jpg\n0\n0\n");
        let out = drive(&app, script).await;
        assert!(out.contains(&format!("Failed to submit report for task {}", task_id)));
        assert_eq!(repo.get_task(task_id).await.unwrap().status, "pending");
    }

    #[tokio::test]
    async fn end_of_input_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = app(&dir).await;
        repo.register("bob".into(), "pw2".into(), Role::Manager)
            .await
            .unwrap();
        let out = drive(&app, "2\nbob\npw2\n1\n".into()).await;
        assert!(out.contains("Manager Menu"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn garbled_choice_is_rejected_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir).await;
        let mut console = Console::new(&b"\xff\xfe\n0\n"[..], Vec::new());
        app.run(&mut console).await.unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Invalid choice!"));
        assert!(out.ends_with("Exiting...\n"));
    }
}

use crate::credential::Account;
use crate::error::EhsError;
use crate::ledger::db_ops::{Repo, RuleRepo, TaskRepo, UserRepo};
use crate::ledger::worker::{ReportHandle, ReportJob, ReportWorker};
use crate::ledger::ViolationLabel;
use anyhow::Result;
use entity::rules::Model as Rule;
use entity::tasks::Model as Task;
use entity::Role;
use futures::future::join_all;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of a finished report, the stored media path or why it failed
pub type ReportOutcome = (i32, Result<String>);

/// Logged in user, the variant decides which operations exist at all
pub enum Session {
    Manager(ManagerSession),
    Worker(WorkerSession),
}

impl Session {
    pub async fn login(
        repo: Arc<dyn Repo + Send + Sync>,
        reporter: ReportWorker,
        username: String,
        password: String,
    ) -> Result<Session> {
        let account = repo.authenticate(username, password).await?;
        info!("{} {} logged in", account.role, account.username);
        Ok(Session::open(account, repo, reporter))
    }

    pub fn open(
        account: Account,
        repo: Arc<dyn Repo + Send + Sync>,
        reporter: ReportWorker,
    ) -> Session {
        match account.role {
            Role::Manager => Session::Manager(ManagerSession { account, repo }),
            Role::Worker => Session::Worker(WorkerSession {
                account,
                repo,
                reporter,
                reports: Vec::new(),
            }),
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            Session::Manager(m) => &m.account,
            Session::Worker(w) => &w.account,
        }
    }

    pub fn role(&self) -> Role {
        self.account().role
    }
}

pub struct ManagerSession {
    account: Account,
    repo: Arc<dyn Repo + Send + Sync>,
}

impl ManagerSession {
    pub fn account(&self) -> &Account {
        &self.account
    }

    pub async fn list_workers(&self) -> Result<Vec<Account>> {
        self.repo.list_workers().await
    }

    pub async fn assign(&self, worker_id: i32, description: String) -> Result<i32> {
        self.repo.assign(worker_id, description).await
    }

    pub async fn list_pending(&self) -> Result<Vec<Task>> {
        self.repo.list_pending().await
    }

    pub async fn report_violation(&self, task_id: i32, label: &str, comment: String) -> Result<()> {
        let label = ViolationLabel::parse(label)?;
        self.repo.report_violation(task_id, label, comment).await
    }

    pub async fn add_rule(&self, text: String) -> Result<i32> {
        self.repo.add_rule(text).await
    }

    pub async fn delete_rule(&self, rule_id: i32) -> Result<()> {
        self.repo.delete_rule(rule_id).await
    }

    pub async fn delete_task(&self, task_id: i32) -> Result<()> {
        self.repo.delete_task(task_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Task>> {
        self.repo.list_all().await
    }

    pub async fn view_rules(&self) -> Result<Vec<Rule>> {
        self.repo.list_rules().await
    }

    pub async fn view_feedback(&self) -> Result<Vec<Rule>> {
        self.repo.list_with_feedback().await
    }
}

pub struct WorkerSession {
    account: Account,
    repo: Arc<dyn Repo + Send + Sync>,
    reporter: ReportWorker,
    reports: Vec<ReportHandle>,
}

impl WorkerSession {
    pub fn account(&self) -> &Account {
        &self.account
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.repo.list_for_worker(self.account.id).await
    }

    /// Tasks that can still be reported
    pub async fn list_open_tasks(&self) -> Result<Vec<Task>> {
        self.repo.list_open_for_worker(self.account.id).await
    }

    /// Hand the report to the report worker, only open tasks of this worker are accepted
    pub async fn report_work(
        &self,
        task_id: i32,
        report: String,
        media_source: PathBuf,
    ) -> Result<ReportHandle> {
        if media_source.as_os_str().is_empty() {
            return Err(EhsError::invalid("media path cannot be empty").into());
        }
        let open = self.list_open_tasks().await?;
        if !open.iter().any(|t| t.id == task_id) {
            return Err(EhsError::TaskNotFound(task_id).into());
        }

        Ok(self.reporter.submit(ReportJob {
            task_id,
            worker_id: self.account.id,
            report,
            media_source,
        }))
    }

    /// Keep a submitted report around until it is collected or waited for
    pub fn track(&mut self, handle: ReportHandle) {
        self.reports.push(handle);
    }

    pub fn pending_reports(&self) -> usize {
        self.reports.len()
    }

    /// Take the reports that already finished, the rest stay tracked
    pub async fn collect_finished(&mut self) -> Vec<ReportOutcome> {
        let (done, running): (Vec<_>, Vec<_>) =
            self.reports.drain(..).partition(|h| h.is_finished());
        self.reports = running;
        wait_handles(done).await
    }

    pub async fn wait_reports(&mut self) -> Vec<ReportOutcome> {
        wait_handles(std::mem::take(&mut self.reports)).await
    }

    pub async fn give_feedback(&self, rule_id: i32, feedback: String) -> Result<()> {
        self.repo.give_feedback(rule_id, feedback).await
    }

    pub async fn view_rules(&self) -> Result<Vec<Rule>> {
        self.repo.list_rules().await
    }

    pub async fn view_feedback(&self) -> Result<Vec<Rule>> {
        self.repo.list_with_feedback().await
    }
}

async fn wait_handles(handles: Vec<ReportHandle>) -> Vec<ReportOutcome> {
    join_all(handles.into_iter().map(|h| async move {
        let task_id = h.task_id();
        (task_id, h.wait().await)
    }))
    .await
}

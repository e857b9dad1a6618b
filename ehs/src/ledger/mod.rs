pub mod db_ops;
pub mod worker;

use crate::error::EhsError;
use anyhow::Result;
use chrono::{DateTime, TimeZone};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::fmt;
use std::time::Duration;

/// Manager chosen status for a task that broke a rule.
/// Anything non empty goes except pure digits,
/// which usually is a task id typed into the wrong prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationLabel(String);

impl ViolationLabel {
    pub fn parse(raw: &str) -> Result<Self, EhsError> {
        let label = raw.trim();
        if label.is_empty() {
            return Err(EhsError::invalid("task status cannot be empty"));
        }
        if label.chars().all(|c| c.is_ascii_digit()) {
            return Err(EhsError::invalid("task status must be a non-numeric string"));
        }
        Ok(ViolationLabel(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViolationLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// "2025-06-01 14:03:59"
pub fn rule_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// ctime layout without the trailing newline, "Sun Jun  1 14:03:59 2025"
pub fn violation_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// Connect and bring the schema up to date, tables are created only when missing
pub async fn open_store(dsn: &str, debug_sql: bool) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(dsn.to_owned());
    if dsn.contains(":memory:") {
        // every pooled connection would get its own empty database
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(5)
            .min_connections(1)
            .max_lifetime(Duration::from_secs(120))
            .idle_timeout(Duration::from_secs(8));
    }
    opt.sqlx_logging(debug_sql)
        .connect_timeout(Duration::from_secs(8));

    let db_conn = Database::connect(opt).await?;
    Migrator::up(&db_conn, None).await?;
    Ok(db_conn)
}

pub async fn open_memory_store() -> Result<DatabaseConnection> {
    open_store("sqlite::memory:", false).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn numeric_or_empty_labels_are_rejected() {
        for raw in ["", "   ", "123", "0", " 42 "] {
            assert!(ViolationLabel::parse(raw).unwrap_err().is_input_error(), "{raw:?}");
        }
        for raw in ["unsafe-ladder", "violation", "incomplete", "12b", "-1"] {
            assert!(ViolationLabel::parse(raw).is_ok(), "{raw:?}");
        }
        assert_eq!(ViolationLabel::parse(" no helmet ").unwrap().as_str(), "no helmet");
    }

    #[test]
    fn timestamp_layouts() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 14, 3, 59).unwrap();
        assert_eq!(rule_timestamp(&at), "2025-06-01 14:03:59");
        assert_eq!(violation_timestamp(&at), "Sun Jun  1 14:03:59 2025");
    }

    #[tokio::test]
    async fn migration_is_idempotent() {
        let conn = open_memory_store().await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
    }

    #[tokio::test]
    async fn reopening_file_store_keeps_rows() {
        use crate::ledger::db_ops::{DbOpsImpl, RuleRepo};

        let dir = tempfile::tempdir().unwrap();
        let dsn = format!("sqlite://{}?mode=rwc", dir.path().join("ehs.db").display());
        {
            let db = DbOpsImpl::new(open_store(&dsn, false).await.unwrap());
            db.add_rule("wear helmets".into()).await.unwrap();
        }
        let db = DbOpsImpl::new(open_store(&dsn, false).await.unwrap());
        assert_eq!(db.list_rules().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn opens_store_with_text_worker_column() {
        use crate::credential::hash_password;
        use crate::ledger::db_ops::{DbOpsImpl, TaskRepo, UserRepo};
        use entity::STATUS_COMPLETED;
        use sea_orm::ConnectionTrait;

        let dir = tempfile::tempdir().unwrap();
        let dsn = format!("sqlite://{}?mode=rwc", dir.path().join("legacy.db").display());
        {
            let conn = Database::connect(dsn.as_str()).await.unwrap();
            conn.execute_unprepared(
                "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, username TEXT UNIQUE, \
                 password TEXT, role TEXT);
                 CREATE TABLE tasks (id INTEGER PRIMARY KEY AUTOINCREMENT, worker_id TEXT, \
                 worker_username TEXT, task_description TEXT, status TEXT, violation_comment TEXT, \
                 violation_timestamp TEXT, worker_report TEXT, worker_media TEXT);
                 CREATE TABLE rules (id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 rule_text TEXT NOT NULL, feedback TEXT, timestamp TEXT);",
            )
            .await
            .unwrap();
            conn.execute_unprepared(&format!(
                "INSERT INTO users (username, password, role) VALUES ('alice', '{}', 'worker');
                 INSERT INTO tasks (worker_id, worker_username, task_description, status) \
                 VALUES (1, 'alice', 'inspect valve', 'pending');",
                hash_password("pw1")
            ))
            .await
            .unwrap();
        }

        let db = DbOpsImpl::new(open_store(&dsn, false).await.unwrap());
        let all = db.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].worker_id, "1");

        let alice = db.authenticate("alice".into(), "pw1".into()).await.unwrap();
        let mine = db.list_for_worker(alice.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(db.list_open_for_worker(alice.id).await.unwrap().len(), 1);

        db.record_report(mine[0].id, alice.id, "fixed".into(), "uploads/x".into())
            .await
            .unwrap();
        assert_eq!(db.get_task(mine[0].id).await.unwrap().status, STATUS_COMPLETED);

        let task_id = db.assign(alice.id, "check ladder".into()).await.unwrap();
        assert_eq!(db.get_task(task_id).await.unwrap().worker_id, "1");
        assert_eq!(db.list_for_worker(alice.id).await.unwrap().len(), 2);
    }
}

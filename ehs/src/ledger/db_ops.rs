use entity::rules as Rules;
use entity::tasks as Tasks;
use entity::users as Users;
use Rules::Model as Rule;
use Tasks::Model as Task;
use Users::Model as User;

use crate::credential::{check_credentials, hash_password, Account};
use crate::error::EhsError;
use crate::ledger::{rule_timestamp, violation_timestamp, ViolationLabel};
use crate::utils::*;
use anyhow::Result;
use chrono::Local;
use entity::{Role, STATUS_COMPLETED, STATUS_PENDING};
use log::{info, warn};

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, NotSet, PaginatorTrait, QueryOrder};
use tokio::sync::Mutex;

/// Credential store, maps (username, password) to an account
#[async_trait]
pub trait UserRepo {
    async fn register(&self, username: String, password: String, role: Role) -> Result<i32>;
    async fn authenticate(&self, username: String, password: String) -> Result<Account>;
    async fn exists(&self, username: String, password: String) -> Result<bool>;
    async fn get_user(&self, id: i32) -> Result<Account>;
    async fn list_users(&self) -> Result<Vec<Account>>;
    async fn list_workers(&self) -> Result<Vec<Account>>;
}

/// Task ledger, status is the only discriminant and no transition is enforced
#[async_trait]
pub trait TaskRepo {
    async fn assign(&self, worker_id: i32, description: String) -> Result<i32>;
    async fn get_task(&self, task_id: i32) -> Result<Task>;
    async fn report_violation(
        &self,
        task_id: i32,
        label: ViolationLabel,
        comment: String,
    ) -> Result<()>;
    async fn record_report(
        &self,
        task_id: i32,
        worker_id: i32,
        report: String,
        media_path: String,
    ) -> Result<()>;
    async fn delete_task(&self, task_id: i32) -> Result<()>;
    async fn list_all(&self) -> Result<Vec<Task>>;
    async fn list_pending(&self) -> Result<Vec<Task>>;
    async fn list_for_worker(&self, worker_id: i32) -> Result<Vec<Task>>;
    async fn list_open_for_worker(&self, worker_id: i32) -> Result<Vec<Task>>;
}

/// Rule registry with a single feedback slot per rule
#[async_trait]
pub trait RuleRepo {
    async fn add_rule(&self, text: String) -> Result<i32>;
    async fn delete_rule(&self, rule_id: i32) -> Result<()>;
    async fn give_feedback(&self, rule_id: i32, feedback: String) -> Result<()>;
    async fn list_rules(&self) -> Result<Vec<Rule>>;
    async fn list_with_feedback(&self) -> Result<Vec<Rule>>;
}

pub trait Repo: UserRepo + TaskRepo + RuleRepo {}
impl<T> Repo for T where T: UserRepo + TaskRepo + RuleRepo {}

pub struct DbOpsImpl {
    conn: DatabaseConnection,
    // single writer, every mutating statement group runs under this guard
    write_lock: Mutex<()>,
}

impl DbOpsImpl {
    pub fn new(conn: DatabaseConnection) -> Self {
        DbOpsImpl {
            conn,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl UserRepo for DbOpsImpl {
    async fn register(&self, username: String, password: String, role: Role) -> Result<i32> {
        check_credentials(&username, &password)?;
        let _guard = self.write_lock.lock().await;

        let taken = Users::Entity::find()
            .filter(Users::Column::Username.eq(username.clone()))
            .count(&self.conn)
            .await
            .store_err()?;
        if taken > 0 {
            warn!("refuse to register {}, name already taken", username);
            return Err(EhsError::DuplicateUser(username).into());
        }

        let new_user = Users::ActiveModel {
            id: NotSet,
            username: Set(username.clone()),
            password: Set(hash_password(&password)),
            role: Set(role),
        };
        let user = new_user.insert(&self.conn).await.store_err()?;
        info!("register {} {} with id {}", role, username, user.id);
        Ok(user.id)
    }

    async fn authenticate(&self, username: String, password: String) -> Result<Account> {
        Users::Entity::find()
            .filter(Users::Column::Username.eq(username))
            .filter(Users::Column::Password.eq(hash_password(&password)))
            .one(&self.conn)
            .await
            .store_err()?
            .if_not_found(EhsError::InvalidCredentials)
            .map(Account::from)
    }

    async fn exists(&self, username: String, password: String) -> Result<bool> {
        Users::Entity::find()
            .filter(Users::Column::Username.eq(username))
            .filter(Users::Column::Password.eq(hash_password(&password)))
            .count(&self.conn)
            .await
            .map(|count| count > 0)
            .store_err()
    }

    async fn get_user(&self, id: i32) -> Result<Account> {
        Users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .store_err()?
            .if_not_found(EhsError::UserNotFound(id))
            .map(Account::from)
    }

    async fn list_users(&self) -> Result<Vec<Account>> {
        Users::Entity::find()
            .order_by_asc(Users::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
            .map(|users| users.into_iter().map(Account::from).collect())
    }

    async fn list_workers(&self) -> Result<Vec<Account>> {
        Users::Entity::find()
            .filter(Users::Column::Role.eq(Role::Worker))
            .order_by_asc(Users::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
            .map(|users| users.into_iter().map(Account::from).collect())
    }
}

#[async_trait]
impl TaskRepo for DbOpsImpl {
    async fn assign(&self, worker_id: i32, description: String) -> Result<i32> {
        if description.trim().is_empty() {
            return Err(EhsError::invalid("task description cannot be empty").into());
        }
        let _guard = self.write_lock.lock().await;

        let worker: User = Users::Entity::find_by_id(worker_id)
            .one(&self.conn)
            .await
            .store_err()?
            .if_not_found(EhsError::WorkerNotFound(worker_id))?;

        let new_task = Tasks::ActiveModel {
            id: NotSet,
            worker_id: Set(worker.id.to_string()),
            worker_username: Set(worker.username.clone()),
            task_description: Set(description),
            status: Set(STATUS_PENDING.to_string()),
            violation_comment: Set(None),
            violation_timestamp: Set(None),
            worker_report: Set(None),
            worker_media: Set(None),
        };
        let task = new_task.insert(&self.conn).await.store_err()?;
        info!("assign task {} to worker {}", task.id, worker.username);
        Ok(task.id)
    }

    async fn get_task(&self, task_id: i32) -> Result<Task> {
        Tasks::Entity::find_by_id(task_id)
            .one(&self.conn)
            .await
            .store_err()?
            .if_not_found(EhsError::TaskNotFound(task_id))
    }

    async fn report_violation(
        &self,
        task_id: i32,
        label: ViolationLabel,
        comment: String,
    ) -> Result<()> {
        let comment = Some(comment.trim().to_string()).filter(|c| !c.is_empty());
        let _guard = self.write_lock.lock().await;
        let result = Tasks::Entity::update_many()
            .col_expr(Tasks::Column::Status, Expr::value(label.as_str()))
            .col_expr(Tasks::Column::ViolationComment, Expr::value(comment))
            .col_expr(
                Tasks::Column::ViolationTimestamp,
                Expr::value(violation_timestamp(&Local::now())),
            )
            .filter(Tasks::Column::Id.eq(task_id))
            .exec(&self.conn)
            .await
            .store_err()?;
        result
            .rows_affected
            .ensure_affected(EhsError::TaskNotFound(task_id))?;
        info!("task {} marked as violation {}", task_id, label);
        Ok(())
    }

    async fn record_report(
        &self,
        task_id: i32,
        worker_id: i32,
        report: String,
        media_path: String,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let result = Tasks::Entity::update_many()
            .col_expr(Tasks::Column::Status, Expr::value(STATUS_COMPLETED))
            .col_expr(Tasks::Column::WorkerReport, Expr::value(report))
            .col_expr(Tasks::Column::WorkerMedia, Expr::value(media_path))
            .filter(Tasks::Column::Id.eq(task_id))
            .filter(Tasks::Column::WorkerId.eq(worker_id.to_string()))
            .exec(&self.conn)
            .await
            .store_err()?;
        result
            .rows_affected
            .ensure_affected(EhsError::TaskNotFound(task_id))?;
        info!("worker {} complete task {} successfully", worker_id, task_id);
        Ok(())
    }

    async fn delete_task(&self, task_id: i32) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let result = Tasks::Entity::delete_by_id(task_id)
            .exec(&self.conn)
            .await
            .store_err()?;
        result
            .rows_affected
            .ensure_affected(EhsError::TaskNotFound(task_id))?;
        info!("task {} deleted", task_id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        Tasks::Entity::find()
            .order_by_asc(Tasks::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
    }

    async fn list_pending(&self) -> Result<Vec<Task>> {
        Tasks::Entity::find()
            .filter(Tasks::Column::Status.eq(STATUS_PENDING))
            .order_by_asc(Tasks::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
    }

    async fn list_for_worker(&self, worker_id: i32) -> Result<Vec<Task>> {
        Tasks::Entity::find()
            .filter(Tasks::Column::WorkerId.eq(worker_id.to_string()))
            .order_by_asc(Tasks::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
    }

    async fn list_open_for_worker(&self, worker_id: i32) -> Result<Vec<Task>> {
        Tasks::Entity::find()
            .filter(Tasks::Column::WorkerId.eq(worker_id.to_string()))
            .filter(Tasks::Column::Status.ne(STATUS_COMPLETED))
            .order_by_asc(Tasks::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
    }
}

#[async_trait]
impl RuleRepo for DbOpsImpl {
    async fn add_rule(&self, text: String) -> Result<i32> {
        if text.trim().is_empty() {
            return Err(EhsError::invalid("rule cannot be empty").into());
        }
        let new_rule = Rules::ActiveModel {
            id: NotSet,
            rule_text: Set(text),
            feedback: Set(None),
            timestamp: Set(Some(rule_timestamp(&Local::now()))),
        };

        let _guard = self.write_lock.lock().await;
        let rule = new_rule.insert(&self.conn).await.store_err()?;
        info!("add rule {}", rule.id);
        Ok(rule.id)
    }

    async fn delete_rule(&self, rule_id: i32) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let result = Rules::Entity::delete_by_id(rule_id)
            .exec(&self.conn)
            .await
            .store_err()?;
        result
            .rows_affected
            .ensure_affected(EhsError::RuleNotFound(rule_id))?;
        info!("rule {} deleted", rule_id);
        Ok(())
    }

    async fn give_feedback(&self, rule_id: i32, feedback: String) -> Result<()> {
        if feedback.trim().is_empty() {
            return Err(EhsError::invalid("feedback cannot be empty").into());
        }
        let _guard = self.write_lock.lock().await;
        let result = Rules::Entity::update_many()
            .col_expr(Rules::Column::Feedback, Expr::value(feedback))
            .filter(Rules::Column::Id.eq(rule_id))
            .exec(&self.conn)
            .await
            .store_err()?;
        result
            .rows_affected
            .ensure_affected(EhsError::RuleNotFound(rule_id))
    }

    async fn list_rules(&self) -> Result<Vec<Rule>> {
        Rules::Entity::find()
            .order_by_asc(Rules::Column::Id)
            .all(&self.conn)
            .await
            .store_err()
    }

    async fn list_with_feedback(&self) -> Result<Vec<Rule>> {
        self.list_rules().await
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Task Model, worker_username is a snapshot of the assignee taken when the task was created.
// worker_id holds the decimal user id as text, older stores were created with a TEXT column.
// status is free text: "pending", "completed" or a violation label chosen by a manager.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub worker_id: String,
    #[sea_orm(column_type = "Text")]
    pub worker_username: String,
    #[sea_orm(column_type = "Text")]
    pub task_description: String,
    #[sea_orm(column_type = "Text")]
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub violation_comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub violation_timestamp: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub worker_report: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub worker_media: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

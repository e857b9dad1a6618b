use crate::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account record, `password` holds the hex digest and never the plaintext
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "Text")]
    pub username: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "Text")]
    pub password: String,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

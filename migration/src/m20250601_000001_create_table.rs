use sea_orm_migration::prelude::*;

use entity::rules as Rules;
use entity::tasks as Tasks;
use entity::users as Users;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000001_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Column::Username)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Column::Password).text().not_null())
                    .col(ColumnDef::new(Users::Column::Role).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::Column::WorkerId).text().not_null())
                    .col(
                        ColumnDef::new(Tasks::Column::WorkerUsername)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tasks::Column::TaskDescription)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tasks::Column::Status).text().not_null())
                    .col(ColumnDef::new(Tasks::Column::ViolationComment).text())
                    .col(ColumnDef::new(Tasks::Column::ViolationTimestamp).text())
                    .col(ColumnDef::new(Tasks::Column::WorkerReport).text())
                    .col(ColumnDef::new(Tasks::Column::WorkerMedia).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rules::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rules::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rules::Column::RuleText).text().not_null())
                    .col(ColumnDef::new(Rules::Column::Feedback).text())
                    .col(ColumnDef::new(Rules::Column::Timestamp).text())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rules::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Entity).to_owned())
            .await
    }
}

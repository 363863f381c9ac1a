use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum BailingSchedules {
    Table,
    Id,
    Location,
    Date,
    Time,
    TruckName,
    Status,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BailingSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BailingSchedules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BailingSchedules::Location)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BailingSchedules::Date).date().not_null())
                    .col(ColumnDef::new(BailingSchedules::Time).time().not_null())
                    .col(
                        ColumnDef::new(BailingSchedules::TruckName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BailingSchedules::Status)
                            .string_len(20)
                            .not_null()
                            .default("Scheduled"),
                    )
                    .col(
                        ColumnDef::new(BailingSchedules::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bailing_schedules_date")
                    .table(BailingSchedules::Table)
                    .col(BailingSchedules::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BailingSchedules::Table).to_owned())
            .await
    }
}

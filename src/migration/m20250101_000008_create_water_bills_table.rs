use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum WaterBills {
    Table,
    Id,
    UserId,
    Amount,
    Month,
    Year,
    Status,
    PaymentMethod,
    ReferenceNo,
    DatePaid,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaterBills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaterBills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WaterBills::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(WaterBills::Amount)
                            .decimal_len(8, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WaterBills::Month).string_len(20).not_null())
                    .col(ColumnDef::new(WaterBills::Year).integer().not_null())
                    .col(
                        ColumnDef::new(WaterBills::Status)
                            .string_len(10)
                            .not_null()
                            .default("Unpaid"),
                    )
                    .col(
                        ColumnDef::new(WaterBills::PaymentMethod)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WaterBills::ReferenceNo)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(WaterBills::DatePaid).timestamp().null())
                    .col(
                        ColumnDef::new(WaterBills::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_water_bills_user_id")
                            .from(WaterBills::Table, WaterBills::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_water_bills_user_id")
                    .table(WaterBills::Table)
                    .col(WaterBills::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaterBills::Table).to_owned())
            .await
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ComplaintPhotos {
    Table,
    Id,
    ComplaintId,
    PhotoUrl,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Complaints {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComplaintPhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintPhotos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintPhotos::ComplaintId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ComplaintPhotos::PhotoUrl).string().not_null())
                    .col(
                        ColumnDef::new(ComplaintPhotos::UploadedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_photos_complaint_id")
                            .from(ComplaintPhotos::Table, ComplaintPhotos::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_photos_complaint_id")
                    .table(ComplaintPhotos::Table)
                    .col(ComplaintPhotos::ComplaintId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComplaintPhotos::Table).to_owned())
            .await
    }
}

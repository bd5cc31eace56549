//! Create `band` table.
//! Every attribute column is nullable; the record shape is permissive.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Band::Table)
                    .if_not_exists()
                    .col(uuid(Band::Id).primary_key())
                    // byte-order collation keeps name ordering case-sensitive
                    .col(text_null(Band::Name).extra("COLLATE \"C\""))
                    .col(text_null(Band::Country))
                    .col(text_null(Band::Website))
                    .col(text_null(Band::Facebook))
                    .col(text_null(Band::Instagram))
                    .col(text_null(Band::DayOfWeek))
                    .col(double_null(Band::Year))
                    .to_owned(),
            )
            .await?;

        // Matches the listing order: year desc, name asc
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_band_year_name")
                    .table(Band::Table)
                    .col((Band::Year, IndexOrder::Desc))
                    .col((Band::Name, IndexOrder::Asc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Band::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Band {
    Table,
    Id,
    Name,
    Country,
    Website,
    Facebook,
    Instagram,
    DayOfWeek,
    Year,
}

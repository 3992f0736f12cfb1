use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(FavoriteEntries::Id))
                    .col(string_len(FavoriteEntries::Title, 255))
                    .col(string_len(FavoriteEntries::Kind, 16))
                    .col(string_len(FavoriteEntries::Director, 255))
                    .col(big_integer(FavoriteEntries::Budget))
                    .col(string_len(FavoriteEntries::Location, 255))
                    .col(string_len(FavoriteEntries::Duration, 100))
                    .col(integer(FavoriteEntries::Year))
                    .col(big_integer(FavoriteEntries::CreatedAt))
                    .col(big_integer(FavoriteEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_entries_title")
                    .table(FavoriteEntries::Table)
                    .col(FavoriteEntries::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_entries_kind")
                    .table(FavoriteEntries::Table)
                    .col(FavoriteEntries::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_entries_director")
                    .table(FavoriteEntries::Table)
                    .col(FavoriteEntries::Director)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_entries_year")
                    .table(FavoriteEntries::Table)
                    .col(FavoriteEntries::Year)
                    .to_owned(),
            )
            .await?;

        // Backstop for the duplicate probe in the create handler; a violation
        // here is surfaced as the same 409 the probe would have returned.
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_entries_title_year_unique")
                    .table(FavoriteEntries::Table)
                    .col(FavoriteEntries::Title)
                    .col(FavoriteEntries::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FavoriteEntries::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum FavoriteEntries {
    Table,
    Id,
    Title,
    Kind,
    Director,
    Budget,
    Location,
    Duration,
    Year,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Actor::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Actor::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Actor::LastName).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        // Genre names are unique
        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genre::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Genre::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CinemaHall::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CinemaHall::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CinemaHall::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(CinemaHall::Rows)
                            .integer()
                            .not_null()
                            .check(Expr::col(CinemaHall::Rows).gte(0)),
                    )
                    .col(
                        ColumnDef::new(CinemaHall::SeatsInRow)
                            .integer()
                            .not_null()
                            .check(Expr::col(CinemaHall::SeatsInRow).gte(0)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movie::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movie::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Movie::Description).text().not_null())
                    .col(
                        ColumnDef::new(Movie::Duration)
                            .integer()
                            .not_null()
                            .check(Expr::col(Movie::Duration).gte(0)),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CinemaHall::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actor::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Actor {
    #[sea_orm(iden = "actors")]
    Table,
    Id,
    FirstName,
    LastName,
}

#[derive(DeriveIden)]
pub(crate) enum Genre {
    #[sea_orm(iden = "genres")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum CinemaHall {
    #[sea_orm(iden = "cinema_halls")]
    Table,
    Id,
    Name,
    Rows,
    SeatsInRow,
}

#[derive(DeriveIden)]
pub(crate) enum Movie {
    #[sea_orm(iden = "movies")]
    Table,
    Id,
    Title,
    Description,
    Duration,
}

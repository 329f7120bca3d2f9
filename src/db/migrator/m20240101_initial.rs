use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_from_entity<E>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Referenced tables first so the foreign keys resolve.
        create_from_entity(manager, &schema, Countries).await?;
        create_from_entity(manager, &schema, Genres).await?;
        create_from_entity(manager, &schema, Actors).await?;
        create_from_entity(manager, &schema, Languages).await?;
        create_from_entity(manager, &schema, Movies).await?;
        create_from_entity(manager, &schema, MovieGenres).await?;
        create_from_entity(manager, &schema, MovieActors).await?;
        create_from_entity(manager, &schema, MovieLanguages).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieLanguages).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieActors).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieGenres).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Languages).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actors).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

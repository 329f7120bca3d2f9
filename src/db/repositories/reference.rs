//! Country, genre, actor and language rows, addressed by their natural keys.
//!
//! Rows are created on first reference and never removed here.

use crate::domain::CountryCode;
use crate::entities::{actors, countries, genres, languages, prelude::*};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};

/// Reference entities deduplicated by a unique `name` column.
pub trait NamedReference: EntityTrait {
    fn name_column() -> Self::Column;

    fn with_name(name: &str) -> Self::ActiveModel;
}

impl NamedReference for Genres {
    fn name_column() -> Self::Column {
        genres::Column::Name
    }

    fn with_name(name: &str) -> Self::ActiveModel {
        genres::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }
}

impl NamedReference for Actors {
    fn name_column() -> Self::Column {
        actors::Column::Name
    }

    fn with_name(name: &str) -> Self::ActiveModel {
        actors::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }
}

impl NamedReference for Languages {
    fn name_column() -> Self::Column {
        languages::Column::Name
    }

    fn with_name(name: &str) -> Self::ActiveModel {
        languages::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }
}

/// Looks a row up by name and inserts it when absent.
///
/// The insert ignores a unique-key conflict and the row is read back, so a
/// concurrent request that created the same name first resolves to its row.
pub async fn get_or_create_named<E, C>(conn: &C, name: &str) -> Result<E::Model>
where
    E: NamedReference,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    if let Some(existing) = E::find()
        .filter(E::name_column().eq(name))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    E::insert(E::with_name(name))
        .on_conflict(OnConflict::column(E::name_column()).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;

    E::find()
        .filter(E::name_column().eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Reference '{name}' missing right after insert"))
}

/// Same as [`get_or_create_named`], keyed by country code.
pub async fn get_or_create_country<C>(conn: &C, code: &CountryCode) -> Result<countries::Model>
where
    C: ConnectionTrait,
{
    let find = || Countries::find().filter(countries::Column::Code.eq(code.as_str()));

    if let Some(existing) = find().one(conn).await? {
        return Ok(existing);
    }

    Countries::insert(countries::ActiveModel {
        code: Set(code.as_str().to_string()),
        name: Set(None),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(countries::Column::Code)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    find()
        .one(conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Country '{code}' missing right after insert"))
}

/// Resolves every name in order.
pub async fn resolve_named<E, C>(conn: &C, names: &[String]) -> Result<Vec<E::Model>>
where
    E: NamedReference,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        resolved.push(get_or_create_named::<E, C>(conn, name).await?);
    }
    Ok(resolved)
}

pub struct ReferenceRepository {
    conn: DatabaseConnection,
}

impl ReferenceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_country(&self, code: &str) -> Result<Option<countries::Model>> {
        Ok(Countries::find()
            .filter(countries::Column::Code.eq(code))
            .one(&self.conn)
            .await?)
    }

    pub async fn list_countries(&self) -> Result<Vec<countries::Model>> {
        Ok(Countries::find()
            .order_by_asc(countries::Column::Code)
            .all(&self.conn)
            .await?)
    }

    pub async fn list_genres(&self) -> Result<Vec<genres::Model>> {
        Ok(Genres::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await?)
    }

    pub async fn list_actors(&self) -> Result<Vec<actors::Model>> {
        Ok(Actors::find()
            .order_by_asc(actors::Column::Name)
            .all(&self.conn)
            .await?)
    }
}

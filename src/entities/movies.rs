use sea_orm::entity::prelude::*;

use crate::domain::MovieStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date: Date,
    pub score: f64,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    pub status: MovieStatus,
    pub budget: f64,
    pub revenue: f64,
    pub country_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::CountryId",
        to = "super::countries::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Country,
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_actors::Entity")]
    MovieActors,
    #[sea_orm(has_many = "super::movie_languages::Entity")]
    MovieLanguages,
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Movie.def().rev())
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actors::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actors::Relation::Movie.def().rev())
    }
}

impl Related<super::languages::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_languages::Relation::Language.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_languages::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

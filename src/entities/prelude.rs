pub use super::actors::Entity as Actors;
pub use super::countries::Entity as Countries;
pub use super::genres::Entity as Genres;
pub use super::languages::Entity as Languages;
pub use super::movie_actors::Entity as MovieActors;
pub use super::movie_genres::Entity as MovieGenres;
pub use super::movie_languages::Entity as MovieLanguages;
pub use super::movies::Entity as Movies;

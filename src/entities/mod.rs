pub mod prelude;

pub mod actors;
pub mod countries;
pub mod genres;
pub mod languages;
pub mod movie_actors;
pub mod movie_genres;
pub mod movie_languages;
pub mod movies;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::MovieStatus;
use crate::models::movie::{Country, Movie, MovieSummary, NamedRef};
use crate::pagination::Page;

/// Body of every error response, and of the update acknowledgment.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MovieListItemDto {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
}

impl From<MovieSummary> for MovieListItemDto {
    fn from(movie: MovieSummary) -> Self {
        Self {
            id: movie.id.value(),
            name: movie.name,
            date: movie.date,
            score: movie.score,
            overview: movie.overview,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieListItemDto>,
    pub prev_page: Option<String>,
    pub next_page: Option<String>,
    pub total_pages: u64,
    pub total_items: u64,
}

impl MovieListResponse {
    /// Builds the payload, with page links relative to `path`.
    pub fn from_page(page: Page<MovieSummary>, path: &str) -> Self {
        let prev_page = page.prev_url(path);
        let next_page = page.next_url(path);

        Self {
            movies: page.items.into_iter().map(Into::into).collect(),
            prev_page,
            next_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountryDto {
    pub id: i32,
    pub code: String,
    pub name: Option<String>,
}

impl From<Country> for CountryDto {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            code: country.code,
            name: country.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NamedDto {
    pub id: i32,
    pub name: String,
}

impl From<NamedRef> for NamedDto {
    fn from(named: NamedRef) -> Self {
        Self {
            id: named.id,
            name: named.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailDto {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
    pub status: MovieStatus,
    pub budget: f64,
    pub revenue: f64,
    pub country: CountryDto,
    pub genres: Vec<NamedDto>,
    pub actors: Vec<NamedDto>,
    pub languages: Vec<NamedDto>,
}

impl From<Movie> for MovieDetailDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id.value(),
            name: movie.name,
            date: movie.date,
            score: movie.score,
            overview: movie.overview,
            status: movie.status,
            budget: movie.budget,
            revenue: movie.revenue,
            country: movie.country.into(),
            genres: movie.genres.into_iter().map(Into::into).collect(),
            actors: movie.actors.into_iter().map(Into::into).collect(),
            languages: movie.languages.into_iter().map(Into::into).collect(),
        }
    }
}

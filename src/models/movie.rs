use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::{CountryCode, MovieId, MovieStatus};

pub const MAX_NAME_LEN: usize = 255;

/// Reasons a movie payload is rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name is {0} characters long, at most {MAX_NAME_LEN} allowed")]
    NameTooLong(usize),

    #[error("release date {date} is later than {limit}")]
    DateBeyondHorizon { date: NaiveDate, limit: NaiveDate },

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),

    #[error("budget {0} is negative")]
    NegativeBudget(f64),

    #[error("revenue {0} is negative")]
    NegativeRevenue(f64),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("country code '{0}' must be 2 or 3 letters")]
    InvalidCountryCode(String),

    #[error("{0} names must not be empty")]
    EmptyReferenceName(&'static str),

    #[error("{0} must not be null")]
    NullField(&'static str),
}

/// Full payload accepted by the create operation.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieInput {
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
    pub status: String,
    pub budget: f64,
    pub revenue: f64,
    pub country: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub languages: Vec<String>,
}

/// A create payload that passed every rule in [`MovieInput::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
    pub status: MovieStatus,
    pub budget: f64,
    pub revenue: f64,
    pub country: CountryCode,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub languages: Vec<String>,
}

/// Sparse payload accepted by the update operation.
///
/// The outer `Option` tells whether the key was sent at all; the inner one
/// whether it was sent as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub score: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub overview: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub budget: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub revenue: Option<Option<f64>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated field changes; `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub score: Option<f64>,
    pub overview: Option<String>,
    pub status: Option<MovieStatus>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
}

impl MovieChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.score.is_none()
            && self.overview.is_none()
            && self.status.is_none()
            && self.budget.is_none()
            && self.revenue.is_none()
    }

    #[must_use]
    pub const fn touches_identity(&self) -> bool {
        self.name.is_some() || self.date.is_some()
    }
}

/// Rules shared by create and update.
#[derive(Debug, Clone, Copy)]
pub struct MovieRules {
    pub today: NaiveDate,
    pub release_horizon_days: u64,
}

impl MovieRules {
    #[must_use]
    pub const fn new(today: NaiveDate, release_horizon_days: u64) -> Self {
        Self {
            today,
            release_horizon_days,
        }
    }

    #[must_use]
    pub fn latest_release_date(&self) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(self.release_horizon_days))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn check_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong(len));
        }
        Ok(())
    }

    pub fn check_date(&self, date: NaiveDate) -> Result<(), ValidationError> {
        let limit = self.latest_release_date();
        if date > limit {
            return Err(ValidationError::DateBeyondHorizon { date, limit });
        }
        Ok(())
    }

    pub fn check_score(score: f64) -> Result<(), ValidationError> {
        if !(0.0..=100.0).contains(&score) {
            return Err(ValidationError::ScoreOutOfRange(score));
        }
        Ok(())
    }

    pub fn check_budget(budget: f64) -> Result<(), ValidationError> {
        if budget.is_nan() || budget < 0.0 {
            return Err(ValidationError::NegativeBudget(budget));
        }
        Ok(())
    }

    pub fn check_revenue(revenue: f64) -> Result<(), ValidationError> {
        if revenue.is_nan() || revenue < 0.0 {
            return Err(ValidationError::NegativeRevenue(revenue));
        }
        Ok(())
    }

    pub fn parse_status(raw: &str) -> Result<MovieStatus, ValidationError> {
        raw.parse()
            .map_err(|_| ValidationError::UnknownStatus(raw.to_string()))
    }
}

impl MovieInput {
    /// Checks every field and normalizes the reference lists.
    ///
    /// Names repeated within one list collapse to their first occurrence.
    pub fn validate(self, rules: &MovieRules) -> Result<NewMovie, ValidationError> {
        MovieRules::check_name(&self.name)?;
        rules.check_date(self.date)?;
        MovieRules::check_score(self.score)?;
        MovieRules::check_budget(self.budget)?;
        MovieRules::check_revenue(self.revenue)?;
        let status = MovieRules::parse_status(&self.status)?;
        let country = CountryCode::parse(&self.country)
            .ok_or_else(|| ValidationError::InvalidCountryCode(self.country.clone()))?;

        Ok(NewMovie {
            name: self.name,
            date: self.date,
            score: self.score,
            overview: self.overview,
            status,
            budget: self.budget,
            revenue: self.revenue,
            country,
            genres: dedup_names(self.genres, "genre")?,
            actors: dedup_names(self.actors, "actor")?,
            languages: dedup_names(self.languages, "language")?,
        })
    }
}

impl MoviePatch {
    /// Validates only the fields that were sent.
    pub fn validate(self, rules: &MovieRules) -> Result<MovieChanges, ValidationError> {
        let name = required(self.name, "name")?;
        if let Some(name) = &name {
            MovieRules::check_name(name)?;
        }

        let date = required(self.date, "date")?;
        if let Some(date) = date {
            rules.check_date(date)?;
        }

        let score = required(self.score, "score")?;
        if let Some(score) = score {
            MovieRules::check_score(score)?;
        }

        let budget = required(self.budget, "budget")?;
        if let Some(budget) = budget {
            MovieRules::check_budget(budget)?;
        }

        let revenue = required(self.revenue, "revenue")?;
        if let Some(revenue) = revenue {
            MovieRules::check_revenue(revenue)?;
        }

        let status = required(self.status, "status")?
            .map(|raw| MovieRules::parse_status(&raw))
            .transpose()?;

        Ok(MovieChanges {
            name,
            date,
            score,
            overview: required(self.overview, "overview")?,
            status,
            budget,
            revenue,
        })
    }
}

fn required<T>(field: Option<Option<T>>, label: &'static str) -> Result<Option<T>, ValidationError> {
    match field {
        None => Ok(None),
        Some(None) => Err(ValidationError::NullField(label)),
        Some(Some(value)) => Ok(Some(value)),
    }
}

fn dedup_names(names: Vec<String>, kind: &'static str) -> Result<Vec<String>, ValidationError> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyReferenceName(kind));
        }
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    Ok(unique)
}

/// A movie as listed in catalog pages.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i32,
    pub code: String,
    pub name: Option<String>,
}

/// A genre, actor or language attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

/// A movie with every related entity resolved.
///
/// Genres, actors and languages keep the order they were submitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
    pub status: MovieStatus,
    pub budget: f64,
    pub revenue: f64,
    pub country: Country,
    pub genres: Vec<NamedRef>,
    pub actors: Vec<NamedRef>,
    pub languages: Vec<NamedRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> MovieRules {
        MovieRules::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 365)
    }

    fn input() -> MovieInput {
        MovieInput {
            name: "Arrival".to_string(),
            date: NaiveDate::from_ymd_opt(2016, 11, 11).unwrap(),
            score: 79.0,
            overview: "Linguist meets heptapods.".to_string(),
            status: "Released".to_string(),
            budget: 47_000_000.0,
            revenue: 203_388_186.0,
            country: "usa".to_string(),
            genres: vec!["Drama".to_string(), "Sci-Fi".to_string()],
            actors: vec!["Amy Adams".to_string()],
            languages: vec!["English".to_string()],
        }
    }

    #[test]
    fn test_valid_input_normalizes_country() {
        let movie = input().validate(&rules()).unwrap();
        assert_eq!(movie.country.as_str(), "USA");
        assert_eq!(movie.status, MovieStatus::Released);
        assert_eq!(movie.genres, vec!["Drama", "Sci-Fi"]);
    }

    #[test]
    fn test_score_bounds_are_inclusive() {
        for score in [0.0, 100.0] {
            let mut payload = input();
            payload.score = score;
            assert!(payload.validate(&rules()).is_ok());
        }
        for score in [-0.5, 100.1, f64::NAN] {
            let mut payload = input();
            payload.score = score;
            assert!(matches!(
                payload.validate(&rules()),
                Err(ValidationError::ScoreOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_negative_money_rejected() {
        let mut payload = input();
        payload.budget = -1.0;
        assert!(matches!(
            payload.validate(&rules()),
            Err(ValidationError::NegativeBudget(_))
        ));

        let mut payload = input();
        payload.revenue = -0.01;
        assert!(matches!(
            payload.validate(&rules()),
            Err(ValidationError::NegativeRevenue(_))
        ));
    }

    #[test]
    fn test_release_horizon() {
        let mut payload = input();
        payload.date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(payload.validate(&rules()).is_ok());

        let mut payload = input();
        payload.date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(matches!(
            payload.validate(&rules()),
            Err(ValidationError::DateBeyondHorizon { .. })
        ));
    }

    #[test]
    fn test_status_and_country_rejected() {
        let mut payload = input();
        payload.status = "Rumored".to_string();
        assert_eq!(
            payload.validate(&rules()),
            Err(ValidationError::UnknownStatus("Rumored".to_string()))
        );

        let mut payload = input();
        payload.country = "U1".to_string();
        assert!(matches!(
            payload.validate(&rules()),
            Err(ValidationError::InvalidCountryCode(_))
        ));
    }

    #[test]
    fn test_name_length() {
        let mut payload = input();
        payload.name = "x".repeat(MAX_NAME_LEN);
        assert!(payload.validate(&rules()).is_ok());

        let mut payload = input();
        payload.name = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            payload.validate(&rules()),
            Err(ValidationError::NameTooLong(MAX_NAME_LEN + 1))
        );

        let mut payload = input();
        payload.name = "   ".to_string();
        assert_eq!(payload.validate(&rules()), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_repeated_reference_names_collapse() {
        let mut payload = input();
        payload.genres = vec![
            "Drama".to_string(),
            "Thriller".to_string(),
            "Drama".to_string(),
        ];
        let movie = payload.validate(&rules()).unwrap();
        assert_eq!(movie.genres, vec!["Drama", "Thriller"]);

        let mut payload = input();
        payload.actors = vec![String::new()];
        assert_eq!(
            payload.validate(&rules()),
            Err(ValidationError::EmptyReferenceName("actor"))
        );
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_value() {
        let patch: MoviePatch = serde_json::from_str(r#"{"score": 0}"#).unwrap();
        let changes = patch.validate(&rules()).unwrap();
        assert_eq!(changes.score, Some(0.0));
        assert!(changes.name.is_none());
        assert!(!changes.touches_identity());

        let patch: MoviePatch = serde_json::from_str(r#"{"overview": null}"#).unwrap();
        assert_eq!(
            patch.validate(&rules()),
            Err(ValidationError::NullField("overview"))
        );

        let patch: MoviePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.validate(&rules()).unwrap().is_empty());
    }

    #[test]
    fn test_patch_applies_create_rules() {
        let patch: MoviePatch = serde_json::from_str(r#"{"score": -1}"#).unwrap();
        assert!(matches!(
            patch.validate(&rules()),
            Err(ValidationError::ScoreOutOfRange(_))
        ));

        let patch: MoviePatch = serde_json::from_str(r#"{"status": "Post Production"}"#).unwrap();
        assert_eq!(
            patch.validate(&rules()).unwrap().status,
            Some(MovieStatus::PostProduction)
        );

        let patch: MoviePatch = serde_json::from_str(r#"{"date": "2030-01-01"}"#).unwrap();
        assert!(matches!(
            patch.validate(&rules()),
            Err(ValidationError::DateBeyondHorizon { .. })
        ));
    }
}

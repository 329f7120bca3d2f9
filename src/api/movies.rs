use axum::{
    Json,
    extract::{
        OriginalUri, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    ApiError, AppState, DetailResponse, ListParams, MovieDetailDto, MovieListResponse,
    validation::page_request,
};
use crate::domain::MovieId;
use crate::models::movie::{MovieInput, MoviePatch};

fn movie_id(path: Result<Path<i32>, PathRejection>) -> Result<MovieId, ApiError> {
    path.map(|Path(id)| MovieId::new(id))
        .map_err(|rejection| ApiError::invalid_input(rejection.body_text()))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let Query(params) = params.map_err(|r| ApiError::invalid_input(r.body_text()))?;
    let request = page_request(&params, &state.config().catalog)?;

    let page = state.movie_service().list_movies(request).await?;

    Ok(Json(MovieListResponse::from_page(page, uri.path())))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<MovieDetailDto>, ApiError> {
    let id = movie_id(path)?;
    let movie = state.movie_service().get_movie(id).await?;
    Ok(Json(movie.into()))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> Result<(StatusCode, Json<MovieDetailDto>), ApiError> {
    let Json(input) = payload.map_err(|r| ApiError::invalid_input(r.body_text()))?;

    let movie = state.movie_service().create_movie(input).await?;

    Ok((StatusCode::CREATED, Json(movie.into())))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> Result<Json<DetailResponse>, ApiError> {
    let id = movie_id(path)?;

    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            // An unknown id wins over a malformed body.
            state.movie_service().get_movie(id).await?;
            return Err(ApiError::invalid_input(rejection.body_text()));
        }
    };

    state.movie_service().update_movie(id, patch).await?;

    Ok(Json(DetailResponse::new("Movie updated successfully.")))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = movie_id(path)?;
    state.movie_service().delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

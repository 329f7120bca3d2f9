//! Integration tests for the movie endpoints.
//!
//! Every test gets its own temp-file SQLite database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use movie_catalog::api::AppState;
use movie_catalog::config::Config;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let db_path =
        std::env::temp_dir().join(format!("movie-catalog-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = movie_catalog::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    (movie_catalog::api::router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

fn movie(name: &str) -> Value {
    json!({
        "name": name,
        "date": "2010-07-16",
        "score": 83.0,
        "overview": "A thief who steals corporate secrets through dream-sharing.",
        "status": "Released",
        "budget": 160_000_000.0,
        "revenue": 836_800_000.0,
        "country": "usa",
        "genres": ["Action", "Science Fiction", "Adventure"],
        "actors": ["Leonardo DiCaprio", "Elliot Page"],
        "languages": ["English", "Japanese"]
    })
}

async fn create(app: &Router, payload: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/v1/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body
}

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_echoes_input() {
    let (app, _) = spawn_app().await;

    let created = create(&app, movie("Inception")).await;

    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["name"], "Inception");
    assert_eq!(created["date"], "2010-07-16");
    assert_eq!(created["score"], 83.0);
    assert_eq!(created["status"], "Released");
    assert_eq!(created["budget"], 160_000_000.0);
    assert_eq!(created["country"]["code"], "USA");
    assert!(created["country"]["name"].is_null());
    assert_eq!(
        names(&created["genres"]),
        vec!["Action", "Science Fiction", "Adventure"]
    );
    assert_eq!(names(&created["actors"]), vec!["Leonardo DiCaprio", "Elliot Page"]);
    assert_eq!(names(&created["languages"]), vec!["English", "Japanese"]);

    let uri = format!("/api/v1/movies/{}", created["id"]);
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_name_and_date_conflicts() {
    let (app, _) = spawn_app().await;
    create(&app, movie("Inception")).await;

    let mut again = movie("Inception");
    again["score"] = json!(10.0);
    again["genres"] = json!(["Drama"]);

    let (status, body) = send(&app, "POST", "/api/v1/movies", Some(again)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["detail"],
        "A movie with the name 'Inception' and release date '2010-07-16' already exists."
    );

    let mut other_date = movie("Inception");
    other_date["date"] = json!("2011-07-16");
    create(&app, other_date).await;
}

#[tokio::test]
async fn test_references_are_shared() {
    let (app, state) = spawn_app().await;

    let mut first = movie("Heat");
    first["genres"] = json!(["Crime", "Drama"]);
    first["country"] = json!("US");
    let mut second = movie("Collateral");
    second["genres"] = json!(["Drama", "Thriller"]);
    second["country"] = json!("us");

    let first = create(&app, first).await;
    let second = create(&app, second).await;

    let drama_first = &first["genres"][1];
    let drama_second = &second["genres"][0];
    assert_eq!(drama_first["name"], "Drama");
    assert_eq!(drama_first["id"], drama_second["id"]);
    assert_eq!(first["country"]["id"], second["country"]["id"]);

    let genres = state.store().list_genres().await.unwrap();
    assert_eq!(genres.len(), 3);

    let countries = state.store().list_countries().await.unwrap();
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].code, "US");
}

#[tokio::test]
async fn test_repeated_names_collapse() {
    let (app, _) = spawn_app().await;

    let mut payload = movie("Alien");
    payload["actors"] = json!(["Sigourney Weaver", "Tom Skerritt", "Sigourney Weaver"]);
    payload["languages"] = json!([]);

    let created = create(&app, payload).await;
    assert_eq!(
        names(&created["actors"]),
        vec!["Sigourney Weaver", "Tom Skerritt"]
    );
    assert_eq!(created["languages"], json!([]));
}

#[tokio::test]
async fn test_create_rejects_invalid_payloads() {
    let (app, _) = spawn_app().await;

    let cases = [
        ("score", json!(100.5)),
        ("score", json!(-1)),
        ("budget", json!(-5)),
        ("revenue", json!(-0.5)),
        ("status", json!("Rumored")),
        ("country", json!("U1")),
        ("country", json!("USAA")),
        ("date", json!("2999-01-01")),
        ("date", json!("not-a-date")),
        ("name", json!("")),
        ("name", json!("x".repeat(256))),
        ("genres", json!([""])),
        ("score", json!(null)),
    ];

    for (field, value) in cases {
        let mut payload = movie("Broken");
        payload[field] = value.clone();
        let (status, body) = send(&app, "POST", "/api/v1/movies", Some(payload)).await;
        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "{field} = {value} should be rejected"
        );
        assert_eq!(body["detail"], "Invalid input data.");
    }

    let mut missing = movie("Broken");
    missing.as_object_mut().unwrap().remove("overview");
    let (status, _) = send(&app, "POST", "/api/v1/movies", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/movies", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_score_bounds_accepted() {
    let (app, _) = spawn_app().await;

    let mut low = movie("Low");
    low["score"] = json!(0);
    low["budget"] = json!(0);
    low["revenue"] = json!(0);
    let mut high = movie("High");
    high["score"] = json!(100);
    high["status"] = json!("In Production");

    assert_eq!(create(&app, low).await["score"], 0.0);
    let high = create(&app, high).await;
    assert_eq!(high["score"], 100.0);
    assert_eq!(high["status"], "In Production");
}

#[tokio::test]
async fn test_get_unknown_movie() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/movies/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie with the given ID was not found.");

    let (status, _) = send(&app, "GET", "/api/v1/movies/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_newest_first() {
    let (app, _) = spawn_app().await;
    for name in ["A", "B", "C"] {
        create(&app, movie(name)).await;
    }

    let (status, body) = send(&app, "GET", "/api/v1/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["movies"]), vec!["C", "B", "A"]);
    assert_eq!(body["total_items"], 3);
    assert_eq!(body["total_pages"], 1);
    assert!(body["prev_page"].is_null());
    assert!(body["next_page"].is_null());

    let item = &body["movies"][0];
    assert_eq!(item["date"], "2010-07-16");
    assert!(item["overview"].is_string());
    assert!(item.get("genres").is_none());
}

#[tokio::test]
async fn test_list_empty_or_past_the_end() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/movies", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No movies found.");

    for i in 0..5 {
        create(&app, movie(&format!("Movie {i}"))).await;
    }

    let (status, _) = send(&app, "GET", "/api/v1/movies?page=2&per_page=10", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_huge_page_is_not_found() {
    let (app, _) = spawn_app().await;
    create(&app, movie("Inception")).await;

    for page in ["922337203685477580", "9223372036854775807"] {
        let uri = format!("/api/v1/movies?page={page}&per_page=20");
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["detail"], "No movies found.");
    }

    let (status, body) = send(&app, "GET", "/api/v1/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 1);
}

#[tokio::test]
async fn test_list_page_links() {
    let (app, _) = spawn_app().await;
    for i in 0..12 {
        create(&app, movie(&format!("Movie {i}"))).await;
    }

    let (status, body) = send(&app, "GET", "/api/v1/movies?page=2&per_page=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 12);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["prev_page"], "/api/v1/movies?page=1&per_page=5");
    assert_eq!(body["next_page"], "/api/v1/movies?page=3&per_page=5");
    assert_eq!(
        names(&body["movies"]),
        vec!["Movie 6", "Movie 5", "Movie 4", "Movie 3", "Movie 2"]
    );

    let (status, body) = send(&app, "GET", "/api/v1/movies?page=3&per_page=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["movies"]), vec!["Movie 1", "Movie 0"]);
    assert!(body["next_page"].is_null());
}

#[tokio::test]
async fn test_list_rejects_bad_query() {
    let (app, _) = spawn_app().await;
    create(&app, movie("Only")).await;

    for uri in [
        "/api/v1/movies?per_page=21",
        "/api/v1/movies?per_page=0",
        "/api/v1/movies?page=0",
        "/api/v1/movies?page=-1",
        "/api/v1/movies?page=abc",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["detail"], "Invalid input data.");
    }

    let (status, _) = send(&app, "GET", "/api/v1/movies?per_page=20", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_changes_only_sent_fields() {
    let (app, _) = spawn_app().await;
    let created = create(&app, movie("Inception")).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({"score": 90, "status": "Post Production"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"detail": "Movie updated successfully."}));

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched["score"], 90.0);
    assert_eq!(fetched["status"], "Post Production");
    assert_eq!(fetched["name"], "Inception");
    assert_eq!(fetched["budget"], created["budget"]);
    assert_eq!(fetched["genres"], created["genres"]);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_rejects_invalid_and_keeps_movie() {
    let (app, _) = spawn_app().await;
    let created = create(&app, movie("Inception")).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    for patch in [
        json!({"score": -1}),
        json!({"revenue": -10}),
        json!({"date": "2999-12-31"}),
        json!({"status": "Cancelled"}),
        json!({"overview": null}),
        json!({"name": ""}),
    ] {
        let (status, body) = send(&app, "PATCH", &uri, Some(patch.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{patch}");
        assert_eq!(body["detail"], "Invalid input data.");
    }

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_unknown_movie_is_not_found_first() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "PATCH", "/api/v1/movies/42", Some(json!({"score": -1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie with the given ID was not found.");

    let (status, _) = send(&app, "PATCH", "/api/v1/movies/42", Some(json!({"score": "high"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_to_existing_identity_conflicts() {
    let (app, _) = spawn_app().await;
    create(&app, movie("Inception")).await;
    let other = create(&app, movie("Interstellar")).await;
    let uri = format!("/api/v1/movies/{}", other["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"name": "Inception"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["detail"],
        "A movie with the name 'Inception' and release date '2010-07-16' already exists."
    );

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({"name": "Inception", "date": "2014-11-07"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_movie() {
    let (app, state) = spawn_app().await;
    let created = create(&app, movie("Inception")).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie with the given ID was not found.");

    assert_eq!(state.store().list_genres().await.unwrap().len(), 3);
    assert_eq!(state.store().list_actors().await.unwrap().len(), 2);
    assert!(state.store().find_country("USA").await.unwrap().is_some());

    // The same identity can be created again once deleted.
    create(&app, movie("Inception")).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_share_new_references() {
    let (app, state) = spawn_app().await;

    let mut requests = tokio::task::JoinSet::new();
    for i in 0..40 {
        let app = app.clone();
        let mut payload = movie(&format!("Parallel {i}"));
        payload["genres"] = json!(["NewGenre"]);
        requests.spawn(async move {
            send(&app, "POST", "/api/v1/movies", Some(payload)).await.0
        });
    }

    let mut statuses = Vec::new();
    while let Some(status) = requests.join_next().await {
        statuses.push(status.unwrap());
    }
    assert!(
        statuses.iter().all(|status| *status == StatusCode::CREATED),
        "statuses: {statuses:?}"
    );

    let genres = state.store().list_genres().await.unwrap();
    assert_eq!(genres.iter().filter(|g| g.name == "NewGenre").count(), 1);
    assert_eq!(state.store().list_countries().await.unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/v1/movies?per_page=20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 40);
}

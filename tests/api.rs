use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use moviedb_rs::config::Config;
use moviedb_rs::db::SqliteRepository;
use moviedb_rs::server::{build_router, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

async fn seeded_app() -> Router {
    let pool = memory_pool().await;

    sqlx::query(
        "CREATE TABLE movies (
            id INTEGER PRIMARY KEY,
            title TEXT,
            director TEXT,
            genre TEXT,
            release_year INTEGER,
            rating REAL,
            actor TEXT,
            box_office_collection INTEGER
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO movies VALUES
            (1, 'Dangal', 'Nitesh Tiwari', 'Biography', 2016, 4.8, 'Aamir Khan', 220),
            (2, 'Baahubali 2: The Conclusion', 'S.S. Rajamouli', 'Action', 2017, 4.7, 'Prabhas', 181),
            (3, 'PK', 'Rajkumar Hirani', 'Comedy', 2014, 4.6, 'Aamir Khan', 140),
            (4, 'Bajrangi Bhaijaan', 'Kabir Khan', 'Drama', 2015, 4.5, 'Salman Khan', 130),
            (5, 'Sultan', 'Ali Abbas Zafar', 'Drama', 2016, 4.3, 'Salman Khan', 120),
            (6, 'Sanju', 'Rajkumar Hirani', 'Biography', 2018, 4.4, 'Ranbir Kapoor', 120)",
    )
    .execute(&pool)
    .await
    .unwrap();

    app_for(pool)
}

fn app_for(pool: SqlitePool) -> Router {
    let db = Arc::new(SqliteRepository::from_pool(pool));
    build_router(AppState::new(Config::default(), db))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn ids(value: &Value) -> Vec<i64> {
    value["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn root_returns_banner() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!({ "message": "BD4.1 CW - SQL Queries & async/await" })
    );
}

#[tokio::test]
async fn root_does_not_touch_storage() {
    let app = app_for(memory_pool().await);
    let (status, value) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["message"], "BD4.1 CW - SQL Queries & async/await");
}

#[tokio::test]
async fn list_movies_returns_all_rows() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&value), vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn genre_filter_returns_matches_in_storage_order() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies/genre/Biography").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!({
            "movies": [
                {
                    "id": 1,
                    "title": "Dangal",
                    "director": "Nitesh Tiwari",
                    "genre": "Biography",
                    "release_year": 2016,
                    "rating": 4.8,
                    "actor": "Aamir Khan",
                    "box_office_collection": 220
                },
                {
                    "id": 6,
                    "title": "Sanju",
                    "director": "Rajkumar Hirani",
                    "genre": "Biography",
                    "release_year": 2018,
                    "rating": 4.4,
                    "actor": "Ranbir Kapoor",
                    "box_office_collection": 120
                }
            ]
        })
    );
}

#[tokio::test]
async fn unknown_genre_is_empty_not_an_error() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies/genre/Horror").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({ "movies": [] }));
}

#[tokio::test]
async fn genre_path_is_percent_decoded() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies/genre/Sci%20Fi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({ "movies": [] }));
}

#[tokio::test]
async fn details_returns_single_element_array() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies/details/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&value), vec![3]);
    assert_eq!(value["movies"][0]["title"], "PK");
    assert_eq!(value["movies"][0]["genre"], "Comedy");
    assert!(value.get("movie").is_none());
}

#[tokio::test]
async fn details_for_missing_id_is_empty_with_200() {
    let app = seeded_app().await;
    for uri in ["/movies/details/99", "/movies/details/abc"] {
        let (status, value) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "movies": [] }));
    }
}

#[tokio::test]
async fn every_row_is_found_by_its_release_year() {
    let app = seeded_app().await;
    let (_, all) = get(&app, "/movies").await;
    for movie in all["movies"].as_array().unwrap() {
        let uri = format!("/movies/release_year/{}", movie["release_year"]);
        let (status, value) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(ids(&value).contains(&movie["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
async fn release_year_returns_all_matches() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies/release_year/2016").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&value), vec![1, 5]);
}

#[tokio::test]
async fn store_failure_is_a_500_with_error_body() {
    let app = app_for(memory_pool().await);
    for uri in [
        "/movies",
        "/movies/genre/Drama",
        "/movies/details/1",
        "/movies/release_year/2016",
    ] {
        let (status, value) = get(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(value["error"].as_str().unwrap().contains("no such table"));
    }
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/actors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn trailing_slash_routes_like_bare_path() {
    let app = seeded_app().await;
    let (status, value) = get(&app, "/movies/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&value), vec![1, 2, 3, 4, 5, 6]);

    let (status, value) = get(&app, "/movies/genre/Drama/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&value), vec![4, 5]);

    let (status, value) = get(&app, "/movies//details/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&value), vec![3]);
}

#[tokio::test]
async fn options_on_unrouted_path_is_200() {
    let app = seeded_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

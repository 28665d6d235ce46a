use axum::{
    extract::Request,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{self, ErrorResponse};
use crate::config::Config;
use crate::db::SqliteRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<SqliteRepository>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<SqliteRepository>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/movies", get(api::list_movies))
        .route("/movies/genre/:genre", get(api::movies_by_genre))
        .route("/movies/details/:id", get(api::movie_details))
        .route(
            "/movies/release_year/:release_year",
            get(api::movies_by_release_year),
        );

    let routes = Router::new()
        .route("/", get(api::root))
        .merge(movie_routes)
        .fallback(fallback_handler)
        .with_state(state);

    // Layers on a router run after its route match, so the path is rewritten
    // in an outer router whose only target is the real one.
    Router::new()
        .fallback_service(routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum::middleware::from_fn(crate::middleware::log_request))
                .layer(axum::middleware::from_fn(crate::middleware::normalize_path)),
        )
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    // CORS preflight for paths without an explicit route
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found"))).into_response()
}

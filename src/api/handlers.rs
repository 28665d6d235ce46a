use axum::{
    extract::{Path, State},
    Json,
};

use super::types::*;
use crate::db::{MovieRepo, Movies};
use crate::server::AppState;

pub async fn root(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: state.config.banner.clone(),
    })
}

pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Movies>, ApiError> {
    Ok(Json(state.db.list_movies().await?))
}

pub async fn movies_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> Result<Json<Movies>, ApiError> {
    Ok(Json(state.db.movies_by_genre(&genre).await?))
}

// Single-entity lookup, but the reply keeps the plural `movies` array.
pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movies>, ApiError> {
    Ok(Json(state.db.movies_by_id(&id).await?))
}

pub async fn movies_by_release_year(
    State(state): State<AppState>,
    Path(release_year): Path<String>,
) -> Result<Json<Movies>, ApiError> {
    Ok(Json(state.db.movies_by_release_year(&release_year).await?))
}

//! Title search proxied to Jikan.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use levelup_core::error::CoreError;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// `?q=&limit=` for the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

impl SearchParams {
    /// Trimmed, non-empty query text.
    fn query(&self) -> Result<&str, CoreError> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q),
            _ => Err(CoreError::Validation(
                "query parameter 'q' must not be empty".to_string(),
            )),
        }
    }

    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

// ---------------------------------------------------------------------------
// GET /search/anime
// ---------------------------------------------------------------------------

pub async fn search_anime(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.query()?;
    let results = state.jikan.search_anime(q, params.limit()).await?;
    tracing::debug!(query = q, count = results.len(), "Anime search");
    Ok(Json(DataResponse { data: results }))
}

// ---------------------------------------------------------------------------
// GET /search/manga
// ---------------------------------------------------------------------------

pub async fn search_manga(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.query()?;
    let results = state.jikan.search_manga(q, params.limit()).await?;
    tracing::debug!(query = q, count = results.len(), "Manga search");
    Ok(Json(DataResponse { data: results }))
}

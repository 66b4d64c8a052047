use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{MediaKind, Title};
use crate::store::{FavoritesStore, QueryState};

use super::views::{
    DetailsView, FavoritesView, FeaturedView, HomeView, SearchResultsView, TitleCard, TitleRow,
    TrailerView,
};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Turns a list query into a home row; failed or empty lists are left out
fn row(label: &'static str, state: QueryState<Vec<Title>>) -> Option<TitleRow> {
    if let Some(err) = &state.error {
        tracing::warn!(row = label, error = %err, "Home row unavailable");
        return None;
    }
    let titles = state.data?;
    if titles.is_empty() {
        return None;
    }
    Some(TitleRow {
        label,
        titles: titles.iter().map(TitleCard::from).collect(),
    })
}

/// Home page: featured title plus the category rows
pub async fn home(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<HomeView> {
    let catalog = &state.catalog;
    let (featured, popular_movies, popular_tv, top_movies, top_tv) = tokio::join!(
        catalog.featured(),
        catalog.popular(MediaKind::Movie),
        catalog.popular(MediaKind::Tv),
        catalog.top_rated(MediaKind::Movie),
        catalog.top_rated(MediaKind::Tv),
    );

    let featured = match featured.into_result() {
        Ok(title) => title,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Featured title unavailable");
            None
        }
    };

    let featured = match featured {
        Some(title) => {
            let is_favorite = state.favorites.read().await.is_favorite(title.id);
            Some(FeaturedView::new(&title, is_favorite))
        }
        None => None,
    };

    let rows: Vec<TitleRow> = [
        row("Popular Movies", popular_movies),
        row("Popular TV Shows", popular_tv),
        row("Top Rated Movies", top_movies),
        row("Top Rated TV Shows", top_tv),
    ]
    .into_iter()
    .flatten()
    .collect();

    tracing::info!(
        request_id = %request_id,
        featured = featured.is_some(),
        rows = rows.len(),
        "Home assembled"
    );

    Json(HomeView { featured, rows })
}

/// First page of title results for `q`
pub async fn search_results(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResultsView>> {
    let page = state.catalog.search(&params.q).await.into_result()?;

    let view = match page {
        Some(page) => SearchResultsView {
            query: params.q,
            total_results: page.total_results,
            total_pages: page.total_pages,
            results: page
                .results
                .iter()
                .filter_map(TitleCard::from_search_result)
                .collect(),
        },
        None => SearchResultsView {
            query: params.q,
            total_results: 0,
            total_pages: 0,
            results: Vec::new(),
        },
    };

    Ok(Json(view))
}

/// Title details; credits and recommendations are only requested once the title resolved
pub async fn title_details(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((kind, id)): Path<(MediaKind, u64)>,
) -> AppResult<Json<DetailsView>> {
    let catalog = &state.catalog;
    let title = catalog
        .details(id, kind)
        .await
        .into_result()?
        .ok_or_else(|| AppError::Internal(format!("details for {} {} not loaded", kind, id)))?;

    let (credits, recommendations) = tokio::join!(
        catalog.credits(id, kind, true),
        catalog.recommendations(id, kind, true),
    );

    if let Some(err) = credits.error.as_ref().or(recommendations.error.as_ref()) {
        tracing::warn!(
            request_id = %request_id,
            id = id,
            kind = %kind,
            error = %err,
            "Secondary title data unavailable"
        );
    }

    let recommended = recommendations
        .data
        .map(|page| page.results)
        .unwrap_or_default();
    let is_favorite = state.favorites.read().await.is_favorite(id);

    Ok(Json(DetailsView::new(
        title,
        credits.data.as_ref(),
        &recommended,
        is_favorite,
    )))
}

/// YouTube trailer of a title
pub async fn trailer(
    State(state): State<AppState>,
    Path((kind, id)): Path<(MediaKind, u64)>,
) -> AppResult<Json<TrailerView>> {
    let key = state
        .catalog
        .trailer_key(id, kind)
        .await
        .into_result()?
        .flatten()
        .ok_or_else(|| AppError::NotFound("Trailer not found".to_string()))?;

    Ok(Json(TrailerView::new(key)))
}

/// Saved titles, in the order they were added
pub async fn get_favorites(State(state): State<AppState>) -> Json<FavoritesView> {
    let favorites = state.favorites.read().await;
    Json(FavoritesView {
        count: favorites.len(),
        titles: favorites.list().to_vec(),
    })
}

/// Runs a favorites mutation on the blocking pool; it writes the storage slot
/// while holding the write guard, so mutations reach the file in order
async fn mutate_favorites<R, F>(state: &AppState, mutation: F) -> AppResult<R>
where
    R: Send + 'static,
    F: FnOnce(&mut FavoritesStore) -> R + Send + 'static,
{
    let mut favorites = Arc::clone(&state.favorites).write_owned().await;
    tokio::task::spawn_blocking(move || mutation(&mut favorites))
        .await
        .map_err(|e| AppError::Internal(format!("favorites update failed: {}", e)))
}

/// Saves a title; re-adding a saved title keeps the first copy
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(title): Json<Title>,
) -> AppResult<(StatusCode, Json<FavoritesView>)> {
    let id = title.id;
    let (added, view) = mutate_favorites(&state, move |favorites| {
        let added = favorites.add(title);
        let view = FavoritesView {
            count: favorites.len(),
            titles: favorites.list().to_vec(),
        };
        (added, view)
    })
    .await?;

    tracing::info!(id = id, added = added, "Favorite saved");

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(view)))
}

/// Removes a saved title; removing an unsaved id is a no-op
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    let removed = mutate_favorites(&state, move |favorites| favorites.remove(id)).await?;
    tracing::info!(id = id, removed = removed, "Favorite removed");
    Ok(StatusCode::NO_CONTENT)
}

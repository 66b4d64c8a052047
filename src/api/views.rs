use serde::Serialize;

use crate::models::{Credits, MediaKind, SearchResult, Title};
use crate::services::formatters::{format_duration, year_of};
use crate::services::images::{image_url, trailer_watch_url, ImageSize};
use crate::ui::Route;

/// Compact title used by rows, search results and recommendations
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleCard {
    pub id: u64,
    pub media_type: MediaKind,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    pub vote_average: f64,
    pub path: String,
}

impl From<&Title> for TitleCard {
    fn from(title: &Title) -> Self {
        Self::with_poster_size(title, ImageSize::W500)
    }
}

impl TitleCard {
    /// Card whose poster uses `size`; rows use `w500`, the details carousel `w200`
    pub fn with_poster_size(title: &Title, size: ImageSize) -> Self {
        Self {
            id: title.id,
            media_type: title.media_type,
            title: title.display_title.clone(),
            poster_url: image_url(title.poster_path.as_deref(), size),
            year: year_of(title),
            vote_average: title.vote_average,
            path: Route::Details {
                kind: title.media_type,
                id: title.id,
            }
            .path(),
        }
    }

    /// Card for a search hit; `None` for people and other non-title results
    pub fn from_search_result(result: &SearchResult) -> Option<Self> {
        let kind = result.media_kind()?;
        let year = result
            .release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok());

        Some(Self {
            id: result.id,
            media_type: kind,
            title: result.display_title.clone(),
            poster_url: image_url(result.poster_path.as_deref(), ImageSize::W500),
            year,
            vote_average: result.vote_average,
            path: Route::Details {
                kind,
                id: result.id,
            }
            .path(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedView {
    #[serde(flatten)]
    pub card: TitleCard,
    pub backdrop_url: Option<String>,
    pub overview: String,
    pub genres: Vec<String>,
    pub is_favorite: bool,
}

impl FeaturedView {
    pub fn new(title: &Title, is_favorite: bool) -> Self {
        Self {
            card: TitleCard::from(title),
            backdrop_url: image_url(title.backdrop_path.as_deref(), ImageSize::Original),
            overview: title.overview.clone(),
            genres: title.genres.iter().map(|genre| genre.name.clone()).collect(),
            is_favorite,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleRow {
    pub label: &'static str,
    pub titles: Vec<TitleCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub featured: Option<FeaturedView>,
    pub rows: Vec<TitleRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultsView {
    pub query: String,
    pub total_results: u32,
    pub total_pages: u32,
    pub results: Vec<TitleCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub title: Title,
    pub backdrop_url: Option<String>,
    pub year: Option<i32>,
    /// Formatted runtime, movies only
    pub runtime: Option<String>,
    /// "Director" for movies, "Created by" for series
    pub credit_label: &'static str,
    pub credit_line: Option<String>,
    pub principal_cast: Vec<String>,
    pub recommendations: Vec<TitleCard>,
    pub is_favorite: bool,
}

impl DetailsView {
    pub fn new(
        title: Title,
        credits: Option<&Credits>,
        recommendations: &[Title],
        is_favorite: bool,
    ) -> Self {
        let (credit_label, credit_line) = match title.media_type {
            MediaKind::Movie => (
                "Director",
                credits
                    .and_then(Credits::director)
                    .map(|director| director.name.clone()),
            ),
            MediaKind::Tv => (
                "Created by",
                Some(title.created_by.join(", ")).filter(|line| !line.is_empty()),
            ),
        };

        let principal_cast = credits
            .map(|credits| {
                credits
                    .principal_cast()
                    .into_iter()
                    .map(|actor| actor.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        let runtime = match title.media_type {
            MediaKind::Movie => title.runtime.map(|minutes| format_duration(Some(minutes))),
            MediaKind::Tv => None,
        };

        Self {
            backdrop_url: image_url(title.backdrop_path.as_deref(), ImageSize::Original),
            year: year_of(&title),
            runtime,
            credit_label,
            credit_line,
            principal_cast,
            recommendations: recommendations
                .iter()
                .map(|title| TitleCard::with_poster_size(title, ImageSize::W200))
                .collect(),
            is_favorite,
            title,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailerView {
    pub key: String,
    pub url: String,
}

impl TrailerView {
    pub fn new(key: String) -> Self {
        let url = trailer_watch_url(&key);
        Self { key, url }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoritesView {
    pub count: usize,
    pub titles: Vec<Title>,
}

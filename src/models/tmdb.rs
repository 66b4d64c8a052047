// ============================================================================
// TMDB API Types
// ============================================================================

use serde::Deserialize;

use super::Genre;

/// Raw movie, series or person record as returned by TMDB list, details and search endpoints
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`.
/// List endpoints for a single category omit `media_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTitle {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Option<Vec<u32>>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub created_by: Option<Vec<RawCreator>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCreator {
    pub id: u64,
    pub name: String,
}

/// Paged listing envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    pub results: Vec<T>,
}

fn first_page() -> u32 {
    1
}

/// Entry of `/{kind}/{id}/videos`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVideos {
    pub results: Vec<Video>,
}

use serde::{Deserialize, Serialize};

use super::{MediaKind, RawTitle};

/// A genre attached to a title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A normalized movie or series catalog entry
///
/// `media_type` is always set, even when the upstream listing omitted it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: u64,
    /// `title` for movies, `name` for series
    pub display_title: String,
    pub media_type: MediaKind,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    /// Release date for movies, first air date for series
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    /// Movie runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Per-episode runtimes for series
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Creator names, series only
    #[serde(default)]
    pub created_by: Vec<String>,
}

impl Title {
    /// Runtime in minutes: the movie runtime or the first episode runtime of a series
    pub fn runtime_minutes(&self) -> Option<u32> {
        match self.media_type {
            MediaKind::Movie => self.runtime,
            MediaKind::Tv => self.episode_run_time.first().copied(),
        }
    }
}

/// Kind reported by the multi-search endpoint, which also returns people
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMediaType {
    Movie,
    Tv,
    Person,
    #[serde(other)]
    Other,
}

/// Entry of a multi-search result page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    pub display_title: String,
    pub media_type: SearchMediaType,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
}

impl SearchResult {
    /// The media kind when this result is a title; `None` for people and unknown kinds
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self.media_type {
            SearchMediaType::Movie => Some(MediaKind::Movie),
            SearchMediaType::Tv => Some(MediaKind::Tv),
            SearchMediaType::Person | SearchMediaType::Other => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawTitle {
    fn display_title(&self) -> String {
        non_empty(self.title.clone())
            .or_else(|| non_empty(self.name.clone()))
            .unwrap_or_default()
    }

    /// Normalizes the record as `kind`, ignoring any upstream `media_type`
    pub fn stamped(self, kind: MediaKind) -> Title {
        let display_title = self.display_title();
        let release_date = match kind {
            MediaKind::Movie => non_empty(self.release_date).or(non_empty(self.first_air_date)),
            MediaKind::Tv => non_empty(self.first_air_date).or(non_empty(self.release_date)),
        };

        Title {
            id: self.id,
            display_title,
            media_type: kind,
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average.unwrap_or_default(),
            release_date,
            overview: self.overview.unwrap_or_default(),
            runtime: self.runtime,
            episode_run_time: self.episode_run_time.unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            created_by: self
                .created_by
                .unwrap_or_default()
                .into_iter()
                .map(|creator| creator.name)
                .collect(),
        }
    }

    /// Normalizes the record using its upstream `media_type`
    ///
    /// A missing kind falls back to `fallback`. Records of non-title kinds
    /// (people, collections) yield `None`.
    pub fn normalize(self, fallback: MediaKind) -> Option<Title> {
        let kind = match self.media_type.as_deref() {
            None => fallback,
            Some(other) => other.parse::<MediaKind>().ok()?,
        };
        Some(self.stamped(kind))
    }

    /// Converts a multi-search record, keeping people and unknown kinds
    pub fn into_search_result(self) -> SearchResult {
        let display_title = self.display_title();
        let media_type = match self.media_type.as_deref() {
            Some("movie") => SearchMediaType::Movie,
            Some("tv") => SearchMediaType::Tv,
            Some("person") => SearchMediaType::Person,
            _ => SearchMediaType::Other,
        };

        SearchResult {
            id: self.id,
            display_title,
            media_type,
            poster_path: non_empty(self.poster_path).or(non_empty(self.profile_path)),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average.unwrap_or_default(),
            release_date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
            overview: self.overview.unwrap_or_default(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod credits;
pub mod title;
pub mod tmdb;

pub use credits::{CastMember, Credits, CrewMember};
pub use title::{Genre, SearchMediaType, SearchResult, Title};
pub use tmdb::{RawPage, RawTitle, Video};

/// Discriminator distinguishing movie and series records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by TMDB and by the details route
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

/// One page of a paged TMDB listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paged<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<T>,
}

impl<T> Paged<T> {
    pub fn empty() -> Self {
        Self {
            page: 1,
            total_pages: 0,
            total_results: 0,
            results: Vec::new(),
        }
    }
}

/// Result page of the multi-search endpoint
pub type SearchPage = Paged<SearchResult>;

/// Titles recommended for another title
pub type RecommendationPage = Paged<Title>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_serialization() {
        assert_eq!(serde_json::to_string(&MediaKind::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaKind::Tv).unwrap(), "\"tv\"");
    }

    #[test]
    fn test_media_kind_from_str() {
        assert_eq!("tv".parse::<MediaKind>(), Ok(MediaKind::Tv));
        assert!("person".parse::<MediaKind>().is_err());
    }
}

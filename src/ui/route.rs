use std::fmt::Display;

use url::form_urlencoded;

use crate::models::MediaKind;

/// Front-end navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    SearchResults { query: String },
    Details { kind: MediaKind, id: u64 },
    Favorites,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SearchResults { query } => {
                let encoded: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", query)
                    .finish();
                format!("/search-results?{}", encoded)
            }
            Route::Details { kind, id } => format!("/{}/{}", kind, id),
            Route::Favorites => "/favorites".to_string(),
        }
    }

    /// Parses a path (with optional query string); `None` for unknown paths
    pub fn parse(target: &str) -> Option<Route> {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [""] => Some(Route::Home),
            ["favorites"] => Some(Route::Favorites),
            ["search-results"] => {
                let query = form_urlencoded::parse(query.as_bytes())
                    .find(|(name, _)| name == "q")
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default();
                Some(Route::SearchResults { query })
            }
            [kind, id] => Some(Route::Details {
                kind: kind.parse().ok()?,
                id: id.parse().ok()?,
            }),
            _ => None,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Favorites.path(), "/favorites");
        assert_eq!(
            Route::Details {
                kind: MediaKind::Tv,
                id: 1399
            }
            .path(),
            "/tv/1399"
        );
        assert_eq!(
            Route::SearchResults {
                query: "star wars & more".to_string()
            }
            .path(),
            "/search-results?q=star+wars+%26+more"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/favorites"), Some(Route::Favorites));
        assert_eq!(
            Route::parse("/movie/603"),
            Some(Route::Details {
                kind: MediaKind::Movie,
                id: 603
            })
        );
        assert_eq!(
            Route::parse("/search-results?q=star+wars+%26+more"),
            Some(Route::SearchResults {
                query: "star wars & more".to_string()
            })
        );
        assert_eq!(Route::parse("/person/6384"), None);
        assert_eq!(Route::parse("/movie/abc"), None);
    }
}

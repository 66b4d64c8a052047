use std::fmt::Display;

/// TMDB image CDN base
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Size token of a CDN image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Carousel thumbnails
    W200,
    /// Poster cards
    W500,
    /// Full resolution backdrops
    Original,
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        };
        write!(f, "{}", token)
    }
}

/// Builds a CDN URL for an image path fragment.
///
/// `None` means no image is available and the renderer should show a placeholder.
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    path.map(|path| format!("{}{}{}", IMAGE_BASE_URL, size, path))
}

pub fn trailer_watch_url(key: &str) -> String {
    format!("{}{}", YOUTUBE_WATCH_URL, key)
}

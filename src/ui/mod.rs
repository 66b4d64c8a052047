pub mod carousel;
pub mod route;
pub mod search_overlay;

pub use carousel::{CarouselController, ScrollAffordance, ScrollDirection, ScrollMetrics, Viewport};
pub use route::Route;
pub use search_overlay::{KeyChord, OverlayPhase, SearchOverlay};

//! Horizontal carousel scroll affordances.
//!
//! The controller watches a [`Viewport`] and derives whether the left and right
//! scroll buttons should be enabled. It recomputes on attach and on every scroll
//! and resize event, and unregisters its listeners when dropped.

use std::sync::{Arc, Weak};

use tokio::sync::watch;

/// Distance from an edge, in pixels, still treated as being at that edge
pub const EDGE_TOLERANCE_PX: f64 = 5.0;

/// Share of the visible width moved by one scroll button press
pub const SCROLL_FACTOR: f64 = 0.6;

/// Scroll geometry of a viewport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_offset: f64,
    pub visible_width: f64,
    pub content_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollAffordance {
    pub can_scroll_left: bool,
    pub can_scroll_right: bool,
}

impl ScrollAffordance {
    pub fn from_metrics(metrics: ScrollMetrics) -> Self {
        Self {
            can_scroll_left: metrics.scroll_offset > EDGE_TOLERANCE_PX,
            can_scroll_right: metrics.scroll_offset + metrics.visible_width
                < metrics.content_width - EDGE_TOLERANCE_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    Scroll,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

pub type ListenerId = u64;

pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// A scrollable element the controller can observe and move
pub trait Viewport: Send + Sync {
    fn metrics(&self) -> ScrollMetrics;

    /// Requests a relative scroll. Returns immediately; the motion may be animated.
    fn scroll_by(&self, delta: f64, behavior: ScrollBehavior);

    fn add_listener(&self, event: ViewportEvent, listener: Listener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

pub struct CarouselController<V: Viewport + 'static> {
    viewport: Arc<V>,
    state: Arc<watch::Sender<ScrollAffordance>>,
    listeners: Vec<ListenerId>,
}

impl<V: Viewport + 'static> CarouselController<V> {
    /// Computes the initial affordance and starts listening for scroll and resize
    pub fn attach(viewport: Arc<V>) -> Self {
        let initial = ScrollAffordance::from_metrics(viewport.metrics());
        let (state, _) = watch::channel(initial);
        let state = Arc::new(state);

        let listeners = [ViewportEvent::Scroll, ViewportEvent::Resize]
            .into_iter()
            .map(|event| {
                let target: Weak<V> = Arc::downgrade(&viewport);
                let state = Arc::clone(&state);
                let listener: Listener = Arc::new(move || {
                    if let Some(viewport) = target.upgrade() {
                        let affordance = ScrollAffordance::from_metrics(viewport.metrics());
                        state.send_if_modified(|current| {
                            let changed = *current != affordance;
                            *current = affordance;
                            changed
                        });
                    }
                });
                viewport.add_listener(event, listener)
            })
            .collect();

        tracing::trace!(?initial, "carousel attached");

        Self {
            viewport,
            state,
            listeners,
        }
    }

    pub fn affordance(&self) -> ScrollAffordance {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScrollAffordance> {
        self.state.subscribe()
    }

    /// Requests a smooth scroll of 60% of the visible width and returns the delta
    ///
    /// Not debounced: pressing again mid-animation adds another request.
    pub fn scroll(&self, direction: ScrollDirection) -> f64 {
        let distance = (self.viewport.metrics().visible_width * SCROLL_FACTOR).round();
        let delta = match direction {
            ScrollDirection::Left => -distance,
            ScrollDirection::Right => distance,
        };
        self.viewport.scroll_by(delta, ScrollBehavior::Smooth);
        delta
    }

    /// Stops listening; equivalent to dropping the controller
    pub fn detach(self) {}
}

impl<V: Viewport + 'static> Drop for CarouselController<V> {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.viewport.remove_listener(id);
        }
        tracing::trace!("carousel detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeViewport {
        metrics: Mutex<ScrollMetrics>,
        listeners: Mutex<HashMap<ListenerId, (ViewportEvent, Listener)>>,
        next_id: Mutex<ListenerId>,
        scroll_requests: Mutex<Vec<(f64, ScrollBehavior)>>,
    }

    impl FakeViewport {
        fn new(scroll_offset: f64, visible_width: f64, content_width: f64) -> Arc<Self> {
            let viewport = Self::default();
            *viewport.metrics.lock().unwrap() = ScrollMetrics {
                scroll_offset,
                visible_width,
                content_width,
            };
            Arc::new(viewport)
        }

        fn set_offset(&self, scroll_offset: f64) {
            self.metrics.lock().unwrap().scroll_offset = scroll_offset;
            self.fire(ViewportEvent::Scroll);
        }

        fn set_visible_width(&self, visible_width: f64) {
            self.metrics.lock().unwrap().visible_width = visible_width;
            self.fire(ViewportEvent::Resize);
        }

        fn fire(&self, event: ViewportEvent) {
            let listeners: Vec<Listener> = self
                .listeners
                .lock()
                .unwrap()
                .values()
                .filter(|(registered, _)| *registered == event)
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in listeners {
                listener();
            }
        }

        fn listener_count(&self) -> usize {
            self.listeners.lock().unwrap().len()
        }
    }

    impl Viewport for FakeViewport {
        fn metrics(&self) -> ScrollMetrics {
            *self.metrics.lock().unwrap()
        }

        fn scroll_by(&self, delta: f64, behavior: ScrollBehavior) {
            self.scroll_requests.lock().unwrap().push((delta, behavior));
        }

        fn add_listener(&self, event: ViewportEvent, listener: Listener) -> ListenerId {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            self.listeners
                .lock()
                .unwrap()
                .insert(*next_id, (event, listener));
            *next_id
        }

        fn remove_listener(&self, id: ListenerId) {
            self.listeners.lock().unwrap().remove(&id);
        }
    }

    fn metrics(scroll_offset: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_offset,
            visible_width: 400.0,
            content_width: 1000.0,
        }
    }

    #[test]
    fn test_affordance_at_start() {
        let affordance = ScrollAffordance::from_metrics(metrics(0.0));
        assert!(!affordance.can_scroll_left);
        assert!(affordance.can_scroll_right);
    }

    #[test]
    fn test_affordance_at_end() {
        let affordance = ScrollAffordance::from_metrics(metrics(600.0));
        assert!(affordance.can_scroll_left);
        assert!(!affordance.can_scroll_right);
    }

    #[test]
    fn test_affordance_in_middle() {
        let affordance = ScrollAffordance::from_metrics(metrics(300.0));
        assert!(affordance.can_scroll_left);
        assert!(affordance.can_scroll_right);
    }

    #[test]
    fn test_affordance_within_tolerance() {
        assert!(!ScrollAffordance::from_metrics(metrics(5.0)).can_scroll_left);
        assert!(!ScrollAffordance::from_metrics(metrics(596.0)).can_scroll_right);
        assert!(ScrollAffordance::from_metrics(metrics(594.0)).can_scroll_right);
    }

    #[test]
    fn test_content_narrower_than_viewport() {
        let affordance = ScrollAffordance::from_metrics(ScrollMetrics {
            scroll_offset: 0.0,
            visible_width: 800.0,
            content_width: 500.0,
        });
        assert_eq!(affordance, ScrollAffordance::default());
    }

    #[test]
    fn test_recomputes_on_scroll_and_resize() {
        let viewport = FakeViewport::new(0.0, 400.0, 1000.0);
        let controller = CarouselController::attach(Arc::clone(&viewport));
        assert!(!controller.affordance().can_scroll_left);

        viewport.set_offset(600.0);
        assert!(controller.affordance().can_scroll_left);
        assert!(!controller.affordance().can_scroll_right);

        viewport.set_visible_width(200.0);
        assert!(controller.affordance().can_scroll_right);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let viewport = FakeViewport::new(0.0, 400.0, 1000.0);
        let controller = CarouselController::attach(Arc::clone(&viewport));
        let mut updates = controller.subscribe();

        viewport.set_offset(1.0);
        assert!(!updates.has_changed().unwrap());

        viewport.set_offset(300.0);
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().can_scroll_left);
    }

    #[test]
    fn test_drop_removes_every_listener() {
        let viewport = FakeViewport::new(0.0, 400.0, 1000.0);
        let controller = CarouselController::attach(Arc::clone(&viewport));
        assert_eq!(viewport.listener_count(), 2);

        controller.detach();
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_scroll_requests_sixty_percent_of_visible_width() {
        let viewport = FakeViewport::new(300.0, 415.0, 1000.0);
        let controller = CarouselController::attach(Arc::clone(&viewport));

        assert_eq!(controller.scroll(ScrollDirection::Right), 249.0);
        assert_eq!(controller.scroll(ScrollDirection::Right), 249.0);
        assert_eq!(controller.scroll(ScrollDirection::Left), -249.0);

        let requests = viewport.scroll_requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                (249.0, ScrollBehavior::Smooth),
                (249.0, ScrollBehavior::Smooth),
                (-249.0, ScrollBehavior::Smooth),
            ]
        );
    }
}

//! Search overlay state machine.
//!
//! ```text
//! Closed --open / Ctrl+K--> Open(empty) --type--> Open(query, loading) --> Open(query, results | error)
//!    ^                                                                                 |
//!    +------------------------ dismiss / submit / select ------------------------------+
//! ```
//!
//! The query is cleared whenever the overlay closes. Results come from the search
//! cache through a dedicated [`QueryObserver`], so a slow response for an earlier
//! query never replaces the results of the current one.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{SearchPage, SearchResult};
use crate::services::CatalogQueries;
use crate::store::{QueryObserver, QueryState};
use crate::ui::route::Route;

/// A key press with its Ctrl modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub key: char,
}

impl KeyChord {
    pub fn ctrl(key: char) -> Self {
        Self { ctrl: true, key }
    }

    pub fn plain(key: char) -> Self {
        Self { ctrl: false, key }
    }
}

/// What the overlay currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayPhase {
    Closed,
    /// Open with an empty query
    Idle,
    Loading,
    /// Title results (movies and series only)
    Results(Vec<SearchResult>),
    Failed,
}

pub struct SearchOverlay {
    catalog: Arc<CatalogQueries>,
    observer: QueryObserver<SearchPage>,
    is_open: bool,
    query: String,
}

impl SearchOverlay {
    pub fn new(catalog: Arc<CatalogQueries>) -> Self {
        let observer = catalog.search_observer();
        Self {
            catalog,
            observer,
            is_open: false,
            query: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn open(&mut self) {
        if !self.is_open {
            tracing::debug!("search overlay opened");
        }
        self.is_open = true;
    }

    /// Closes the overlay, clearing the query and abandoning any pending search
    pub fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
        self.observer.detach();
    }

    /// Global shortcut handling. Returns true when the chord was consumed.
    pub fn handle_key(&mut self, chord: KeyChord) -> bool {
        if chord.ctrl && chord.key == 'k' {
            self.open();
            return true;
        }
        false
    }

    /// Updates the query and searches for it
    ///
    /// Ignored while closed. Returns the background request, if one was needed.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<JoinHandle<()>> {
        if !self.is_open {
            return None;
        }
        self.query = query.into();
        self.catalog.observe_search(&self.observer, &self.query)
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<SearchPage>> {
        self.observer.subscribe()
    }

    pub fn phase(&self) -> OverlayPhase {
        if !self.is_open {
            return OverlayPhase::Closed;
        }
        if self.query.trim().is_empty() {
            return OverlayPhase::Idle;
        }

        let state = self.observer.state();
        if state.is_error() {
            return OverlayPhase::Failed;
        }
        match state.data {
            Some(page) => OverlayPhase::Results(title_results(page)),
            None if state.is_loading => OverlayPhase::Loading,
            None => OverlayPhase::Idle,
        }
    }

    /// Submits the current query: navigates to the results view and closes
    pub fn submit(&mut self) -> Option<Route> {
        if self.query.trim().is_empty() {
            return None;
        }
        let route = Route::SearchResults {
            query: self.query.clone(),
        };
        self.close();
        Some(route)
    }

    /// Opens the details of a selected result and closes. People are not navigable.
    pub fn select(&mut self, result: &SearchResult) -> Option<Route> {
        let kind = result.media_kind()?;
        let route = Route::Details {
            kind,
            id: result.id,
        };
        self.close();
        Some(route)
    }
}

/// Keeps only movie and series results
pub fn title_results(page: SearchPage) -> Vec<SearchResult> {
    page.results
        .into_iter()
        .filter(|result| result.media_kind().is_some())
        .collect()
}

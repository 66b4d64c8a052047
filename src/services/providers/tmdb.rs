/// The Movie Database (TMDB) v3 provider
///
/// All requests authenticate with the `api_key` query parameter and ask for the
/// configured language. Trailer lookups always use `en-US`, since localized video
/// listings are usually empty.
///
/// Endpoints:
/// - `/{kind}/popular`, `/{kind}/top_rated`: per-category lists, no `media_type` field
/// - `/trending/all/day`: mixed kinds, carries `media_type`
/// - `/search/multi`: movies, series and people
/// - `/{kind}/{id}`, `/{kind}/{id}/credits`, `/{kind}/{id}/recommendations`, `/{kind}/{id}/videos`
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        tmdb::RawVideos, Credits, MediaKind, Paged, RawPage, RawTitle, RecommendationPage,
        SearchPage, Title, Video,
    },
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const VIDEO_LANGUAGE: &str = "en-US";
const TRAILER_TYPE: &str = "Trailer";
const TRAILER_SITE: &str = "YouTube";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_base_url.clone(),
            config.tmdb_language.clone(),
        )
    }

    /// Issues a GET against `path` and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        language: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", language)])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::Decode(format!("Failed to parse TMDB response for {}: {}", path, e))
        })
    }

    async fn list(&self, kind: MediaKind, category: &str) -> AppResult<Vec<Title>> {
        let path = format!("/{}/{}", kind, category);
        let page: RawPage<RawTitle> = self.get_json(&path, &self.language, &[]).await?;

        let titles: Vec<Title> = page
            .results
            .into_iter()
            .map(|raw| raw.stamped(kind))
            .collect();

        tracing::info!(
            kind = %kind,
            category = category,
            results = titles.len(),
            provider = "tmdb",
            "Catalog list fetched"
        );

        Ok(titles)
    }
}

/// First video, in list order, that is a YouTube trailer
pub fn select_trailer(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|video| video.video_type == TRAILER_TYPE && video.site == TRAILER_SITE)
        .map(|video| video.key.clone())
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    async fn list_popular(&self, kind: MediaKind) -> AppResult<Vec<Title>> {
        self.list(kind, "popular").await
    }

    async fn list_top_rated(&self, kind: MediaKind) -> AppResult<Vec<Title>> {
        self.list(kind, "top_rated").await
    }

    async fn trending(&self) -> AppResult<Vec<Title>> {
        let page: RawPage<RawTitle> = self
            .get_json("/trending/all/day", &self.language, &[])
            .await?;

        let total = page.results.len();
        let titles: Vec<Title> = page
            .results
            .into_iter()
            .filter_map(|raw| raw.normalize(MediaKind::Movie))
            .collect();

        if titles.len() < total {
            tracing::debug!(
                dropped = total - titles.len(),
                "Dropped non-title entries from trending"
            );
        }

        tracing::info!(results = titles.len(), provider = "tmdb", "Trending fetched");

        Ok(titles)
    }

    async fn search_multi(&self, query: &str, page: u32) -> AppResult<SearchPage> {
        if query.trim().is_empty() {
            return Ok(Paged::empty());
        }

        let raw: RawPage<RawTitle> = self
            .get_json(
                "/search/multi",
                &self.language,
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        let results = Paged {
            page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
            results: raw
                .results
                .into_iter()
                .map(RawTitle::into_search_result)
                .collect(),
        };

        tracing::info!(
            query = %query,
            page = page,
            results = results.results.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(results)
    }

    async fn details(&self, id: u64, kind: MediaKind) -> AppResult<Title> {
        let path = format!("/{}/{}", kind, id);
        let raw: RawTitle = self.get_json(&path, &self.language, &[]).await?;

        tracing::debug!(id = id, kind = %kind, provider = "tmdb", "Details fetched");

        Ok(raw.stamped(kind))
    }

    async fn credits(&self, id: u64, kind: MediaKind) -> AppResult<Credits> {
        let path = format!("/{}/{}/credits", kind, id);
        self.get_json(&path, &self.language, &[]).await
    }

    async fn recommendations(&self, id: u64, kind: MediaKind) -> AppResult<RecommendationPage> {
        let path = format!("/{}/{}/recommendations", kind, id);
        let raw: RawPage<RawTitle> = self.get_json(&path, &self.language, &[]).await?;

        Ok(Paged {
            page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
            results: raw
                .results
                .into_iter()
                .filter_map(|item| item.normalize(kind))
                .collect(),
        })
    }

    async fn trailer_key(&self, id: u64, kind: MediaKind) -> AppResult<Option<String>> {
        let path = format!("/{}/{}/videos", kind, id);
        let videos: RawVideos = self.get_json(&path, VIDEO_LANGUAGE, &[]).await?;

        let key = select_trailer(&videos.results);

        tracing::debug!(
            id = id,
            kind = %kind,
            videos = videos.results.len(),
            found = key.is_some(),
            "Trailer lookup completed"
        );

        Ok(key)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

//! REST client for the Jikan v4 API (an unofficial MyAnimeList mirror).
//!
//! Used for title search and for the airing schedule that feeds the
//! release calendar. Upstream payloads are mapped into the flat
//! [`MediaSearchResult`] and [`ScheduledAnime`] shapes so handlers never
//! depend on Jikan's nesting.

use chrono::Weekday;
use levelup_core::calendar;
use serde::{Deserialize, Serialize};

/// Largest page size Jikan accepts.
pub const MAX_SEARCH_LIMIT: u32 = 25;

/// HTTP client for the Jikan API.
pub struct JikanClient {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the Jikan API layer.
#[derive(Debug, thiserror::Error)]
pub enum JikanError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Jikan returned a non-2xx status code (429 when rate limited).
    #[error("Jikan API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Upstream payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Images {
    jpg: Option<ImageSet>,
}

#[derive(Debug, Deserialize)]
struct ImageSet {
    image_url: Option<String>,
    large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Broadcast {
    time: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanAnime {
    mal_id: i64,
    title: String,
    title_english: Option<String>,
    #[serde(default)]
    images: Images,
    episodes: Option<i32>,
    status: Option<String>,
    score: Option<f64>,
    synopsis: Option<String>,
    year: Option<i32>,
    broadcast: Option<Broadcast>,
}

#[derive(Debug, Deserialize)]
struct JikanManga {
    mal_id: i64,
    title: String,
    title_english: Option<String>,
    #[serde(default)]
    images: Images,
    chapters: Option<i32>,
    volumes: Option<i32>,
    status: Option<String>,
    score: Option<f64>,
    synopsis: Option<String>,
}

// ---------------------------------------------------------------------------
// Mapped results
// ---------------------------------------------------------------------------

/// A search hit, ready to prefill an anime or manga entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSearchResult {
    pub mal_id: i64,
    pub title: String,
    pub title_english: Option<String>,
    pub media_type: &'static str,
    pub image_url: Option<String>,
    pub total_episodes: Option<i32>,
    pub total_chapters: Option<i32>,
    pub total_volumes: Option<i32>,
    /// Publication/airing status as reported upstream.
    pub status: Option<String>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub year: Option<i32>,
}

/// An anime airing on a given weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAnime {
    pub mal_id: i64,
    pub title: String,
    pub broadcast_time: Option<String>,
    pub broadcast_timezone: Option<String>,
}

fn pick_image(images: Images) -> Option<String> {
    images
        .jpg
        .and_then(|set| set.large_image_url.or(set.image_url))
}

impl From<JikanAnime> for MediaSearchResult {
    fn from(a: JikanAnime) -> Self {
        Self {
            mal_id: a.mal_id,
            title: a.title,
            title_english: a.title_english,
            media_type: calendar::MEDIA_TYPE_ANIME,
            image_url: pick_image(a.images),
            total_episodes: a.episodes,
            total_chapters: None,
            total_volumes: None,
            status: a.status,
            score: a.score,
            synopsis: a.synopsis,
            year: a.year,
        }
    }
}

impl From<JikanManga> for MediaSearchResult {
    fn from(m: JikanManga) -> Self {
        Self {
            mal_id: m.mal_id,
            title: m.title,
            title_english: m.title_english,
            media_type: calendar::MEDIA_TYPE_MANGA,
            image_url: pick_image(m.images),
            total_episodes: None,
            total_chapters: m.chapters,
            total_volumes: m.volumes,
            status: m.status,
            score: m.score,
            synopsis: m.synopsis,
            year: None,
        }
    }
}

/// Lower-case weekday name as used by `/schedules?filter=`.
pub fn schedule_filter(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl JikanClient {
    /// Create a client for the API at `base_url`, e.g. `https://api.jikan.moe/v4`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Search anime titles (`GET /anime?q=`).
    pub async fn search_anime(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MediaSearchResult>, JikanError> {
        let page: Page<JikanAnime> = self.search("anime", query, limit).await?;
        Ok(page.data.into_iter().map(MediaSearchResult::from).collect())
    }

    /// Search manga titles (`GET /manga?q=`).
    pub async fn search_manga(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MediaSearchResult>, JikanError> {
        let page: Page<JikanManga> = self.search("manga", query, limit).await?;
        Ok(page.data.into_iter().map(MediaSearchResult::from).collect())
    }

    /// One page of the airing schedule for `day`.
    ///
    /// Returns the entries and whether another page follows.
    pub async fn schedule_page(
        &self,
        day: Weekday,
        page: u32,
    ) -> Result<(Vec<ScheduledAnime>, bool), JikanError> {
        let response = self
            .client
            .get(format!("{}/schedules", self.base_url))
            .query(&[
                ("filter", schedule_filter(day).to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        let body: Page<JikanAnime> = Self::parse_response(response).await?;
        let has_next = body.pagination.is_some_and(|p| p.has_next_page);
        let entries = body
            .data
            .into_iter()
            .map(|a| {
                let (time, timezone) = match a.broadcast {
                    Some(b) => (b.time, b.timezone),
                    None => (None, None),
                };
                ScheduledAnime {
                    mal_id: a.mal_id,
                    title: a.title_english.unwrap_or(a.title),
                    broadcast_time: time,
                    broadcast_timezone: timezone,
                }
            })
            .collect();
        Ok((entries, has_next))
    }

    // ---- private helpers ----

    async fn search<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        query: &str,
        limit: u32,
    ) -> Result<Page<T>, JikanError> {
        let response = self
            .client
            .get(format!("{}/{kind}", self.base_url))
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.clamp(1, MAX_SEARCH_LIMIT).to_string()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code, returning a
    /// [`JikanError::ApiError`] with the body text otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, JikanError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(JikanError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, JikanError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn anime_payload_maps_to_search_result() {
        let page: Page<JikanAnime> = serde_json::from_value(json!({
            "pagination": { "has_next_page": false },
            "data": [{
                "mal_id": 52991,
                "title": "Sousou no Frieren",
                "title_english": "Frieren: Beyond Journey's End",
                "images": { "jpg": {
                    "image_url": "https://cdn.myanimelist.net/s.jpg",
                    "large_image_url": "https://cdn.myanimelist.net/l.jpg"
                }},
                "episodes": 28,
                "status": "Finished Airing",
                "score": 9.3,
                "synopsis": "An elf mage...",
                "year": 2023,
                "broadcast": { "day": "Fridays", "time": "23:00", "timezone": "Asia/Tokyo" }
            }]
        }))
        .unwrap();

        let results: Vec<MediaSearchResult> =
            page.data.into_iter().map(MediaSearchResult::from).collect();
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.mal_id, 52991);
        assert_eq!(r.media_type, "anime");
        assert_eq!(r.total_episodes, Some(28));
        assert_eq!(r.image_url.as_deref(), Some("https://cdn.myanimelist.net/l.jpg"));
        assert_eq!(r.total_chapters, None);
    }

    #[test]
    fn manga_payload_tolerates_missing_fields() {
        let manga: JikanManga = serde_json::from_value(json!({
            "mal_id": 2,
            "title": "Berserk",
            "title_english": null,
            "chapters": null,
            "volumes": null,
            "status": "Publishing",
            "score": null,
            "synopsis": null
        }))
        .unwrap();

        let r = MediaSearchResult::from(manga);
        assert_eq!(r.media_type, "manga");
        assert!(r.image_url.is_none());
        assert!(r.total_chapters.is_none());
    }

    #[test]
    fn schedule_filters_are_lowercase_weekdays() {
        assert_eq!(schedule_filter(Weekday::Mon), "monday");
        assert_eq!(schedule_filter(Weekday::Sun), "sunday");
    }
}

//! CinemaWorld catalog API client.
//!
//! Fetches listings and per-movie details from the CinemaWorld upstream
//! and maps its payload shape into the shared domain types.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::debug;

use common::config::ProviderApiConfig;
use common::{Error, MovieDetails, MovieListing, MovieProvider, RetryPolicy, Vendor};

const MOVIES_ENDPOINT: &str = "/api/cinemaworld/movies";
const MOVIE_DETAILS_ENDPOINT: &str = "/api/cinemaworld/movie";
const ACCESS_TOKEN_HEADER: &str = "x-access-token";

const VENDOR: Vendor = Vendor::CinemaWorld;

/// CinemaWorld API client with connection pooling and access-token auth.
#[derive(Debug, Clone)]
pub struct CinemaWorldClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    retry: RetryPolicy,
}

// ── CinemaWorld response types ────────────────────────────────────────

/// Listing response from `/api/cinemaworld/movies`.
#[derive(Debug, Deserialize)]
pub struct MoviesResponse {
    #[serde(rename = "Movies", default)]
    pub movies: Vec<MovieSummary>,
}

/// One listing entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieSummary {
    pub title: String,
    pub year: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub poster: String,
}

/// Full detail payload from `/api/cinemaworld/movie/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieDetailsPayload {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster: String,
    pub metascore: String,
    pub rating: String,
    pub votes: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub price: f64,
}

impl MovieSummary {
    fn into_listing(self) -> MovieListing {
        MovieListing {
            title: self.title,
            year: self.year,
            id: self.id,
            kind: self.kind,
            poster: self.poster,
        }
    }
}

impl MovieDetailsPayload {
    fn into_details(self) -> MovieDetails {
        MovieDetails {
            title: self.title,
            year: self.year,
            rated: self.rated,
            released: self.released,
            runtime: self.runtime,
            genre: self.genre,
            director: self.director,
            writer: self.writer,
            actors: self.actors,
            plot: self.plot,
            language: self.language,
            country: self.country,
            awards: Some(self.awards),
            poster: self.poster,
            metascore: self.metascore,
            rating: self.rating,
            votes: self.votes,
            external_id: self.id,
            kind: self.kind,
            price: self.price,
            vendor: VENDOR,
        }
    }
}

// ── Implementation ────────────────────────────────────────────────────

impl CinemaWorldClient {
    pub fn new(config: &ProviderApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .expect("failed to build CinemaWorld HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            retry: RetryPolicy::from_config(&config.retry),
        }
    }

    /// Fetch the raw listing response. Any non-success status is a
    /// provider failure here; the listing endpoint has no not-found
    /// outcome.
    async fn fetch_movies(&self) -> Result<MoviesResponse, Error> {
        let url = format!("{}{}", self.base_url, MOVIES_ENDPOINT);
        debug!("Fetching CinemaWorld listing: {}", url);

        let resp = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| Error::Http(format!("CinemaWorld listing request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                vendor: VENDOR,
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }

        resp.json::<MoviesResponse>().await.map_err(|e| Error::Decode {
            vendor: VENDOR,
            message: e.to_string(),
        })
    }

    /// Fetch the raw detail payload for one id; `Ok(None)` on 404.
    async fn fetch_movie_details(&self, id: &str) -> Result<Option<MovieDetailsPayload>, Error> {
        let encoded = utf8_percent_encode(id, NON_ALPHANUMERIC);
        let url = format!("{}{}/{}", self.base_url, MOVIE_DETAILS_ENDPOINT, encoded);
        debug!("Fetching CinemaWorld details: {}", url);

        let resp = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| Error::Http(format!("CinemaWorld details request failed: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                vendor: VENDOR,
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }

        let payload = resp
            .json::<MovieDetailsPayload>()
            .await
            .map_err(|e| Error::Decode {
                vendor: VENDOR,
                message: e.to_string(),
            })?;

        Ok(Some(payload))
    }
}

#[async_trait]
impl MovieProvider for CinemaWorldClient {
    fn vendor(&self) -> Vendor {
        VENDOR
    }

    async fn list_movies(&self) -> Result<Vec<MovieListing>, Error> {
        let response = self
            .retry
            .run(VENDOR, "listing", || self.fetch_movies())
            .await?;

        Ok(response
            .movies
            .into_iter()
            .map(MovieSummary::into_listing)
            .collect())
    }

    async fn movie_details(&self, id: &str) -> Result<Option<MovieDetails>, Error> {
        let payload = self
            .retry
            .run(VENDOR, "details", || self.fetch_movie_details(id))
            .await?;

        Ok(payload.map(MovieDetailsPayload::into_details))
    }
}

fn summarize_body(raw: &str) -> String {
    const MAX_CHARS: usize = 400;
    let compact = raw.replace(['\n', '\r'], " ");
    if compact.len() > MAX_CHARS {
        let cut: String = compact.chars().take(MAX_CHARS).collect();
        format!("{cut}…")
    } else {
        compact
    }
}

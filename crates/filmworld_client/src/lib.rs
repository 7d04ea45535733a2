//! FilmWorld catalog API client.
//!
//! Same upstream contract as CinemaWorld with a different payload schema;
//! notably the detail payload carries no awards field at all, so the
//! normalized record marks it absent rather than inventing an empty value.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::debug;

use common::config::ProviderApiConfig;
use common::{Error, MovieDetails, MovieListing, MovieProvider, RetryPolicy, Vendor};

const MOVIES_ENDPOINT: &str = "/api/filmworld/movies";
const MOVIE_DETAILS_ENDPOINT: &str = "/api/filmworld/movie";
const ACCESS_TOKEN_HEADER: &str = "x-access-token";

const VENDOR: Vendor = Vendor::FilmWorld;

/// FilmWorld API client with connection pooling and access-token auth.
#[derive(Debug, Clone)]
pub struct FilmWorldClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    retry: RetryPolicy,
}

// ── FilmWorld response types ──────────────────────────────────────────

/// Listing response from `/api/filmworld/movies`.
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

/// Full detail payload from `/api/filmworld/movie/{id}`.
///
/// Unlike CinemaWorld there is no `Awards` member.
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
            awards: None,
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

impl FilmWorldClient {
    pub fn new(config: &ProviderApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .expect("failed to build FilmWorld HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            retry: RetryPolicy::from_config(&config.retry),
        }
    }

    async fn fetch_movies(&self) -> Result<MoviesResponse, Error> {
        let url = format!("{}{}", self.base_url, MOVIES_ENDPOINT);
        debug!("Fetching FilmWorld listing: {}", url);

        let resp = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| Error::Http(format!("FilmWorld listing request failed: {e}")))?;

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

    async fn fetch_movie_details(&self, id: &str) -> Result<Option<MovieDetailsPayload>, Error> {
        let encoded = utf8_percent_encode(id, NON_ALPHANUMERIC);
        let url = format!("{}{}/{}", self.base_url, MOVIE_DETAILS_ENDPOINT, encoded);
        debug!("Fetching FilmWorld details: {}", url);

        let resp = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| Error::Http(format!("FilmWorld details request failed: {e}")))?;

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
impl MovieProvider for FilmWorldClient {
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

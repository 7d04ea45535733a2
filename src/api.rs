//! HTTP API surface.
//!
//! Three routes, matching the UI contract: a health probe, the merged
//! movie search, and a per-vendor detail lookup.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use common::{MovieItem, Vendor};
use movies::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub service: MovieService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/movies", get(list_movies))
        .route("/api/movies/{vendor}/{id}", get(movie_details))
        .with_state(state)
}

async fn health() -> &'static str {
    "I am alive!"
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    /// Partial title filter; absent means match everything.
    #[serde(default)]
    title: String,
}

async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<MovieItem>> {
    let items: Vec<MovieItem> = state.service.search(&params.title).collect().await;
    Json(items)
}

async fn movie_details(
    State(state): State<AppState>,
    Path((vendor, id)): Path<(String, String)>,
) -> Response {
    let vendor: Vendor = match vendor.parse() {
        Ok(v) => v,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("unknown vendor: {vendor}") })),
            )
                .into_response();
        }
    };

    match state.service.movie_details(vendor, &id).await {
        Ok(Some(details)) => Json(details).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            warn!("Detail lookup failed for {vendor}/{id}: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use common::{Error, MovieDetails, MovieListing, MovieProvider};

    use super::*;

    /// Minimal provider fake for exercising the HTTP status mapping.
    struct StubProvider {
        vendor: Vendor,
        details: Result<Option<MovieDetails>, Error>,
    }

    #[async_trait]
    impl MovieProvider for StubProvider {
        fn vendor(&self) -> Vendor {
            self.vendor
        }

        async fn list_movies(&self) -> Result<Vec<MovieListing>, Error> {
            Ok(vec![MovieListing {
                title: "Shock".into(),
                year: "2001".into(),
                id: "a1".into(),
                kind: "movie".into(),
                poster: "http://localhost/a1.jpg".into(),
            }])
        }

        async fn movie_details(&self, _id: &str) -> Result<Option<MovieDetails>, Error> {
            self.details.clone()
        }
    }

    fn state_with(details: Result<Option<MovieDetails>, Error>) -> AppState {
        let provider = Arc::new(StubProvider {
            vendor: Vendor::CinemaWorld,
            details,
        });
        AppState {
            service: MovieService::new(vec![provider], Duration::from_secs(30)),
        }
    }

    fn sample_details() -> MovieDetails {
        MovieDetails {
            title: "Shock".into(),
            year: "2001".into(),
            rated: "PG".into(),
            released: "25 May 2001".into(),
            runtime: "121 min".into(),
            genre: "Drama".into(),
            director: "D".into(),
            writer: "W".into(),
            actors: "A".into(),
            plot: "P".into(),
            language: "English".into(),
            country: "USA".into(),
            awards: Some("Won 6 Oscars.".into()),
            poster: "http://localhost/a1.jpg".into(),
            metascore: "92".into(),
            rating: "8.7".into(),
            votes: "915,459".into(),
            external_id: "a1".into(),
            kind: "movie".into(),
            price: 123.5,
            vendor: Vendor::CinemaWorld,
        }
    }

    #[tokio::test]
    async fn test_details_found_maps_to_200() {
        let state = state_with(Ok(Some(sample_details())));
        let response = movie_details(
            State(state),
            Path(("cinemaworld".to_string(), "a1".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_details_absent_maps_to_404() {
        let state = state_with(Ok(None));
        let response = movie_details(
            State(state),
            Path(("CinemaWorld".to_string(), "missing".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_details_upstream_failure_maps_to_502() {
        let state = state_with(Err(Error::UpstreamStatus {
            vendor: Vendor::CinemaWorld,
            status: 503,
            message: "unavailable".into(),
        }));
        let response = movie_details(
            State(state),
            Path(("cinemaworld".to_string(), "a1".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unknown_vendor_maps_to_400() {
        let state = state_with(Ok(None));
        let response = movie_details(
            State(state),
            Path(("netflix".to_string(), "a1".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_handler_returns_merged_items() {
        let state = state_with(Ok(None));
        let Json(items) = list_movies(
            State(state),
            Query(SearchParams {
                title: "sho".into(),
            }),
        )
        .await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].external_id, "a1");
        assert_eq!(items[0].vendor, Vendor::CinemaWorld);
    }
}

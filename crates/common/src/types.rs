//! Domain types shared across the provider clients, the aggregation
//! service, and the HTTP API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifies one upstream catalog provider.
///
/// The serialized form is the provider's canonical name (`"CinemaWorld"`,
/// `"FilmWorld"`); it is part of every cache key and stamped on every
/// merged item so callers can trace where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
    CinemaWorld,
    FilmWorld,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::CinemaWorld => "CinemaWorld",
            Vendor::FilmWorld => "FilmWorld",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = Error;

    /// Case-insensitive parse, so URL path segments like `cinemaworld`
    /// resolve to the canonical vendor.
    fn from_str(raw: &str) -> Result<Self, Error> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cinemaworld" => Ok(Vendor::CinemaWorld),
            "filmworld" => Ok(Vendor::FilmWorld),
            _ => Err(Error::UnknownVendor(raw.to_string())),
        }
    }
}

/// One listing entry as a provider reported it, already lifted out of the
/// provider's own payload shape but not yet filtered or vendor-stamped.
///
/// `kind` carries the provider's raw type tag (`"movie"` for catalog
/// listings); the aggregator decides what to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieListing {
    pub title: String,
    pub year: String,
    pub id: String,
    pub kind: String,
    pub poster: String,
}

/// A normalized catalog listing record in the merged view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieItem {
    pub title: String,
    pub year: String,
    #[serde(rename = "externalID")]
    pub external_id: String,
    pub poster: String,
    pub vendor: Vendor,
}

/// Full detail record for one movie from one provider.
///
/// `awards` is `None` for providers that never supply the field
/// (FilmWorld); an absent field is represented as absent, not as an empty
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<String>,
    pub poster: String,
    pub metascore: String,
    pub rating: String,
    pub votes: String,
    #[serde(rename = "externalID")]
    pub external_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub vendor: Vendor,
}

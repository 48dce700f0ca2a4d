//! Rust models matching the database schema.
//!
//! Row types serialize straight into the JSON returned by the API, so field
//! names follow the column names.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Homepage banner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Client logo with a link to the client's website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub website: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Service offering shown under a showroom category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBanner {
    pub title: String,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub website: String,
    pub logo_url: String,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub category: String,
    pub title: String,
    pub image_url: String,
}

/// Fields written by a client update. `None` keeps the stored logo URL.
#[derive(Debug, Clone)]
pub struct ClientPatch {
    pub name: String,
    pub website: String,
    pub logo_url: Option<String>,
}

/// Fields written by a service update. `None` keeps the stored image URL.
#[derive(Debug, Clone)]
pub struct ServicePatch {
    pub category: String,
    pub title: String,
    pub image_url: Option<String>,
}

/// Timestamp in the fixed-width form stored in `created_at` columns.
///
/// Fixed width keeps lexical and chronological order identical, which the
/// `ORDER BY created_at` queries rely on.
pub(crate) fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn timestamp_from_sql(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

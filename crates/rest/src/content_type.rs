//! Accept header negotiation for URI redirects.

use std::fmt;

use axum::http::{HeaderMap, header};

/// Where a redirect should point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The JSON API URL.
    Api,
    /// The web application URL.
    Web,
}

/// Media types listed in an Accept header, without parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptList {
    media_types: Vec<String>,
}

impl AcceptList {
    /// Parses a comma-separated Accept value. Parameters such as `q` are
    /// dropped and media types are lowercased.
    pub fn parse(value: &str) -> Self {
        let media_types = value
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .map(|media_type| media_type.trim().to_ascii_lowercase())
            .filter(|media_type| !media_type.is_empty())
            .collect();
        Self { media_types }
    }

    /// Reads the Accept header; a missing or non-ASCII header is empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Returns true if nothing was listed.
    pub fn is_empty(&self) -> bool {
        self.media_types.is_empty()
    }

    /// Returns true if `media_type` is listed verbatim.
    pub fn contains(&self, media_type: &mime::Mime) -> bool {
        self.media_types
            .iter()
            .any(|listed| listed == media_type.essence_str())
    }

    /// Picks the redirect target. JSON wins over HTML; an empty list means
    /// HTML. `None` when neither is acceptable.
    pub fn redirect_target(&self) -> Option<RedirectTarget> {
        if self.contains(&mime::APPLICATION_JSON) {
            Some(RedirectTarget::Api)
        } else if self.is_empty() || self.contains(&mime::TEXT_HTML) {
            Some(RedirectTarget::Web)
        } else {
            None
        }
    }
}

impl fmt::Display for AcceptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.media_types.join(", "))
    }
}

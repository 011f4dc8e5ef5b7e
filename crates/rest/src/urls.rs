//! API and web URL construction.
//!
//! API URLs point at this service, web URLs at the catalog web application.
//! Both bases come from [`ServerConfig`].

use chrono::{DateTime, SecondsFormat, Utc};
use codelist_persistence::types::{EntityKind, Page};
use url::form_urlencoded;

use crate::config::ServerConfig;
use crate::resolver::ResourcePath;

/// Version segment of every API path.
pub const API_VERSION_PATH: &str = "/api/v1";

/// Builds absolute URLs for resources and listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    api_base: String,
    web_base: String,
}

impl UrlBuilder {
    /// Creates a builder from explicit bases.
    pub fn new(api_base: impl Into<String>, web_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            web_base: web_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a builder from the server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.api_base_url(), config.web_url.clone())
    }

    /// API URL of a registry, scheme or code.
    pub fn api_url(&self, path: &ResourcePath) -> String {
        let registry = path.registry_code();
        match (path.scheme_code(), path.code_value()) {
            (Some(scheme), Some(code)) => format!(
                "{}{}/coderegistries/{}/codeschemes/{}/codes/{}/",
                self.api_base,
                API_VERSION_PATH,
                encode(registry),
                encode(scheme),
                encode(code)
            ),
            (Some(scheme), None) => format!(
                "{}{}/coderegistries/{}/codeschemes/{}/",
                self.api_base,
                API_VERSION_PATH,
                encode(registry),
                encode(scheme)
            ),
            _ => format!(
                "{}{}/coderegistries/{}/",
                self.api_base,
                API_VERSION_PATH,
                encode(registry)
            ),
        }
    }

    /// Web application URL of a registry, scheme or code.
    pub fn web_url(&self, path: &ResourcePath) -> String {
        let registry = encode(path.registry_code());
        match path.kind() {
            EntityKind::CodeRegistry => {
                format!("{}/registry;registryCode={}", self.web_base, registry)
            }
            EntityKind::CodeScheme => format!(
                "{}/codescheme;registryCode={};schemeCode={}",
                self.web_base,
                registry,
                encode(path.scheme_code().unwrap_or_default())
            ),
            EntityKind::Code => format!(
                "{}/code;registryCode={};schemeCode={};codeCode={}",
                self.web_base,
                registry,
                encode(path.scheme_code().unwrap_or_default()),
                encode(path.code_value().unwrap_or_default())
            ),
        }
    }

    /// Link to the page following `page` on a listing endpoint.
    ///
    /// `endpoint` is the path below the API version, for example
    /// `/coderegistries`. `extra` pairs are appended after the paging
    /// parameters, each key once.
    pub fn next_page_url(
        &self,
        endpoint: &str,
        page: &Page,
        after: Option<&DateTime<Utc>>,
        extra: &[(&str, &str)],
    ) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("pageSize", &page.effective_size().to_string());
        query.append_pair("from", &page.next_from().to_string());
        if let Some(after) = after {
            query.append_pair("after", &after.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(extra.len());
        for &(key, value) in extra {
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            query.append_pair(key, value);
        }
        format!(
            "{}{}{}?{}",
            self.api_base,
            API_VERSION_PATH,
            endpoint,
            query.finish()
        )
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

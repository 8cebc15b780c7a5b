use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use log::debug;
use url::Url;

use crate::config::SearchConfig;
use crate::error::{ConfigError, FetchError, FinderError};
use crate::pagination;

// Bing-style parameters: "first" is the 1-based offset, "count" the page size.
pub const QUERY_PARAM: &str = "q";
pub const OFFSET_PARAM: &str = "first";
pub const COUNT_PARAM: &str = "count";

/// Builds the search request for one page of one company's results.
pub fn build_search_url(
    config: &SearchConfig,
    company: &str,
    page: i64,
    results_per_page: i64,
) -> Result<Url, FinderError> {
    let offset = pagination::offset(page, results_per_page);
    let query = config.query_for(company);

    let mut url = Url::parse(&config.search_engine).map_err(|source| FinderError::InvalidEndpoint {
        endpoint: config.search_engine.clone(),
        source,
    })?;
    url.query_pairs_mut()
        .append_pair(QUERY_PARAM, &query)
        .append_pair(OFFSET_PARAM, &offset.saturating_add(1).to_string())
        .append_pair(COUNT_PARAM, &pagination::clamp_positive(results_per_page).to_string());

    debug!("Built search URL for '{}' (page={}): {}", company, page, url);
    Ok(url)
}

/// Source of search result pages.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Blocking HTTP client for the search endpoint.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &SearchConfig) -> Result<Self, ConfigError> {
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| ConfigError::InvalidValue {
            field: "user_agent",
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!("Fetching URL: {}", url);

        let resp = self.client.get(url.as_str()).send().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn first_page_starts_at_one() {
        let url = build_search_url(&SearchConfig::default(), "Acme Corp", 1, 5).unwrap();
        assert_eq!(url.host_str(), Some("www.bing.com"));
        assert_eq!(url.path(), "/search");
        assert_eq!(param(&url, "q").as_deref(), Some("site:linkedin.com/company Acme Corp"));
        assert_eq!(param(&url, "first").as_deref(), Some("1"));
        assert_eq!(param(&url, "count").as_deref(), Some("5"));
    }

    #[test]
    fn later_pages_advance_the_offset() {
        let url = build_search_url(&SearchConfig::default(), "Acme", 3, 10).unwrap();
        assert_eq!(param(&url, "first").as_deref(), Some("21"));
        assert_eq!(param(&url, "count").as_deref(), Some("10"));
    }

    #[test]
    fn invalid_page_arguments_are_clamped() {
        let url = build_search_url(&SearchConfig::default(), "Acme", 0, 0).unwrap();
        assert_eq!(param(&url, "first").as_deref(), Some("1"));
        assert_eq!(param(&url, "count").as_deref(), Some("1"));
    }

    #[test]
    fn query_is_encoded() {
        let url = build_search_url(&SearchConfig::default(), "Smith & Sons", 1, 5).unwrap();
        assert!(url.as_str().contains("Smith+%26+Sons"));
        assert_eq!(param(&url, "q").as_deref(), Some("site:linkedin.com/company Smith & Sons"));
    }

    #[test]
    fn construction_is_deterministic() {
        let config = SearchConfig::default();
        let a = build_search_url(&config, "Acme", 2, 5).unwrap();
        let b = build_search_url(&config, "Acme", 2, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn keeps_existing_endpoint_parameters() {
        let config = SearchConfig {
            search_engine: "https://search.example.org/find?setlang=en".to_string(),
            ..SearchConfig::default()
        };
        let url = build_search_url(&config, "Acme", 1, 5).unwrap();
        assert_eq!(param(&url, "setlang").as_deref(), Some("en"));
        assert_eq!(param(&url, "q").as_deref(), Some("site:linkedin.com/company Acme"));
    }

    #[test]
    fn invalid_endpoint_is_reported() {
        let config = SearchConfig {
            search_engine: "::not-a-url::".to_string(),
            ..SearchConfig::default()
        };
        let err = build_search_url(&config, "Acme", 1, 5).unwrap_err();
        assert!(matches!(err, FinderError::InvalidEndpoint { .. }));
    }

    #[test]
    fn rejects_user_agent_with_control_characters() {
        let config = SearchConfig {
            user_agent: "bad\nagent".to_string(),
            ..SearchConfig::default()
        };
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(ConfigError::InvalidValue { field: "user_agent", .. })
        ));
    }
}

//! Settings file loading and the immutable search configuration.
//!
//! Every key in the settings file is optional. Missing keys fall back to the
//! defaults below; present keys with the wrong type or an out-of-range value
//! are rejected before any request is made.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_SEARCH_ENGINE: &str = "https://www.bing.com/search";
pub const DEFAULT_QUERY_TEMPLATE: &str = "site:linkedin.com/company {company}";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DELAY_SECS: f64 = 1.0;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkedInCompanyURLMassFinder/1.0)";

pub const DEFAULT_RESULTS_PER_COMPANY: i64 = 5;
pub const DEFAULT_START_PAGE: i64 = 1;
pub const DEFAULT_MAX_PAGES: i64 = 1;

/// Placeholder replaced by the company name in the query template.
pub const COMPANY_PLACEHOLDER: &str = "{company}";

/// Raw contents of the JSON settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub search_engine: Option<String>,
    pub query_template: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub request_delay_seconds: Option<f64>,
    pub user_agent: Option<String>,
    pub results_per_company: Option<i64>,
    pub start_page: Option<i64>,
    pub max_pages: Option<i64>,
}

impl Settings {
    /// Reads the settings file, or returns empty settings if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            warn!("Settings file not found at {:?}, using defaults.", path);
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

/// Configuration for one run of the finder.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub search_engine: String,
    pub query_template: String,
    pub request_timeout: Duration,
    pub request_delay: Duration,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
            query_template: DEFAULT_QUERY_TEMPLATE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::from_secs_f64(DEFAULT_DELAY_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SearchConfig {
    /// Overlays the settings on top of the defaults and validates the result.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let defaults = SearchConfig::default();

        let search_engine = settings
            .search_engine
            .clone()
            .unwrap_or(defaults.search_engine);
        validate_endpoint(&search_engine)?;

        let query_template = settings
            .query_template
            .clone()
            .unwrap_or(defaults.query_template);
        if !query_template.contains(COMPANY_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "query_template",
                reason: format!("'{}' has no {} placeholder", query_template, COMPANY_PLACEHOLDER),
            });
        }

        let request_timeout = match settings.request_timeout_seconds {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    field: "request_timeout_seconds",
                    reason: "must be a positive integer".to_string(),
                })
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };

        let request_delay = match settings.request_delay_seconds {
            Some(secs) => {
                Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
                    field: "request_delay_seconds",
                    reason: format!("{} is not a non-negative number of seconds ({})", secs, e),
                })?
            }
            None => defaults.request_delay,
        };

        let user_agent = settings.user_agent.clone().unwrap_or(defaults.user_agent);

        Ok(SearchConfig {
            search_engine,
            query_template,
            request_timeout,
            request_delay,
            user_agent,
        })
    }

    /// The full-text query for one company.
    pub fn query_for(&self, company: &str) -> String {
        self.query_template.replace(COMPANY_PLACEHOLDER, company)
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
        field: "search_engine",
        reason: format!("'{}' is not a valid URL ({})", endpoint, e),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            field: "search_engine",
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Paging parameters for a run. Out-of-range values are clamped later by the
/// pagination helpers, so nothing is validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub results_per_company: i64,
    pub start_page: i64,
    pub max_pages: i64,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            results_per_company: DEFAULT_RESULTS_PER_COMPANY,
            start_page: DEFAULT_START_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl RunParams {
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = RunParams::default();
        RunParams {
            results_per_company: settings
                .results_per_company
                .unwrap_or(defaults.results_per_company),
            start_page: settings.start_page.unwrap_or(defaults.start_page),
            max_pages: settings.max_pages.unwrap_or(defaults.max_pages),
        }
    }
}

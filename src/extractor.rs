use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// Host fragment a link must carry to count as a profile link.
pub const TARGET_DOMAIN: &str = "linkedin.com";
/// Path segment marking an organization profile.
pub const COMPANY_PATH_MARKER: &str = "/company/";

// Redirect wrappers carry the real target in one of these, checked in order.
const REDIRECT_PARAMS: [&str; 2] = ["q", "url"];
// Base used to resolve relative wrappers such as "/url?q=...".
const REDIRECT_BASE: &str = "http://redirect.invalid/";

/// One discovered company profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub title: String,
    pub link: String,
    #[serde(rename = "searchQuery")]
    pub search_query: String,
}

pub struct Extractor {
    anchor_selector: Selector,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // Every link on the page: result markup changes too often to rely on classes.
            anchor_selector: Selector::parse("a[href]").expect("anchor selector is valid CSS"),
        }
    }

    /// Lazily yields a record for every accepted company link in `document`,
    /// in document order. Duplicates are left for the caller to handle.
    pub fn records<'a>(
        &'a self,
        document: &'a Html,
        search_query: &'a str,
    ) -> impl Iterator<Item = ResultRecord> + 'a {
        document
            .select(&self.anchor_selector)
            .filter_map(move |anchor| {
                let href = anchor.value().attr("href")?;
                let link = normalize_link(href)?;
                Some(ResultRecord {
                    title: anchor_title(&anchor).unwrap_or_else(|| search_query.to_string()),
                    link,
                    search_query: search_query.to_string(),
                })
            })
    }

    /// Parses a result page and collects its records.
    pub fn extract(&self, html: &str, search_query: &str) -> Vec<ResultRecord> {
        let document = Html::parse_document(html);
        let records: Vec<ResultRecord> = self.records(&document, search_query).collect();
        debug!(
            "Extracted {} raw company link(s) for search query '{}'",
            records.len(),
            search_query
        );
        records
    }
}

/// Visible anchor text with whitespace collapsed, or `None` when blank.
fn anchor_title(anchor: &ElementRef) -> Option<String> {
    let text: String = anchor.text().collect();
    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn mentions_target(url: &Url) -> bool {
    url.host_str().map_or(false, |host| host.contains(TARGET_DOMAIN))
}

fn redirect_target(raw: &str) -> Option<String> {
    let wrapper = Url::parse(REDIRECT_BASE).ok()?.join(raw).ok()?;
    REDIRECT_PARAMS.iter().find_map(|key| {
        wrapper
            .query_pairs()
            .find(|(name, value)| name == *key && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

/// Turns a raw result link into a canonical company profile URL.
///
/// Search-engine redirect wrappers (`/url?q=...`, `?url=...`) are unwrapped.
/// Returns `None` for anything that is not a company profile on the target
/// network. Accepted links have no query, no fragment and no trailing `/`.
/// Trailing slashes are all removed, so `acme/` and `acme//` match `acme`.
pub fn normalize_link(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut parsed = Url::parse(raw).ok();
    let on_target = parsed.as_ref().map_or(false, mentions_target);
    if !on_target && !raw.starts_with("http") {
        if let Some(target) = redirect_target(raw) {
            parsed = Url::parse(&target).ok();
        }
    }

    let mut url = parsed.filter(mentions_target)?;
    let path = url.path().trim_end_matches('/').to_string();
    if !path.contains(COMPANY_PATH_MARKER) {
        return None;
    }

    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url.set_username("").ok();
    url.set_password(None).ok();

    Some(String::from(url))
}

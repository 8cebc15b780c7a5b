//! Helpers shared by the integration tests

use company_finder_lib::{SearchConfig, Settings};
use mockito::Matcher;

/// Builds a Bing-like result page whose `<li>` items link to `hrefs`.
#[allow(dead_code)]
pub fn create_result_page(hrefs: &[(&str, &str)]) -> String {
    let items: String = hrefs
        .iter()
        .map(|(href, title)| {
            format!(
                r#"<li class="b_algo"><h2><a href="{}">{}</a></h2><p>snippet</p></li>"#,
                html_attr(href),
                title
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>search results</title></head>
<body>
  <header><a href="/">Home</a><a href="/images?q=x">Images</a></header>
  <ol id="b_results">{}</ol>
  <footer><a href="https://www.example.com/privacy">Privacy</a></footer>
</body>
</html>"#,
        items
    )
}

fn html_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Config pointing at the mock server with no delay between pages.
#[allow(dead_code)]
pub fn config_for(server_url: &str) -> SearchConfig {
    let settings = Settings {
        search_engine: Some(format!("{}/search", server_url)),
        request_timeout_seconds: Some(5),
        request_delay_seconds: Some(0.0),
        user_agent: Some("finder-integration-test".to_string()),
        ..Settings::default()
    };
    SearchConfig::from_settings(&settings).expect("test settings are valid")
}

/// Matches the query string of one page of one company's search.
#[allow(dead_code)]
pub fn page_query(company: &str, first: u32, count: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("q".into(), format!("site:linkedin.com/company {}", company)),
        Matcher::UrlEncoded("first".into(), first.to_string()),
        Matcher::UrlEncoded("count".into(), count.to_string()),
    ])
}

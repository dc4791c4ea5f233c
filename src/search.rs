use std::collections::HashSet;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{domain_of, DomainFilter};
use crate::error::{Error, Result};
use crate::records::SearchHit;
use crate::settings::SearchSettings;

static RESULT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.result").unwrap());
static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result__a").unwrap());
static SNIPPET_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").unwrap());
static NAV_FORM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.nav-link form").unwrap());
static INPUT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input").unwrap());

/// One result as returned by a provider, before attribution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResult {
    pub url: String,
    pub title: String,
    pub body: String,
}

pub trait SearchProvider {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>>;
}

/// DuckDuckGo's no-JavaScript HTML endpoint.
pub struct DuckDuckGo {
    client: Client,
    settings: SearchSettings,
}

impl DuckDuckGo {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(DuckDuckGo {
            client,
            settings: settings.clone(),
        })
    }

    fn fetch(&self, query: &str, form: &[(String, String)]) -> Result<String> {
        let response = self.client.post(&self.settings.endpoint).form(form).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                query: query.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

impl SearchProvider for DuckDuckGo {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>> {
        let mut form = vec![
            ("q".to_string(), query.to_string()),
            ("kl".to_string(), self.settings.region.clone()),
            ("kp".to_string(), self.settings.safesearch.as_kp().to_string()),
        ];
        let mut results = Vec::new();

        for page_no in 0..self.settings.max_pages {
            if page_no > 0 {
                thread::sleep(Duration::from_millis(self.settings.request_delay_ms));
            }
            let html = self.fetch(query, &form)?;
            let page = parse_results_page(&html);
            debug!(query, page_no, found = page.results.len(), "result page");

            if page.results.is_empty() {
                break;
            }
            results.extend(page.results);
            if results.len() >= max_results {
                results.truncate(max_results);
                break;
            }
            match page.next_form {
                Some(next) => form = next,
                None => break,
            }
        }

        Ok(results)
    }
}

/// Parsed result list plus the hidden fields of the "Next" form, if any.
#[derive(Debug, Default)]
pub struct ResultsPage {
    pub results: Vec<RawResult>,
    pub next_form: Option<Vec<(String, String)>>,
}

pub fn parse_results_page(html: &str) -> ResultsPage {
    let doc = Html::parse_document(html);
    let mut results = Vec::new();

    for block in doc.select(&RESULT_SEL) {
        let classes = block.value().attr("class").unwrap_or("");
        if classes.contains("result--ad") {
            continue;
        }
        let Some(link) = block.select(&TITLE_SEL).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let url = resolve_href(href);
        if url.is_empty() {
            continue;
        }
        let body = block
            .select(&SNIPPET_SEL)
            .next()
            .map(|s| element_text(&s))
            .unwrap_or_default();
        results.push(RawResult {
            url,
            title: element_text(&link),
            body,
        });
    }

    let next_form = doc.select(&NAV_FORM_SEL).find_map(|form| {
        let mut fields = Vec::new();
        let mut is_next = false;
        for input in form.select(&INPUT_SEL) {
            let el = input.value();
            match el.attr("type") {
                Some("submit") => is_next |= el.attr("value").is_some_and(|v| v.starts_with("Next")),
                _ => {
                    if let Some(name) = el.attr("name") {
                        fields.push((name.to_string(), el.attr("value").unwrap_or("").to_string()));
                    }
                }
            }
        }
        is_next.then_some(fields)
    });

    ResultsPage { results, next_form }
}

/// Unwraps DuckDuckGo's `/l/?uddg=` redirect links to the destination URL.
fn resolve_href(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let Ok(parsed) = Url::parse(&absolute) else {
        return String::new();
    };
    let is_redirect = parsed
        .host_str()
        .is_some_and(|h| h.ends_with("duckduckgo.com"))
        && parsed.path().starts_with("/l/");
    if is_redirect {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
    }
    absolute
}

fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collection stats returned alongside the hits.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub queries: usize,
    pub failed_queries: usize,
    pub duplicates: usize,
    pub blocked: usize,
}

/// Run every query and keep the first occurrence of each URL across the run.
///
/// A query whose search fails is logged and skipped.
pub fn collect(
    provider: &dyn SearchProvider,
    queries: &[String],
    max_results: usize,
    filter: &DomainFilter,
) -> (Vec<SearchHit>, CollectStats) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut hits = Vec::new();
    let mut stats = CollectStats {
        queries: queries.len(),
        ..CollectStats::default()
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    for (i, query) in queries.iter().enumerate() {
        pb.set_message(format!("({}/{}) {}", i + 1, queries.len(), query));
        let results = match provider.search(query, max_results) {
            Ok(r) => r,
            Err(e) => {
                warn!("Search failed for {:?}: {}", query, e);
                stats.failed_queries += 1;
                continue;
            }
        };

        let before = hits.len();
        for r in results {
            if r.url.is_empty() {
                continue;
            }
            if !seen.insert(r.url.clone()) {
                stats.duplicates += 1;
                continue;
            }
            let domain = domain_of(&r.url);
            if !filter.allows(&r.url, &domain) {
                stats.blocked += 1;
                continue;
            }
            hits.push(SearchHit {
                query: query.clone(),
                title: r.title,
                snippet: r.body,
                url: r.url,
                domain,
            });
        }
        info!(query = %query, new_hits = hits.len() - before, "query done");
    }

    pb.finish_and_clear();
    info!(
        hits = hits.len(),
        duplicates = stats.duplicates,
        blocked = stats.blocked,
        failed = stats.failed_queries,
        "collection finished"
    );
    (hits, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Canned results per query; `None` makes the query fail.
    struct FakeProvider {
        pages: HashMap<String, Option<Vec<RawResult>>>,
    }

    impl FakeProvider {
        fn new() -> Self {
            FakeProvider {
                pages: HashMap::new(),
            }
        }

        fn with(mut self, query: &str, urls: &[&str]) -> Self {
            let results = urls
                .iter()
                .map(|u| RawResult {
                    url: u.to_string(),
                    title: format!("title {}", u),
                    body: format!("body {}", u),
                })
                .collect();
            self.pages.insert(query.to_string(), Some(results));
            self
        }

        fn failing(mut self, query: &str) -> Self {
            self.pages.insert(query.to_string(), None);
            self
        }
    }

    impl SearchProvider for FakeProvider {
        fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>> {
            match self.pages.get(query) {
                Some(Some(r)) => Ok(r.iter().take(max_results).cloned().collect()),
                Some(None) => Err(Error::Status {
                    query: query.to_string(),
                    status: 503,
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn queries(qs: &[&str]) -> Vec<String> {
        qs.iter().map(|q| q.to_string()).collect()
    }

    #[test]
    fn dedups_urls_across_queries() {
        let p = FakeProvider::new()
            .with("a", &["https://x.com/1", "https://x.com/2", "https://x.com/1"])
            .with("b", &["https://x.com/2", "https://y.co.th/3"]);
        let (hits, stats) = collect(&p, &queries(&["a", "b"]), 10, &DomainFilter::allow_all());

        let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x.com/1", "https://x.com/2", "https://y.co.th/3"]);
        assert_eq!(hits[2].query, "b");
        assert_eq!(hits[2].domain, "y.co.th");
        assert_eq!(hits[0].snippet, "body https://x.com/1");
        assert_eq!(stats.duplicates, 2);
    }

    #[test]
    fn skips_empty_urls() {
        let p = FakeProvider::new().with("a", &["", "https://x.com/1"]);
        let (hits, stats) = collect(&p, &queries(&["a"]), 10, &DomainFilter::allow_all());
        assert_eq!(hits.len(), 1);
        assert_eq!(stats.duplicates, 0);
    }

    #[test]
    fn respects_cap() {
        let p = FakeProvider::new().with("a", &["https://x.com/1", "https://x.com/2", "https://x.com/3"]);
        let (hits, _) = collect(&p, &queries(&["a"]), 2, &DomainFilter::allow_all());
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn blocked_domains_dropped() {
        let p = FakeProvider::new().with(
            "a",
            &["https://m.facebook.com/groups/1", "https://www.jobthai.com/2"],
        );
        let filter = DomainFilter::new(["facebook.com"]);
        let (hits, stats) = collect(&p, &queries(&["a"]), 10, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].domain, "jobthai.com");
        assert_eq!(stats.blocked, 1);
    }

    #[test]
    fn failed_query_is_skipped() {
        let p = FakeProvider::new()
            .failing("bad")
            .with("good", &["https://x.com/1"]);
        let (hits, stats) = collect(&p, &queries(&["bad", "good"]), 10, &DomainFilter::allow_all());
        assert_eq!(hits.len(), 1);
        assert_eq!(stats.failed_queries, 1);
        assert_eq!(stats.queries, 2);
    }

    #[test]
    fn parses_fixture_page() {
        let html = std::fs::read_to_string("tests/fixtures/ddg_results.html").unwrap();
        let page = parse_results_page(&html);

        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].url, "https://www.jobthai.com/th/job/1234567");
        assert_eq!(page.results[0].title, "รับสมัครพนักงานขาย รังสิต");
        assert_eq!(page.results[0].body, "ค่าแรงวันละ 450 บาท สมัครด่วน");
        assert_eq!(page.results[1].url, "https://www.facebook.com/groups/ptnjobs/posts/998877");
        assert_eq!(page.results[2].body, "");
        assert!(page.results.iter().all(|r| !r.url.contains("ad_provider")));

        let next = page.next_form.unwrap();
        assert!(next.contains(&("s".to_string(), "10".to_string())));
        assert!(next.contains(&("q".to_string(), "หางาน รังสิต".to_string())));
    }

    #[test]
    fn last_page_has_no_next_form() {
        let html = r#"<html><body>
            <div class="result results_links"><h2 class="result__title">
            <a class="result__a" href="https://example.com/x">X</a></h2></div>
            <div class="nav-link"><form action="/html/" method="post">
            <input type="submit" class="btn" value="Previous"/>
            <input type="hidden" name="s" value="0"/></form></div>
            </body></html>"#;
        let page = parse_results_page(html);
        assert_eq!(page.results.len(), 1);
        assert!(page.next_form.is_none());
    }

    #[test]
    fn redirect_links_are_unwrapped() {
        assert_eq!(
            resolve_href("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1&rut=abc"),
            "https://example.com/a?b=1"
        );
        assert_eq!(resolve_href("https://example.com/direct"), "https://example.com/direct");
        assert_eq!(resolve_href("javascript"), "");
    }
}

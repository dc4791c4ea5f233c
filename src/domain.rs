use std::collections::HashSet;

use url::{Host, Url};

/// Registrable domain of `url` (e.g. `m.facebook.com` → `facebook.com`).
///
/// Falls back to the bare host when the public suffix list has no
/// registrable part (IPs, `localhost`), and to an empty string when the URL
/// has no host at all.
pub fn domain_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let host = match parsed.host() {
        Some(Host::Domain(d)) => d.trim_end_matches('.').to_lowercase(),
        Some(ip) => return ip.to_string(),
        None => return String::new(),
    };
    psl::domain_str(&host)
        .map(str::to_string)
        .unwrap_or(host)
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Domains whose results are dropped at collection time when enabled.
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    blocked: HashSet<String>,
}

impl DomainFilter {
    pub fn new<I, S>(blocked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        DomainFilter {
            blocked: blocked
                .into_iter()
                .map(|d| d.as_ref().trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Lets everything through.
    pub fn allow_all() -> Self {
        DomainFilter::default()
    }

    /// Checks both the full host and the registrable domain.
    pub fn allows(&self, url: &str, domain: &str) -> bool {
        if self.blocked.is_empty() {
            return true;
        }
        if self.blocked.contains(&domain.to_lowercase()) {
            return false;
        }
        match host_of(url) {
            Some(host) => !self.blocked.contains(&host),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrable_domain() {
        assert_eq!(domain_of("https://www.example.com/a?b=1"), "example.com");
        assert_eq!(domain_of("https://m.facebook.com/groups/123"), "facebook.com");
        assert_eq!(domain_of("https://jobs.example.co.th/post/9"), "example.co.th");
    }

    #[test]
    fn fallbacks() {
        assert_eq!(domain_of("http://localhost:8080/x"), "localhost");
        assert_eq!(domain_of("http://127.0.0.1/x"), "127.0.0.1");
        assert_eq!(domain_of("not a url"), "");
    }

    #[test]
    fn filter_checks_host_and_domain() {
        let f = DomainFilter::new(["facebook.com", "fb.me"]);
        assert!(!f.allows("https://web.facebook.com/p/1", "facebook.com"));
        assert!(!f.allows("https://fb.me/abc", "fb.me"));
        assert!(f.allows("https://www.jobthai.com/job/1", "jobthai.com"));
    }

    #[test]
    fn filter_matches_exact_host() {
        let f = DomainFilter::new(["m.example.com"]);
        assert!(!f.allows("https://m.example.com/a", "example.com"));
        assert!(f.allows("https://www.example.com/a", "example.com"));
    }

    #[test]
    fn empty_filter_allows_everything() {
        let f = DomainFilter::allow_all();
        assert!(f.allows("https://facebook.com/x", "facebook.com"));
    }
}

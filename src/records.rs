use std::fmt;

use serde::{Deserialize, Serialize};

/// One unique search result, attributed with the query that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub query: String,
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub domain: String,
}

impl SearchHit {
    /// Title and snippet joined the way every extractor sees them.
    pub fn combined_text(&self) -> String {
        combined_text(&self.title, &self.snippet)
    }
}

pub fn combined_text(title: &str, snippet: &str) -> String {
    format!("{} — {}", title, snippet)
        .trim_matches(|c: char| c == ' ' || c == '—')
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WageUnit {
    Hour,
    Day,
    Month,
    Unknown,
}

impl WageUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WageUnit::Hour => "hour",
            WageUnit::Day => "day",
            WageUnit::Month => "month",
            WageUnit::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort wage reading. `unit` is `None` exactly when no amount was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WageEstimate {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub unit: Option<WageUnit>,
}

impl WageEstimate {
    pub fn absent() -> Self {
        WageEstimate::default()
    }

    pub fn single(amount: u32, unit: WageUnit) -> Self {
        WageEstimate {
            min: Some(amount),
            max: Some(amount),
            unit: Some(unit),
        }
    }

    /// Bounds are stored low to high whatever order the text used.
    pub fn range(a: u32, b: u32, unit: WageUnit) -> Self {
        WageEstimate {
            min: Some(a.min(b)),
            max: Some(a.max(b)),
            unit: Some(unit),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.unit.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleMatch {
    pub term: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    pub hit: SearchHit,
    pub text: String,
    pub is_job_like: bool,
    pub wage: WageEstimate,
    /// Distinct gazetteer names, in gazetteer order.
    pub locations: Vec<String>,
    pub role: RoleMatch,
}

impl AnnotatedRecord {
    pub fn locations_joined(&self) -> String {
        self.locations.join(", ")
    }

    pub fn to_export(&self) -> ExportRecord {
        ExportRecord {
            role_id: String::new(),
            example_text: self.text.clone(),
            source_hint: self.hit.url.clone(),
            location_hint: self.locations_joined(),
        }
    }
}

/// Row of the role-examples table; `role_id` is filled in by hand later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub role_id: String,
    pub example_text: String,
    pub source_hint: String,
    pub location_hint: String,
}

/// Flat view of an [`AnnotatedRecord`] for the cleaned table.
#[derive(Debug, Serialize)]
pub struct CleanedRow<'a> {
    pub query: &'a str,
    pub title: &'a str,
    pub snippet: &'a str,
    pub url: &'a str,
    pub domain: &'a str,
    pub text: &'a str,
    pub is_job_like: bool,
    pub wage_min: Option<u32>,
    pub wage_max: Option<u32>,
    pub wage_unit: &'static str,
    pub locations: String,
    pub job_term: Option<&'a str>,
    pub job_category: Option<&'a str>,
}

impl<'a> From<&'a AnnotatedRecord> for CleanedRow<'a> {
    fn from(r: &'a AnnotatedRecord) -> Self {
        CleanedRow {
            query: &r.hit.query,
            title: &r.hit.title,
            snippet: &r.hit.snippet,
            url: &r.hit.url,
            domain: &r.hit.domain,
            text: &r.text,
            is_job_like: r.is_job_like,
            wage_min: r.wage.min,
            wage_max: r.wage.max,
            wage_unit: r.wage.unit.map(|u| u.as_str()).unwrap_or(""),
            locations: r.locations_joined(),
            job_term: r.role.term.as_deref(),
            job_category: r.role.category.as_deref(),
        }
    }
}

pub const RAW_HEADERS: &[&str] = &["query", "title", "snippet", "url", "domain"];

pub const CLEANED_HEADERS: &[&str] = &[
    "query",
    "title",
    "snippet",
    "url",
    "domain",
    "text",
    "is_job_like",
    "wage_min",
    "wage_max",
    "wage_unit",
    "locations",
    "job_term",
    "job_category",
];

pub const EXPORT_HEADERS: &[&str] = &["role_id", "example_text", "source_hint", "location_hint"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_text_joins_with_separator() {
        assert_eq!(combined_text("a", "b"), "a — b");
    }

    #[test]
    fn combined_text_trims_separator_artifacts() {
        assert_eq!(combined_text("", "ค่าแรงวันละ 450 บาท"), "ค่าแรงวันละ 450 บาท");
        assert_eq!(combined_text("หางาน", ""), "หางาน");
        assert_eq!(combined_text("", ""), "");
        assert_eq!(combined_text(" — title", "snip — "), "title — snip");
    }

    #[test]
    fn range_orders_bounds() {
        let w = WageEstimate::range(18_000, 15_000, WageUnit::Month);
        assert_eq!(w.min, Some(15_000));
        assert_eq!(w.max, Some(18_000));
    }

    #[test]
    fn absent_has_no_unit() {
        let w = WageEstimate::absent();
        assert!(w.is_absent());
        assert_eq!(w.min, None);
        assert_eq!(w.max, None);
    }

    #[test]
    fn export_projection() {
        let rec = AnnotatedRecord {
            hit: SearchHit {
                query: "q".into(),
                title: "t".into(),
                snippet: "s".into(),
                url: "https://example.com/a".into(),
                domain: "example.com".into(),
            },
            text: "t — s".into(),
            is_job_like: true,
            wage: WageEstimate::absent(),
            locations: vec!["รังสิต".into(), "คลองหลวง".into()],
            role: RoleMatch::default(),
        };
        let e = rec.to_export();
        assert_eq!(e.role_id, "");
        assert_eq!(e.example_text, "t — s");
        assert_eq!(e.source_hint, "https://example.com/a");
        assert_eq!(e.location_hint, "รังสิต, คลองหลวง");

        let row = CleanedRow::from(&rec);
        assert_eq!(row.wage_unit, "");
        assert_eq!(row.locations, "รังสิต, คลองหลวง");
    }
}

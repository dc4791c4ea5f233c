use tracing::info;

use crate::error::Result;
use crate::extract;
use crate::output::{self, OutputPaths};
use crate::patterns::PatternLibrary;
use crate::records::{AnnotatedRecord, ExportRecord, SearchHit};

/// Row counts of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCounts {
    pub raw: usize,
    pub retained: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to process; no files were written.
    NoHits,
    Done(RunCounts),
}

/// Job-like hits with their extracted fields, in input order.
pub fn annotate_all(hits: &[SearchHit], lib: &PatternLibrary) -> Vec<AnnotatedRecord> {
    hits.iter().filter_map(|h| extract::annotate(h, lib)).collect()
}

pub fn export_records(records: &[AnnotatedRecord]) -> Vec<ExportRecord> {
    records.iter().map(AnnotatedRecord::to_export).collect()
}

/// Raw hits → (raw table) → cleaned table → role examples.
///
/// With `write_raw` unset the raw table is assumed to exist already (the
/// `annotate` command reads it back in).
pub fn process(
    hits: &[SearchHit],
    lib: &PatternLibrary,
    paths: &OutputPaths,
    write_raw: bool,
) -> Result<Outcome> {
    if hits.is_empty() {
        info!("no raw hits, stopping before filtering");
        return Ok(Outcome::NoHits);
    }

    if write_raw {
        output::write_raw(&paths.raw, hits)?;
        println!("Saved raw -> {} ({} rows)", paths.raw.display(), hits.len());
    }

    println!("[2/3] Filtering & extracting fields …");
    let records = annotate_all(hits, lib);
    output::write_cleaned(&paths.cleaned, &records)?;
    println!(
        "Saved cleaned -> {} ({} rows)",
        paths.cleaned.display(),
        records.len()
    );

    println!("[3/3] Writing role examples …");
    let examples = export_records(&records);
    output::write_examples(&paths.examples, &examples)?;
    println!(
        "Saved role_examples -> {} ({} rows)",
        paths.examples.display(),
        examples.len()
    );

    let counts = RunCounts {
        raw: hits.len(),
        retained: records.len(),
    };
    let with_wage = records.iter().filter(|r| !r.wage.is_absent()).count();
    info!(
        raw = counts.raw,
        retained = counts.retained,
        with_wage,
        "pipeline finished"
    );
    Ok(Outcome::Done(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::WageThresholds;

    fn lib() -> PatternLibrary {
        PatternLibrary::new(WageThresholds::default()).unwrap()
    }

    fn hit(title: &str, snippet: &str, url: &str) -> SearchHit {
        SearchHit {
            query: "q".into(),
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
            domain: "example.com".into(),
        }
    }

    fn sample() -> Vec<SearchHit> {
        vec![
            hit("รับสมัครพนักงานขาย รังสิต", "ค่าแรงวันละ 450 บาท", "https://example.com/a"),
            hit("สินค้าลดราคา", "โปรโมชั่น ส่งฟรี", "https://example.com/b"),
            hit("ด่วน แม่บ้าน คลองหลวง", "เดือนละ 12000", "https://example.com/c"),
        ]
    }

    #[test]
    fn keeps_order_and_drops_irrelevant() {
        let recs = annotate_all(&sample(), &lib());
        let urls: Vec<&str> = recs.iter().map(|r| r.hit.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/c"]);
    }

    #[test]
    fn export_is_one_to_one() {
        let recs = annotate_all(&sample(), &lib());
        let ex = export_records(&recs);
        assert_eq!(ex.len(), recs.len());
        assert_eq!(ex[1].source_hint, "https://example.com/c");
        assert_eq!(ex[1].location_hint, "คลองหลวง");
        assert!(ex.iter().all(|e| e.role_id.is_empty()));
    }

    #[test]
    fn writes_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::new(dir.path(), "t");
        let outcome = process(&sample(), &lib(), &paths, true).unwrap();

        assert_eq!(outcome, Outcome::Done(RunCounts { raw: 3, retained: 2 }));
        assert!(paths.raw.exists());
        assert!(paths.cleaned.exists());
        assert!(paths.examples.exists());

        let cleaned = std::fs::read_to_string(&paths.cleaned).unwrap();
        assert!(!cleaned.contains("สินค้าลดราคา"));
    }

    #[test]
    fn skips_raw_table_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::new(dir.path(), "t");
        process(&sample(), &lib(), &paths, false).unwrap();
        assert!(!paths.raw.exists());
        assert!(paths.cleaned.exists());
    }

    #[test]
    fn zero_hits_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::new(dir.path(), "t");
        let outcome = process(&[], &lib(), &paths, true).unwrap();

        assert_eq!(outcome, Outcome::NoHits);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

pub mod location;
pub mod role;
pub mod wage;

use crate::patterns::PatternLibrary;
use crate::records::{AnnotatedRecord, SearchHit};

/// Relevance filter + field extraction for one hit.
///
/// Returns `None` when the combined title/snippet does not look like a job
/// posting. Pure: the outcome depends only on `hit` and `lib`.
pub fn annotate(hit: &SearchHit, lib: &PatternLibrary) -> Option<AnnotatedRecord> {
    let text = hit.combined_text();
    if !lib.is_job_like(&text) {
        return None;
    }

    let wage = wage::extract(&text, lib);
    let locations = location::extract(&text, lib);
    let role = role::classify(&text, lib);

    Some(AnnotatedRecord {
        hit: hit.clone(),
        text,
        is_job_like: true,
        wage,
        locations,
        role,
    })
}

// ── Tests ──

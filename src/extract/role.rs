use crate::patterns::PatternLibrary;
use crate::records::RoleMatch;

struct Candidate<'t> {
    text: &'t str,
    start: usize,
    chars: usize,
}

/// Longest role term mentioned in `text` and its category.
///
/// Equal-length matches resolve to the one that starts first in the text,
/// then to the one listed first in the role table.
pub fn classify(text: &str, lib: &PatternLibrary) -> RoleMatch {
    if text.is_empty() {
        return RoleMatch::default();
    }

    let mut best: Option<Candidate> = None;
    for role in &lib.roles {
        let Some(m) = role.matcher.find(text) else {
            continue;
        };
        let candidate = Candidate {
            text: m.as_str(),
            start: m.start(),
            chars: m.as_str().chars().count(),
        };
        let better = match &best {
            None => true,
            Some(b) => {
                candidate.chars > b.chars || (candidate.chars == b.chars && candidate.start < b.start)
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    match best {
        Some(c) => RoleMatch {
            term: Some(c.text.to_string()),
            category: lib.category_for(c.text).map(str::to_string),
        },
        None => RoleMatch::default(),
    }
}

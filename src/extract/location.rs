use crate::patterns::PatternLibrary;

/// Every gazetteer place name that occurs in `text`, in gazetteer order.
///
/// Plain substring search per entry, so a compound name such as
/// "ตลาดรังสิต" is reported alongside the shorter "รังสิต" it contains.
pub fn extract(text: &str, lib: &PatternLibrary) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    lib.locations
        .iter()
        .filter(|name| text.contains(*name))
        .map(|name| name.to_string())
        .collect()
}

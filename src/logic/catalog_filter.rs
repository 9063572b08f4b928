use crate::model::{Grant, GrantFilter, Patent, PatentFilter};

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Whether a patent passes both the free-text and the status condition.
///
/// `needle` must already be lowercased.
fn patent_matches(patent: &Patent, needle: &str, filter: &PatentFilter) -> bool {
    let matches_search = needle.is_empty()
        || contains_folded(&patent.title, needle)
        || patent
            .inventors
            .iter()
            .any(|inventor| contains_folded(inventor, needle))
        || contains_folded(&patent.department, needle)
        || contains_folded(&patent.technology_area, needle);

    matches_search && filter.status.admits(patent.status)
}

/// Filtered view over the catalog, in catalog order.
pub fn filter_patents(patents: &[Patent], filter: &PatentFilter) -> Vec<Patent> {
    let needle = filter.q.trim().to_lowercase();
    patents
        .iter()
        .filter(|patent| patent_matches(patent, &needle, filter))
        .cloned()
        .collect()
}

pub fn filter_grants(grants: &[Grant], filter: &GrantFilter) -> Vec<Grant> {
    let needle = filter.q.trim().to_lowercase();
    grants
        .iter()
        .filter(|grant| {
            needle.is_empty()
                || contains_folded(&grant.title, &needle)
                || contains_folded(&grant.agency, &needle)
        })
        .cloned()
        .collect()
}

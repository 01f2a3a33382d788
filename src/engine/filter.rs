use std::collections::HashSet;

use crate::types::HomeSection;

/// Restricts home sections by title.
///
/// A whitelist wins over a blacklist when both are configured. `None` means
/// "not configured" and is not the same as an empty set: an empty whitelist
/// keeps nothing.
pub fn filter_sections(
    sections: Vec<HomeSection>,
    whitelist: Option<&HashSet<String>>,
    blacklist: Option<&HashSet<String>>,
) -> Vec<HomeSection> {
    match (whitelist, blacklist) {
        (Some(allowed), _) => sections
            .into_iter()
            .filter(|s| allowed.contains(&s.title))
            .collect(),
        (None, Some(denied)) => sections
            .into_iter()
            .filter(|s| !denied.contains(&s.title))
            .collect(),
        (None, None) => sections,
    }
}

/// A user's section filters. `None` on either side means that list is not
/// configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSets {
    pub whitelist: Option<HashSet<String>>,
    pub blacklist: Option<HashSet<String>>,
}

impl FilterSets {
    pub fn apply(&self, sections: Vec<HomeSection>) -> Vec<HomeSection> {
        filter_sections(sections, self.whitelist.as_ref(), self.blacklist.as_ref())
    }

    pub fn describe(&self) -> String {
        match (&self.whitelist, &self.blacklist) {
            (Some(w), _) => format!("whitelist ({})", w.len()),
            (None, Some(b)) => format!("blacklist ({})", b.len()),
            (None, None) => "none".to_string(),
        }
    }
}

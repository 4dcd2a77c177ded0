//! Autocomplete suggestions over the location forest.
//!
//! A node matches when its own label contains the query case-insensitively;
//! the suggestion is then the full path down to that node. Matching never
//! inspects the concatenated path, only individual labels, so typing
//! "campus" does not surface every descendant of "Campus A".

use std::collections::BTreeSet;

use crate::models::location::LocationNode;
use crate::services::location::path;

/// Suggest path strings for a partial query, deduplicated and sorted.
///
/// Pure and idempotent: safe to call on every keystroke, debouncing is the
/// caller's concern.
pub fn suggest(forest: &[LocationNode], query: &str) -> Vec<String> {
    suggest_scoped(forest, query, |_| true)
}

/// Like [`suggest`], restricted to nodes whose parent path satisfies
/// `in_scope` (e.g. only cities under the currently selected primary).
/// Level-0 nodes are checked against the empty parent path.
pub fn suggest_scoped<F>(forest: &[LocationNode], query: &str, in_scope: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut matches = BTreeSet::new();

    for node in forest {
        consider(&mut matches, "", &node.primary_location, &needle, &in_scope);
        let primary_path = path::child("", &node.primary_location);

        for state in &node.sub_locations {
            consider(
                &mut matches,
                &primary_path,
                &state.primary_sub_location,
                &needle,
                &in_scope,
            );
            let state_path = path::child(&primary_path, &state.primary_sub_location);

            for city in &state.secondary_locations {
                consider(
                    &mut matches,
                    &state_path,
                    &city.secondary_location,
                    &needle,
                    &in_scope,
                );
                let city_path = path::child(&state_path, &city.secondary_location);

                for area in &city.secondary_sub_locations {
                    consider(
                        &mut matches,
                        &city_path,
                        &area.secondary_sub_location,
                        &needle,
                        &in_scope,
                    );
                    let area_path = path::child(&city_path, &area.secondary_sub_location);

                    for building in &area.third_locations {
                        consider(
                            &mut matches,
                            &area_path,
                            &building.third_location,
                            &needle,
                            &in_scope,
                        );
                    }
                }
            }
        }
    }

    matches.into_iter().collect()
}

fn consider<F>(matches: &mut BTreeSet<String>, parent: &str, label: &str, needle: &str, in_scope: &F)
where
    F: Fn(&str) -> bool,
{
    if path::is_blank(label) {
        return;
    }
    if !in_scope(parent) {
        return;
    }
    if label.to_lowercase().contains(needle) {
        matches.insert(path::child(parent, label));
    }
}

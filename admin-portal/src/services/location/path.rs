//! Path strings: the addressable identity of a node at any depth.
//!
//! A path is the ordered concatenation of ancestor labels down to the node.
//! One separator is canonical across the whole portal; blank labels never
//! contribute a segment, so a child under an unlabeled intermediate simply
//! omits that level.

/// Canonical separator for rendered path strings.
pub const PATH_SEPARATOR: &str = " > ";

/// Labels that are empty or whitespace-only are treated as absent.
pub fn is_blank(label: &str) -> bool {
    label.trim().is_empty()
}

/// Join non-blank segments with the given separator.
pub fn join_with(segments: &[&str], separator: &str) -> String {
    segments
        .iter()
        .filter(|s| !is_blank(s))
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Join non-blank segments with the canonical separator.
pub fn join(segments: &[&str]) -> String {
    join_with(segments, PATH_SEPARATOR)
}

/// Extend a parent path with one more label. A blank label yields the parent
/// path unchanged; an empty parent yields just the label.
pub fn child(parent: &str, label: &str) -> String {
    if is_blank(label) {
        return parent.to_string();
    }
    if parent.is_empty() {
        return label.trim().to_string();
    }
    format!("{}{}{}", parent, PATH_SEPARATOR, label.trim())
}

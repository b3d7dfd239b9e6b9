// Two-Way Selector Sync
//
// Reconciles a free-text field against its catalog: when the text
// exactly equals a catalog prompt value, the paired dropdown shows that
// entry; otherwise the dropdown resets to "none selected". One generic
// implementation covers style, camera model, lighting, mood, and
// composition.

use crate::catalog::Catalog;

/// Resolve `text` against the catalog's flattened entries. Exact string
/// equality only — no trimming, no case folding. First match in
/// category-load order wins; None means "none selected".
pub fn sync_selector<'a>(text: &str, catalog: &'a Catalog) -> Option<&'a str> {
    for group in &catalog.groups {
        for entry in &group.entries {
            if entry.prompt == text {
                return Some(&entry.prompt);
            }
        }
    }
    None
}

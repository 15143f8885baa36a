//! Fuzzy filtering of item lists by name.

use crate::domain::Item;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Keeps items whose name fuzzy-matches every whitespace-separated token of
/// `query`. An empty query keeps everything. Order is preserved.
///
/// ```
/// use instant_access::domain::{Item, ItemKind};
/// use instant_access::storage::filter_items;
///
/// let items = vec![
///     Item::new("Documents", ItemKind::Folder, "~/Documents"),
///     Item::new("Music", ItemKind::Folder, "~/Music"),
/// ];
/// let hits = filter_items(&items, "dcm");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name, "Documents");
/// ```
#[must_use]
pub fn filter_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return items.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let hits: Vec<&Item> = items
        .iter()
        .filter(|item| {
            let name = item.name.to_lowercase();
            tokens.iter().all(|token| matcher.fuzzy_match(&name, token).is_some())
        })
        .collect();

    tracing::debug!(query_len = query.len(), hits = hits.len(), "item filter applied");
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKind;

    #[test]
    fn all_tokens_must_match() {
        let items = vec![
            Item::new("Work Mail", ItemKind::Website, "mail.example.com"),
            Item::new("Home Mail", ItemKind::Website, "mail.example.net"),
        ];
        let hits = filter_items(&items, "mail WORK");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Work Mail");
        assert_eq!(filter_items(&items, "   ").len(), 2);
        assert!(filter_items(&items, "zzz").is_empty());
    }
}

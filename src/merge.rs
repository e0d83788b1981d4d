use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::debug;

use crate::record::BookmarkRecord;

/// Merges any number of record lists into one deduplicated list.
///
/// Lists are processed in caller order and each list in its original
/// order, so output order is first-seen order across the whole input.
/// The first record seen for a URL wins; records without a URL carry no
/// dedup key and are dropped.
pub fn merge_lists(lists: Vec<Vec<BookmarkRecord>>) -> Vec<BookmarkRecord> {
    let mut merged = Vec::new();
    let mut seen_urls = HashSet::new();

    for list in lists {
        for record in list {
            if !record.has_url() {
                debug!("dropping bookmark without URL: {}", record.title);
                continue;
            }
            let url = record.url.as_deref().unwrap_or_default();
            if seen_urls.insert(url_key(url)) {
                merged.push(record);
            } else {
                debug!("skipping duplicate URL: {}", url);
            }
        }
    }

    merged
}

fn url_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // A small URL alphabet forces collisions across lists.
    fn any_record() -> impl Strategy<Value = BookmarkRecord> {
        (
            prop_oneof![
                Just(None::<String>),
                Just(Some(String::new())),
                "[a-f]".prop_map(|s| Some(format!("http://{}", s))),
            ],
            "[A-Za-z]{0,8}",
        )
            .prop_map(|(url, title)| BookmarkRecord::new(title, url, vec![], ""))
    }

    fn any_lists() -> impl Strategy<Value = Vec<Vec<BookmarkRecord>>> {
        prop::collection::vec(prop::collection::vec(any_record(), 0..8), 0..4)
    }

    proptest! {
        /// A single global first-seen-wins pass and a pairwise left-fold
        /// produce the same membership and order.
        #[test]
        fn prop_global_pass_equals_left_fold(lists in any_lists()) {
            let global = merge_lists(lists.clone());
            let folded = lists
                .into_iter()
                .fold(Vec::new(), |acc, next| merge_lists(vec![acc, next]));
            prop_assert_eq!(global, folded);
        }

        #[test]
        fn prop_merge_with_self_is_identity(list in prop::collection::vec(any_record(), 0..16)) {
            let once = merge_lists(vec![list.clone()]);
            let twice = merge_lists(vec![list.clone(), list]);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_output_never_contains_empty_urls(lists in any_lists()) {
            let merged = merge_lists(lists);
            prop_assert!(merged.iter().all(|r| r.has_url()));
        }

        #[test]
        fn prop_output_urls_are_unique(lists in any_lists()) {
            let merged = merge_lists(lists);
            let mut seen = std::collections::HashSet::new();
            prop_assert!(merged.iter().all(|r| seen.insert(r.url.clone())));
        }
    }
}

//! Pure visibility decisions.
//!
//! Nothing here touches controller state; the controller feeds item text and
//! the resolved match string in and applies the results itself.

use std::ops::Range;

/// Whether an item with `text` belongs to the candidate set.
///
/// `None` means no region filter: every item is a candidate. Matching is a
/// case-sensitive substring test, not word matching.
pub fn is_candidate(text: &str, match_text: Option<&str>) -> bool {
    match match_text {
        None => true,
        Some(needle) => text.contains(needle),
    }
}

/// Indices of the items whose text passes [`is_candidate`], in item order.
pub fn candidates<'a, I>(texts: I, match_text: Option<&str>) -> Vec<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .enumerate()
        .filter(|(_, text)| is_candidate(text, match_text))
        .map(|(idx, _)| idx)
        .collect()
}

/// Offset into the candidate list where 1-based `page` starts.
pub fn page_start(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Slice of the candidate list covered by `page`, or `None` once the start
/// offset is at or past `total`.
///
/// The final page is clipped to `total`, so 30 candidates with a page size
/// of 25 yield `0..25` then `25..30`.
pub fn page_window(page: usize, page_size: usize, total: usize) -> Option<Range<usize>> {
    if page_size == 0 {
        return None;
    }
    let start = page_start(page, page_size);
    if start >= total {
        return None;
    }
    let end = start.saturating_add(page_size).min(total);
    Some(start..end)
}

/// Whether the viewport is close enough to the bottom to load more.
///
/// Fires when `document_height - viewport_bottom < threshold`, including
/// the case where the viewport already extends past the document.
pub fn near_bottom(viewport_bottom: u32, document_height: u32, threshold: u32) -> bool {
    i64::from(document_height) - i64::from(viewport_bottom) < i64::from(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_without_filter() {
        assert!(is_candidate("anything", None));
        assert!(is_candidate("", None));
    }

    #[test]
    fn test_candidate_is_case_sensitive_substring() {
        assert!(is_candidate("Западен Балкан денес", Some("Балкан")));
        assert!(is_candidate("Балканот", Some("Балкан")));
        assert!(!is_candidate("балкан", Some("Балкан")));
    }

    #[test]
    fn test_candidates_keep_item_order() {
        let texts = ["Азија", "Балкан 1", "Европа", "Балкан 2"];
        assert_eq!(candidates(texts, Some("Балкан")), vec![1, 3]);
        assert_eq!(candidates(texts, None), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_page_window_clips_last_page() {
        assert_eq!(page_window(1, 25, 30), Some(0..25));
        assert_eq!(page_window(2, 25, 30), Some(25..30));
        assert_eq!(page_window(3, 25, 30), None);
    }

    #[test]
    fn test_page_window_empty_or_zero_size() {
        assert_eq!(page_window(1, 25, 0), None);
        assert_eq!(page_window(1, 0, 10), None);
    }

    #[test]
    fn test_page_window_exact_multiple() {
        assert_eq!(page_window(2, 25, 50), Some(25..50));
        assert_eq!(page_window(3, 25, 50), None);
    }

    #[test]
    fn test_near_bottom_threshold() {
        assert!(near_bottom(1600, 2000, 500));
        assert!(!near_bottom(1500, 2000, 500));
        assert!(!near_bottom(1000, 2000, 500));
        // Viewport taller than the document
        assert!(near_bottom(900, 400, 500));
    }
}

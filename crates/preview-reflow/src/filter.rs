//! Page selection
//!
//! Resolves a [`PageFilter`] against a document's page count into the ordered
//! list of 1-based indices that take part in the preview. Custom range text is
//! all-or-nothing: one bad token rejects the whole filter, and the caller
//! decides whether to fall back to selecting everything.

use crate::types::{PageFilter, PreviewError, Result};

/// Resolve a filter into selected 1-based page indices, in document order.
///
/// Duplicate and overlapping range tokens collapse: selection is a membership
/// test over `1..=total`, so each page appears at most once and ordering
/// follows the document, not the filter text.
pub fn select_pages(filter: &PageFilter, total: usize) -> Result<Vec<usize>> {
    match filter {
        PageFilter::All => Ok((1..=total).collect()),
        PageFilter::CurrentPage(index) => {
            if *index == 0 || *index > total {
                return Err(PreviewError::PageRange(format!(
                    "Current page {index} is out of bounds (1-{total})"
                )));
            }
            Ok(vec![*index])
        }
        PageFilter::Custom(text) => {
            let mut requested = vec![false; total];
            for token in text.split(',') {
                let token = token.trim();
                let (start, end) = parse_token(token, total)?;
                for flag in &mut requested[start - 1..end] {
                    *flag = true;
                }
            }
            Ok((1..=total).filter(|i| requested[i - 1]).collect())
        }
    }
}

/// Parse one comma-separated token into an inclusive `(start, end)` pair
fn parse_token(token: &str, total: usize) -> Result<(usize, usize)> {
    let mut parts = token.split('-');
    let first = parse_page_number(parts.next().unwrap_or(""), token, total)?;
    match parts.next() {
        None => Ok((first, first)),
        Some(second) => {
            if parts.next().is_some() {
                return Err(PreviewError::PageRange(format!(
                    "Token '{token}' has more than one dash"
                )));
            }
            let second = parse_page_number(second, token, total)?;
            if first > second {
                return Err(PreviewError::PageRange(format!(
                    "Range '{token}' runs backwards"
                )));
            }
            Ok((first, second))
        }
    }
}

fn parse_page_number(text: &str, token: &str, total: usize) -> Result<usize> {
    let page: usize = text.trim().parse().map_err(|_| {
        PreviewError::PageRange(format!("Token '{token}' is not a page number or range"))
    })?;
    if page == 0 || page > total {
        return Err(PreviewError::PageRange(format!(
            "Page {page} is out of bounds (1-{total})"
        )));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selects_every_page() {
        let selected = select_pages(&PageFilter::All, 4).unwrap();
        assert_eq!(selected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_all_on_empty_document() {
        let selected = select_pages(&PageFilter::All, 0).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_current_page_in_bounds() {
        let selected = select_pages(&PageFilter::CurrentPage(3), 10).unwrap();
        assert_eq!(selected, vec![3]);
    }

    #[test]
    fn test_current_page_out_of_bounds() {
        assert!(select_pages(&PageFilter::CurrentPage(0), 10).is_err());
        assert!(select_pages(&PageFilter::CurrentPage(11), 10).is_err());
    }

    #[test]
    fn test_custom_ranges_in_document_order() {
        let filter = PageFilter::Custom("2,4-6,9".into());
        let selected = select_pages(&filter, 10).unwrap();
        assert_eq!(selected, vec![2, 4, 5, 6, 9]);
    }

    #[test]
    fn test_custom_order_follows_document_not_tokens() {
        let filter = PageFilter::Custom("9,2,4-6".into());
        let selected = select_pages(&filter, 10).unwrap();
        assert_eq!(selected, vec![2, 4, 5, 6, 9]);
    }

    #[test]
    fn test_overlapping_tokens_deduplicate() {
        let filter = PageFilter::Custom("1-3,2-4,3".into());
        let selected = select_pages(&filter, 10).unwrap();
        assert_eq!(selected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_whitespace_around_tokens() {
        let filter = PageFilter::Custom(" 2 , 4 - 6 ".into());
        let selected = select_pages(&filter, 10).unwrap();
        assert_eq!(selected, vec![2, 4, 5, 6]);
    }

    #[test]
    fn test_one_bad_token_rejects_the_whole_filter() {
        // "2" alone is fine, but "11" is out of bounds for N=10.
        let filter = PageFilter::Custom("2,11".into());
        assert!(select_pages(&filter, 10).is_err());
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(select_pages(&PageFilter::Custom("0".into()), 10).is_err());
        assert!(select_pages(&PageFilter::Custom("0-3".into()), 10).is_err());
    }

    #[test]
    fn test_backwards_range_rejected() {
        assert!(select_pages(&PageFilter::Custom("6-4".into()), 10).is_err());
    }

    #[test]
    fn test_garbage_tokens_rejected() {
        assert!(select_pages(&PageFilter::Custom("abc".into()), 10).is_err());
        assert!(select_pages(&PageFilter::Custom("1,,3".into()), 10).is_err());
        assert!(select_pages(&PageFilter::Custom("1--3".into()), 10).is_err());
        assert!(select_pages(&PageFilter::Custom("".into()), 10).is_err());
        assert!(select_pages(&PageFilter::Custom("2.5".into()), 10).is_err());
    }

    #[test]
    fn test_single_page_range() {
        let selected = select_pages(&PageFilter::Custom("7-7".into()), 10).unwrap();
        assert_eq!(selected, vec![7]);
    }

    #[test]
    fn test_full_span_range() {
        let selected = select_pages(&PageFilter::Custom("1-10".into()), 10).unwrap();
        assert_eq!(selected, (1..=10).collect::<Vec<_>>());
    }
}

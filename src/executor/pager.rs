//! Page slicing
//!
//! `total` counts the whole ordered collection; `total_pages` is never less
//! than 1, so an empty result still has one (empty) page. A page index past
//! the end yields no rows rather than an error.

use super::result::Page;

/// Slices ordered collections into pages
pub struct Pager;

impl Pager {
    /// Returns the requested page window.
    ///
    /// A zero `page_size` is treated as 1; queries reject it before this point.
    pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
        let page_size = page_size.max(1);
        let total = records.len();
        let total_pages = total.div_ceil(page_size).max(1);

        let start = page.saturating_mul(page_size);
        let rows = if start >= total {
            Vec::new()
        } else {
            let end = start.saturating_add(page_size).min(total);
            records[start..end].to_vec()
        };

        Page {
            rows,
            total,
            total_pages,
            page,
            page_size,
        }
    }
}

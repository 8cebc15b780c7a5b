use std::ops::Range;

/// Clamps a caller-supplied count or page number to at least 1.
pub fn clamp_positive(value: i64) -> i64 {
    value.max(1)
}

/// Zero-based result offset for a 1-based page.
///
/// `page = 1, page_size = 10` gives 0, `page = 2` gives 10. Values below 1
/// are treated as 1.
pub fn offset(page: i64, page_size: i64) -> i64 {
    let page = clamp_positive(page);
    let page_size = clamp_positive(page_size);
    (page - 1).saturating_mul(page_size)
}

/// Page numbers `start_page .. start_page + max_pages`, both clamped to >= 1.
pub fn page_sequence(start_page: i64, max_pages: i64) -> Range<i64> {
    let start = clamp_positive(start_page);
    let count = clamp_positive(max_pages);
    start..start.saturating_add(count)
}

use serde::Serialize;

/// Page metadata attached to every list/search response.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_entries: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u64,
}

pub fn paginate(page: u64, limit: u64, total_entries: u64) -> PaginationMeta {
    let total_pages = total_entries.div_ceil(limit.max(1));
    PaginationMeta {
        current_page: page,
        total_pages,
        total_entries,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
        limit,
    }
}

/// Row offset for a 1-indexed page. Saturates for absurdly large pages and
/// caps at what the database accepts as an integer; the window then simply
/// lands past the end of the table.
pub fn offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit).min(i64::MAX as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_rows_at_ten_per_page_is_three_pages() {
        let meta = paginate(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn last_page_has_prev_but_no_next() {
        let meta = paginate(3, 10, 25);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn empty_result_set_has_zero_pages() {
        let meta = paginate(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(paginate(2, 10, 20).total_pages, 2);
        assert!(!paginate(2, 10, 20).has_next_page);
    }

    #[test]
    fn offset_is_zero_indexed_window_start() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(3, 10), 20);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        assert_eq!(offset(i64::MAX as u64, 100), i64::MAX as u64);
        assert_eq!(offset(u64::MAX, u64::MAX), i64::MAX as u64);
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let json = serde_json::to_value(paginate(2, 10, 25)).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["hasPrevPage"], true);
        assert_eq!(json["totalEntries"], 25);
    }
}

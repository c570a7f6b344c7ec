pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized pagination input: `page`/`count` plus an extra raw `offset`,
/// all optional on the wire. `count` is clamped so a caller cannot request
/// unbounded pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    count: i64,
    offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            count: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn from_params(page: Option<i64>, count: Option<i64>, offset: Option<i64>) -> Self {
        Pagination {
            page: page.unwrap_or(1).max(1),
            count: count
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Effective row offset: explicit offset plus whole pages skipped.
    /// Saturating: `page` and `offset` are caller-controlled and only floored
    /// at parse time, so an absurd page number pins to `i64::MAX` instead of
    /// overflowing.
    pub fn sql_offset(&self) -> i64 {
        self.offset
            .saturating_add((self.page - 1).saturating_mul(self.count))
    }

    pub fn limit(&self) -> i64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::from_params(None, None, None);
        assert_eq!(p, Pagination::default());
        assert_eq!(p.sql_offset(), 0);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_page_two_skips_one_page_of_rows() {
        let p = Pagination::from_params(Some(2), Some(10), None);
        assert_eq!(p.sql_offset(), 10);
    }

    #[test]
    fn test_explicit_offset_adds_to_page_offset() {
        let p = Pagination::from_params(Some(3), Some(5), Some(2));
        assert_eq!(p.sql_offset(), 12);
    }

    #[test]
    fn test_count_is_clamped_to_bounds() {
        assert_eq!(Pagination::from_params(None, Some(0), None).limit(), 1);
        assert_eq!(Pagination::from_params(None, Some(1000), None).limit(), 100);
    }

    #[test]
    fn test_non_positive_page_and_offset_are_floored() {
        let p = Pagination::from_params(Some(-3), Some(10), Some(-7));
        assert_eq!(p.sql_offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates_instead_of_overflowing() {
        let p = Pagination::from_params(Some(i64::MAX), Some(100), Some(1));
        assert_eq!(p.sql_offset(), i64::MAX);

        let p = Pagination::from_params(Some(2), Some(100), Some(i64::MAX));
        assert_eq!(p.sql_offset(), i64::MAX);
    }
}

/// Paginated query result
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit.max(1) as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Slice an already-filtered list into one page.
    pub fn from_vec(all: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Self::new(items, total, page, limit)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// Clamp page / page size query values to sane bounds.
pub fn validate_pagination(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, 100);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let r = PaginatedResult::new(vec![1, 2], 41, 1, 20);
        assert_eq!(r.total_pages, 3);
    }

    #[test]
    fn from_vec_slices_requested_page() {
        let r = PaginatedResult::from_vec((1..=25).collect::<Vec<_>>(), 2, 20);
        assert_eq!(r.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(r.total, 25);
        assert_eq!(r.total_pages, 2);
    }

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(validate_pagination(Some(0), Some(500), 20), (1, 100));
        assert_eq!(validate_pagination(None, None, 20), (1, 20));
    }
}

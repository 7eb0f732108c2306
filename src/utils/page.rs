/// One page of a longer list, 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `items` into pages of `per_page` and return page `page_num`
    ///
    /// An empty list has a single empty page.
    pub fn of(items: &[T], page_num: usize, per_page: usize) -> Result<Self, String> {
        let per_page = per_page.max(1);
        let total_pages = items.len().div_ceil(per_page).max(1);

        if page_num < 1 || page_num > total_pages {
            return Err(format!(
                "Invalid page number. The list has {} page(s)",
                total_pages
            ));
        }

        let start = (page_num - 1) * per_page;
        let end = (start + per_page).min(items.len());

        Ok(Page {
            items: items[start..end].to_vec(),
            current_page: page_num,
            total_pages,
        })
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages
    }
}

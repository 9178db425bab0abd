/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

/// Read-only, fixed-size windows over a filtered collection.
#[derive(Debug, Clone)]
pub struct RowPager<'a, T> {
    rows: &'a [T],
    page_size: usize,
    offset: usize,
}

impl<'a, T> RowPager<'a, T> {
    /// A page size of zero is treated as one.
    pub fn new(rows: &'a [T], page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
            offset: 0,
        }
    }

    /// Index of the first row the next page will return.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.rows.len()
    }

    /// Returns the next page, or `None` once every row has been shown.
    pub fn next_page(&mut self) -> Option<&'a [T]> {
        if self.is_exhausted() {
            return None;
        }
        let end = (self.offset + self.page_size).min(self.rows.len());
        let page = &self.rows[self.offset..end];
        self.offset = end;
        Some(page)
    }
}

impl<'a, T> Iterator for RowPager<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page()
    }
}

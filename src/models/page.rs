use super::sort::{SortColumn, SortOrder};

/// Parameters of one list request, already normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortColumn,
    pub order: SortOrder,
    pub filter: String,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
            sort: SortColumn::default(),
            order: SortOrder::default(),
            filter: String::new(),
        }
    }

    pub fn sorted(mut self, sort: SortColumn, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn filtered(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Index of the first row of this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn total_page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_index) + 1 < self.total_page_count()
    }

    /// 1-based position of the first item shown, 0 when the page is empty.
    pub fn display_from(&self) -> u64 {
        if self.items.is_empty() {
            0
        } else {
            u64::from(self.page_index) * u64::from(self.page_size) + 1
        }
    }

    pub fn display_to(&self) -> u64 {
        if self.items.is_empty() {
            0
        } else {
            self.display_from() + self.items.len() as u64 - 1
        }
    }
}

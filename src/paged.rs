use crate::{count_by_example, Connection, Record, RecordIterator, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page-windowed streaming traversal.
///
/// Wraps a [`RecordIterator`] and translates a page number into the
/// limit/offset window of the underlying query. Ordering is tracked
/// separately from the extra SQL so the total count query can omit it.
pub struct PagedRecordIterator<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    inner: RecordIterator<'c, C, R>,
    page_size: u32,
    order_by: String,
    extra: String,
    total: Option<u64>,
}

impl<'c, C, R> PagedRecordIterator<'c, C, R>
where
    C: Connection + ?Sized,
    R: Record,
{
    pub fn new(conn: &'c mut C, prototype: R) -> Self {
        let mut inner = RecordIterator::new(conn, prototype);
        inner.set_range(Some(DEFAULT_PAGE_SIZE), Some(0));
        Self {
            inner,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: String::new(),
            extra: String::new(),
            total: None,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Change the page size, re-deriving the window so the current page
    /// number is kept.
    pub fn set_page_size(&mut self, size: u32) {
        let page = self.page();
        self.page_size = size.max(1);
        self.inner
            .set_range(Some(self.page_size), Some((page - 1) * self.page_size));
    }

    /// Select a one-based page; takes effect on the next (re-)execution.
    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        self.inner
            .set_range(Some(self.page_size), Some((page - 1) * self.page_size));
    }

    /// One-based page number derived from the current window.
    pub fn page(&self) -> u32 {
        self.inner.offset().unwrap_or(0) / self.page_size + 1
    }

    /// `ORDER BY` expression applied to the paged query, without the
    /// keywords. Empty clears the ordering.
    pub fn set_order_by(&mut self, order_by: &str) {
        self.order_by = if order_by.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {order_by}")
        };
    }

    /// Raw SQL appended after the WHERE clause, before the ordering.
    pub fn set_extra(&mut self, extra: &str) {
        self.extra = extra.to_owned();
    }

    /// Execute the current page's selection and position on its first
    /// record.
    pub fn fetch(&mut self) -> Result<()> {
        self.apply_extra();
        self.inner.fetch()
    }

    /// Position on the first record of the current page, re-executing only
    /// when the cursor has been consumed.
    pub fn rewind(&mut self) -> Result<()> {
        self.apply_extra();
        self.inner.rewind()
    }

    pub fn advance(&mut self) -> Result<Option<&R>> {
        self.inner.advance()
    }

    pub fn current(&self) -> Option<&R> {
        self.inner.current()
    }

    /// Zero-based position of the current record within its page.
    pub fn key(&self) -> Option<u64> {
        self.inner.key()
    }

    pub fn valid(&self) -> bool {
        self.inner.valid()
    }

    /// Total number of matching records across all pages, counted with a
    /// dedicated `COUNT(*)` query (the window does not apply) and cached.
    pub fn total_count(&mut self) -> Result<u64> {
        if self.total.is_none() {
            let total = count_by_example(&mut *self.inner.conn, &self.inner.prototype, &self.extra)?;
            self.total = Some(total);
        }
        Ok(self.total.unwrap_or(0))
    }

    /// Number of pages needed to cover the total count.
    pub fn total_pages(&mut self) -> Result<u32> {
        let total = self.total_count()?;
        Ok(total.div_ceil(u64::from(self.page_size)) as u32)
    }

    /// Drop the cursor and the cached total.
    pub fn clear(&mut self) -> Result<()> {
        self.total = None;
        self.inner.clear()
    }

    fn apply_extra(&mut self) {
        let mut extra = String::with_capacity(self.extra.len() + self.order_by.len());
        extra.push_str(&self.extra);
        extra.push_str(&self.order_by);
        self.inner.set_extra(extra.trim_start());
    }
}

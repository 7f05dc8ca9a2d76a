//! Pagination types and the generic [`Pager`].
//!
//! Pages are 1-based. Out-of-range page numbers never raise an error: they
//! yield an empty item slice while `total` and `total_pages` still describe
//! the whole sequence. The store-backed queries and the in-memory pager
//! follow the same policy.

use serde::{Deserialize, Serialize};

/// Page size used when a caller supplies none.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// `ceil(total / page_size)`; 0 when either side is 0.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
  if total == 0 || page_size == 0 {
    return 0;
  }
  total.div_ceil(u64::from(page_size))
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page_num:  u32,
  pub page_size: u32,
}

impl Pagination {
  pub fn new(page_num: u32, page_size: u32) -> Self { Self { page_num, page_size } }

  /// The `(offset, limit)` window for this request, or `None` when the
  /// request can only produce an empty page (page 0 or a zero size).
  pub fn window(&self) -> Option<(u64, u64)> {
    if self.page_num == 0 || self.page_size == 0 {
      return None;
    }
    let size = u64::from(self.page_size);
    Some((u64::from(self.page_num - 1) * size, size))
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// One page of results plus the numbers needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub total:       u64,
  pub page_num:    u32,
  pub page_size:   u32,
  pub total_pages: u64,
}

impl<T> Page<T> {
  /// Assemble a page from an already-sliced result set.
  pub fn new(items: Vec<T>, total: u64, pagination: Option<Pagination>) -> Self {
    match pagination {
      Some(p) => Self {
        items,
        total,
        page_num: p.page_num,
        page_size: p.page_size,
        total_pages: total_pages(total, p.page_size),
      },
      None => Self::unpaginated(items, total),
    }
  }

  /// The whole sequence presented as a single page.
  pub fn unpaginated(items: Vec<T>, total: u64) -> Self {
    Self {
      items,
      total,
      page_num: 1,
      page_size: u32::try_from(total).unwrap_or(u32::MAX),
      total_pages: if total == 0 { 0 } else { 1 },
    }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:       self.items.into_iter().map(f).collect(),
      total:       self.total,
      page_num:    self.page_num,
      page_size:   self.page_size,
      total_pages: self.total_pages,
    }
  }
}

// ─── Pager ───────────────────────────────────────────────────────────────────

/// A counted sequence that can hand out contiguous slices.
pub trait Paginate {
  type Item;

  fn count(&self) -> u64;

  /// Items in `[offset, offset + limit)`, clipped to the sequence end.
  fn slice(&self, offset: u64, limit: u64) -> Vec<Self::Item>;
}

impl<T: Clone> Paginate for &[T] {
  type Item = T;

  fn count(&self) -> u64 { self.len() as u64 }

  fn slice(&self, offset: u64, limit: u64) -> Vec<T> {
    let len = self.len();
    let start = usize::try_from(offset).unwrap_or(len).min(len);
    let end = start.saturating_add(usize::try_from(limit).unwrap_or(len)).min(len);
    self[start..end].to_vec()
  }
}

impl<T: Clone> Paginate for Vec<T> {
  type Item = T;

  fn count(&self) -> u64 { self.len() as u64 }

  fn slice(&self, offset: u64, limit: u64) -> Vec<T> {
    self.as_slice().slice(offset, limit)
  }
}

/// Page-window arithmetic over any [`Paginate`] source.
#[derive(Debug, Clone)]
pub struct Pager<S> {
  source:    S,
  page_size: u32,
}

impl<S: Paginate> Pager<S> {
  /// A zero `page_size` falls back to [`DEFAULT_PAGE_SIZE`].
  pub fn new(source: S, page_size: u32) -> Self {
    let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
    Self { source, page_size }
  }

  pub fn page_size(&self) -> u32 { self.page_size }

  pub fn total(&self) -> u64 { self.source.count() }

  pub fn total_pages(&self) -> u64 { total_pages(self.total(), self.page_size) }

  fn in_range(&self, page_num: u32) -> bool {
    page_num >= 1 && u64::from(page_num) <= self.total_pages()
  }

  /// The requested page. Pages outside `[1, total_pages]` are empty.
  pub fn page(&self, page_num: u32) -> Page<S::Item> {
    let pagination = Pagination::new(page_num, self.page_size);
    let total = self.total();
    let items = match pagination.window() {
      Some((offset, limit)) if self.in_range(page_num) => self.source.slice(offset, limit),
      _ => Vec::new(),
    };
    Page::new(items, total, Some(pagination))
  }

  pub fn first_page(&self) -> Page<S::Item> { self.page(1) }

  pub fn last_page(&self) -> Page<S::Item> {
    let last = u32::try_from(self.total_pages()).unwrap_or(u32::MAX).max(1);
    self.page(last)
  }

  pub fn has_next(&self, page_num: u32) -> bool {
    u64::from(page_num) < self.total_pages()
  }

  pub fn has_previous(&self, page_num: u32) -> bool { page_num > 1 }

  /// 1-based inclusive item positions covered by `page_num`, or `None` for
  /// a page outside the valid range.
  pub fn page_range(&self, page_num: u32) -> Option<(u64, u64)> {
    if !self.in_range(page_num) {
      return None;
    }
    let size = u64::from(self.page_size);
    let start = u64::from(page_num - 1) * size + 1;
    let end = (start + size - 1).min(self.total());
    Some((start, end))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn numbers(n: u32) -> Vec<u32> { (1..=n).collect() }

  #[test]
  fn total_pages_rounds_up() {
    assert_eq!(total_pages(0, 12), 0);
    assert_eq!(total_pages(10, 0), 0);
    assert_eq!(total_pages(12, 12), 1);
    assert_eq!(total_pages(13, 12), 2);
  }

  #[test]
  fn window_rejects_page_zero() {
    assert_eq!(Pagination::new(0, 10).window(), None);
    assert_eq!(Pagination::new(3, 0).window(), None);
    assert_eq!(Pagination::new(3, 10).window(), Some((20, 10)));
  }

  #[test]
  fn pager_slices_pages() {
    let pager = Pager::new(numbers(25), 10);
    assert_eq!(pager.total_pages(), 3);
    assert_eq!(pager.first_page().items, numbers(10));
    assert_eq!(pager.page(3).items, vec![21, 22, 23, 24, 25]);
    assert_eq!(pager.last_page().items.len(), 5);
  }

  #[test]
  fn out_of_range_page_is_empty_not_an_error() {
    let pager = Pager::new(numbers(5), 10);
    let beyond = pager.page(4);
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
    assert_eq!(beyond.total_pages, 1);
    assert!(pager.page(0).items.is_empty());
    assert_eq!(pager.page_range(2), None);
    assert_eq!(pager.page_range(0), None);
  }

  #[test]
  fn navigation_helpers() {
    let pager = Pager::new(numbers(25), 10);
    assert!(pager.has_next(1));
    assert!(pager.has_next(2));
    assert!(!pager.has_next(3));
    assert!(!pager.has_previous(1));
    assert!(pager.has_previous(3));
    assert_eq!(pager.page_range(1), Some((1, 10)));
    assert_eq!(pager.page_range(3), Some((21, 25)));
  }

  #[test]
  fn zero_page_size_uses_default() {
    let pager = Pager::new(numbers(30), 0);
    assert_eq!(pager.page_size(), DEFAULT_PAGE_SIZE);
    assert_eq!(pager.total_pages(), 3);
  }

  #[test]
  fn empty_source_has_no_pages() {
    let empty: Vec<u32> = Vec::new();
    let pager = Pager::new(empty, 10);
    assert_eq!(pager.total_pages(), 0);
    assert!(pager.last_page().items.is_empty());
    assert!(!pager.has_next(1));
  }

  #[test]
  fn unpaginated_page_covers_everything() {
    let page = Page::unpaginated(numbers(3), 3);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page_size, 3);
    assert_eq!(Page::<u32>::unpaginated(Vec::new(), 0).total_pages, 0);
  }
}

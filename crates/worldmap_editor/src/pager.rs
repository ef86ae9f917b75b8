//! Paged window over the flat catalog list

use crate::scrollbar::ScrollTrack;
use std::ops::Range;
use worldmap_core::ScreenPoint;

/// Entry indices visible for a scroll `offset` over `total` entries.
///
/// The offset is clamped to `max(0, total - window)` first, so the page is
/// always `[offset, offset + window)` cut to `total`.
pub fn page(offset: usize, window: usize, total: usize) -> Range<usize> {
    let offset = offset.min(total.saturating_sub(window));
    offset..(offset + window).min(total)
}

/// Scroll state of the catalog window.
///
/// The window shows `rows` rows of `columns` entries each; `offset` counts
/// scrolled rows. A flat list is the single-column case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPager {
    offset: u32,
    rows: u32,
    columns: u32,
    total: usize,
}

impl CatalogPager {
    pub fn new(rows: u32, columns: u32, total: usize) -> Self {
        Self {
            offset: 0,
            rows: rows.max(1),
            columns: columns.max(1),
            total,
        }
    }

    /// First visible row
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Rows needed to show every entry
    fn total_rows(&self) -> usize {
        self.total.div_ceil(self.columns as usize)
    }

    /// Largest row offset that still fills the window where possible
    pub fn max_offset(&self) -> u32 {
        let max = self.total_rows().saturating_sub(self.rows as usize);
        u32::try_from(max).unwrap_or(u32::MAX)
    }

    /// Catalog entry indices currently visible
    pub fn page(&self) -> Range<usize> {
        let columns = self.columns as usize;
        let rows = page(self.offset as usize, self.rows as usize, self.total_rows());
        (rows.start * columns)..(rows.end * columns).min(self.total)
    }

    /// Replace the catalog length, re-clamping the offset
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Scroll by whole rows. Returns whether the offset changed.
    pub fn scroll_by(&mut self, delta: i64) -> bool {
        let target = i64::from(self.offset).saturating_add(delta).max(0);
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX))
    }

    /// Jump to a row offset, clamped. Returns whether the offset changed.
    pub fn scroll_to(&mut self, offset: u32) -> bool {
        let offset = offset.min(self.max_offset());
        let changed = offset != self.offset;
        self.offset = offset;
        changed
    }

    /// Scroll from the catalog handle dragged to `pixel_y`
    pub fn scroll_to_pixel(&mut self, pixel_y: f32, track: ScrollTrack) -> bool {
        self.scroll_to(track.offset_at(pixel_y, self.max_offset()))
    }

    /// Leading edge of the catalog handle for the current offset
    pub fn handle_position(&self, track: ScrollTrack) -> f32 {
        track.handle_position(self.offset, self.max_offset())
    }

    /// Catalog entry under a point in the catalog window, if any
    pub fn index_at(&self, point: ScreenPoint, tile_size: f32) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let row = (point.y / tile_size).floor() as u32;
        let column = (point.x / tile_size).floor() as u32;
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let index = (self.offset + row) as usize * self.columns as usize + column as usize;
        (index < self.total).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamps_offset() {
        assert_eq!(page(0, 20, 100), 0..20);
        assert_eq!(page(95, 20, 100), 80..100);
        assert_eq!(page(3, 20, 5), 0..5);
        assert_eq!(page(0, 20, 0), 0..0);
    }

    #[test]
    fn test_flat_list_scrolling() {
        let mut pager = CatalogPager::new(20, 1, 100);
        assert_eq!(pager.max_offset(), 80);
        assert!(!pager.scroll_by(-1));
        assert!(pager.scroll_by(5));
        assert_eq!(pager.page(), 5..25);

        pager.scroll_by(1000);
        assert_eq!(pager.offset(), 80);
        assert_eq!(pager.page(), 80..100);
    }

    #[test]
    fn test_scroll_with_extreme_delta_clamps() {
        let mut pager = CatalogPager::new(20, 1, 100);
        assert!(pager.scroll_by(i64::MAX));
        assert_eq!(pager.offset(), 80);
        assert!(pager.scroll_by(i64::MIN));
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn test_grid_catalog_pages_by_row() {
        // 20 rows of 10: 205 entries need 21 rows
        let mut pager = CatalogPager::new(20, 10, 205);
        assert_eq!(pager.max_offset(), 1);
        assert_eq!(pager.page(), 0..200);
        pager.scroll_by(3);
        assert_eq!(pager.page(), 10..205);
    }

    #[test]
    fn test_short_catalog_never_scrolls() {
        let mut pager = CatalogPager::new(20, 1, 7);
        assert_eq!(pager.max_offset(), 0);
        assert!(!pager.scroll_to(4));
        assert_eq!(pager.page(), 0..7);
    }

    #[test]
    fn test_scroll_to_pixel() {
        let mut pager = CatalogPager::new(20, 1, 100);
        let track = ScrollTrack::new(640.0, 64.0);
        assert!(pager.scroll_to_pixel(608.0, track));
        assert_eq!(pager.offset(), 80);
        assert_eq!(pager.handle_position(track), 576.0);
        pager.scroll_to_pixel(0.0, track);
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn test_set_total_reclamps() {
        let mut pager = CatalogPager::new(20, 1, 100);
        pager.scroll_to(80);
        pager.set_total(30);
        assert_eq!(pager.offset(), 10);
        assert_eq!(pager.page(), 10..30);
    }

    #[test]
    fn test_index_at() {
        let mut pager = CatalogPager::new(20, 1, 100);
        pager.scroll_to(10);
        assert_eq!(pager.index_at(ScreenPoint::new(5.0, 70.0), 32.0), Some(12));
        assert_eq!(pager.index_at(ScreenPoint::new(40.0, 70.0), 32.0), None);
        assert_eq!(pager.index_at(ScreenPoint::new(5.0, 700.0), 32.0), None);

        let pager = CatalogPager::new(20, 10, 25);
        assert_eq!(pager.index_at(ScreenPoint::new(70.0, 40.0), 32.0), Some(12));
        assert_eq!(pager.index_at(ScreenPoint::new(200.0, 64.0), 32.0), None);
    }
}

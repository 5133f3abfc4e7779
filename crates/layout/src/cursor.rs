//! Page cursor bookkeeping.
//!
//! The cursor owns the vertical write position and the content-area bounds of
//! the current page. It decides when a page break is needed; allocating the
//! page itself is left to the caller so the cursor stays backend-agnostic.

use crate::LayoutError;
use folio_types::{Margins, PageHandle, Rect, Size};
use log::debug;

/// Slack allowed when comparing a region with the remaining space.
pub const BREAK_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Top-down bounds of the writable area of every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub bottom: f32,
}

impl ContentArea {
    /// # Errors
    ///
    /// Margins that leave no positive width or height are rejected.
    pub fn new(page: Size, margins: &Margins) -> Result<Self, LayoutError> {
        let width = page.width - margins.left - margins.right;
        let height = page.height - margins.top - margins.bottom;
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::EmptyContentArea { width, height });
        }
        Ok(Self {
            left: margins.left,
            top: margins.top,
            width,
            bottom: page.height - margins.bottom,
        })
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height())
    }
}

#[derive(Debug, Clone)]
pub struct PageCursor {
    page_size: Size,
    area: ContentArea,
    page: Option<PageHandle>,
    pages_started: usize,
    y: f32,
}

impl PageCursor {
    pub fn new(page_size: Size, margins: &Margins) -> Result<Self, LayoutError> {
        let area = ContentArea::new(page_size, margins)?;
        Ok(Self {
            page_size,
            area,
            page: None,
            pages_started: 0,
            y: area.top,
        })
    }

    pub fn page(&self) -> Option<PageHandle> {
        self.page
    }

    /// Number of pages this cursor has been placed on.
    pub fn pages_started(&self) -> usize {
        self.pages_started
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn area(&self) -> &ContentArea {
        &self.area
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn remaining_height(&self) -> f32 {
        (self.area.bottom - self.y).max(0.0)
    }

    pub fn is_at_page_top(&self) -> bool {
        (self.y - self.area.top).abs() < BREAK_EPSILON
    }

    pub fn check_fit(&self, height: f32) -> BreakAnalysis {
        let remaining_height = self.remaining_height();
        BreakAnalysis {
            should_break: self.page.is_none() || height > remaining_height + BREAK_EPSILON,
            remaining_height,
        }
    }

    /// Moves the cursor onto a freshly allocated page, at the top margin.
    pub fn start_page(&mut self, page: PageHandle) {
        self.page = Some(page);
        self.pages_started += 1;
        self.y = self.area.top;
    }

    /// Breaks to a new page when `height` does not fit below the cursor.
    ///
    /// Returns whether a page was allocated. A region taller than the whole
    /// content area can never fit and is an error, so a single call allocates
    /// at most one page.
    pub fn ensure_space<F>(&mut self, height: f32, allocate: F) -> Result<bool, LayoutError>
    where
        F: FnOnce(Size) -> PageHandle,
    {
        if !height.is_finite() || height < 0.0 {
            return Err(LayoutError::InvalidHeight(height));
        }
        if height > self.area.height() + BREAK_EPSILON {
            return Err(LayoutError::ElementTooLarge(height, self.area.height()));
        }
        if !self.check_fit(height).should_break {
            return Ok(false);
        }

        let page = allocate(self.page_size);
        debug!(
            "Page break: {:.2}pt needed, {:.2}pt left; continuing on {}",
            height,
            self.remaining_height(),
            page
        );
        self.start_page(page);
        Ok(true)
    }

    /// Advances without a break check. The position saturates at the bottom
    /// boundary, so the next `ensure_space` breaks.
    pub fn advance(&mut self, dy: f32) {
        debug_assert!(dy.is_finite() && dy >= 0.0, "cursor advance must be non-negative");
        self.y = (self.y + dy.max(0.0)).min(self.area.bottom);
        debug_assert!(self.area.top <= self.y && self.y <= self.area.bottom);
    }
}

//! Geometry primitives.
//!
//! Layout code works in a top-down space: `y` grows downwards from the top
//! edge of the page. PDF content streams use a bottom-up space with the
//! origin at the lower-left corner. [`to_page_y`] and [`Rect::to_page_rect`]
//! are the only places where the two meet.

/// Converts a top-down `y` into the bottom-up space of a page of the given height.
pub fn to_page_y(page_height: f32, y_top_down: f32) -> f32 {
    page_height - y_top_down
}

/// A rectangle in top-down coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrinks the rectangle by `padding` on every side. Never produces a negative size.
    pub fn inset(&self, padding: f32) -> Rect {
        Rect {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - 2.0 * padding).max(0.0),
            height: (self.height - 2.0 * padding).max(0.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Converts to a bottom-up [`PageRect`] on a page of the given height.
    pub fn to_page_rect(&self, page_height: f32) -> PageRect {
        PageRect {
            llx: self.x,
            lly: to_page_y(page_height, self.bottom()),
            urx: self.right(),
            ury: to_page_y(page_height, self.y),
        }
    }
}

/// A rectangle in PDF (bottom-up) coordinates, stored as its two corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageRect {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl PageRect {
    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.llx, self.lly, self.urx, self.ury]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0.0 { 1.0 } else { self.width / self.height }
    }
}

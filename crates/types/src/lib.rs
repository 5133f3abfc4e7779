pub mod color;
pub mod geometry;
pub mod ids;
pub mod page;

pub use color::Color;
pub use geometry::{PageRect, Point, Rect, Size, to_page_y};
pub use ids::{AnchorId, LinkUri, PageHandle};
pub use page::{mm, Margins, PageSize};

mod arc_sampling;
mod fan_fill;
pub mod join;
mod line_stroke;
mod path_stroke;
mod polygon_fill;
mod polygon_stroke;
mod ribbon;
mod stroke_style;

pub use fan_fill::{FillRectangle, FillSector, FillTriangle};
pub use join::{EdgeEnd, JoinPoints};
pub use line_stroke::LineStroke;
pub use path_stroke::{PathScratch, StrokePath};
pub use polygon_fill::FillPolygon;
pub use polygon_stroke::StrokePolygon;
pub use stroke_style::{JoinType, StrokeStyle};

pub(crate) use fan_fill::rectangle_corners;

pub mod batch;
pub mod colour;
pub mod drawer;
pub mod error;
pub mod math;
pub mod tessellation;

pub use batch::{
    Batch, BatchConfig, IndexedBatch, IndexedSink, QuadBatch, QuadSink, TextureRegion, Vertex,
};
pub use colour::{Colour, PackedColour};
pub use drawer::{Drawer, DrawerConfig};
pub use error::{Result, StrokisError};
pub use tessellation::{JoinType, StrokeStyle};

pub mod dates;
pub mod engine;
pub mod features;
pub mod geometry;
pub mod layers;
pub mod style;
pub mod view;

pub use dates::DateIndex;
pub use features::*;
pub use geometry::{clip_to_boundary, point_in_ring};
pub use layers::LayerController;
pub use view::{Category, ViewState};

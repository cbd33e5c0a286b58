pub mod model;
pub mod view;

pub use model::{Icon, Timeline, TimelineState};
pub use view::{CairoMeasure, CairoSurface, draw};

/// Pixel size icons are loaded at.
pub const ICON_SIZE: i32 = 24;

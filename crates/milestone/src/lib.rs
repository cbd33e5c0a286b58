//! Layout, render and indicator logic for a vertical timeline of state circles.
//!
//! The crate never draws or schedules anything itself. Hosts implement
//! [`StateSource`] for their data, [`TextMeasure`] and [`Surface`] for text and
//! drawing, and [`DecorationHost`] for the boundary decorations and their timer,
//! then drive a [`StatesView`].

pub mod animation;
pub mod control;
pub mod geometry;
pub mod indicator;
pub mod macros;
pub mod render;
pub mod source;
pub mod style;
pub mod view;

pub use geometry::{LayoutGeometry, Point, Rect, Size};
pub use indicator::{DecorationHost, DecorationView, IndicatorState, RippleView, Timer};
pub use render::{Boundary, DrawOp, RenderPass, Surface, TextMeasure};
pub use source::{IconImage, StateSource};
pub use style::{Color, Font, Style};
pub use view::StatesView;

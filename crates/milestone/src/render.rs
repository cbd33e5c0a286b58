use crate::geometry::{LayoutGeometry, Point, Rect, Size};
use crate::source::{IconImage, StateDescriptor, StateSource, Title};
use crate::style::{Color, Font, Style};

/// Measures how much room a label needs.
pub trait TextMeasure {
    /// Minimal size for `text` set in `font`, wrapped to fit within `max`.
    fn measure(&self, text: &str, font: &Font, max: Size) -> Size;
}

/// Primitive drawing calls a host surface must support, in local coordinates.
pub trait Surface<I> {
    type Error;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), Self::Error>;

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color)
    -> Result<(), Self::Error>;

    fn text(&mut self, text: &str, frame: Rect, font: &Font, color: Color)
    -> Result<(), Self::Error>;

    fn image(&mut self, icon: &I, origin: Point) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp<I> {
    Circle {
        index: usize,
        center: Point,
        radius: f64,
        fill: Color,
        border: Color,
        border_width: f64,
    },
    Icon {
        index: usize,
        icon: I,
        origin: Point,
    },
    Label {
        index: usize,
        text: Title,
        frame: Rect,
        font: Font,
        color: Color,
    },
    /// Line from state `index` down to state `index + 1`.
    Separator {
        index: usize,
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
}

impl<I> DrawOp<I> {
    pub fn index(&self) -> usize {
        match self {
            Self::Circle { index, .. }
            | Self::Icon { index, .. }
            | Self::Label { index, .. }
            | Self::Separator { index, .. } => *index,
        }
    }
}

/// The active state directly followed by an inactive one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub index: usize,
    /// Bounding box of the boundary state's circle.
    pub frame: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass<I> {
    pub ops: Vec<DrawOp<I>>,
    pub boundary: Option<Boundary>,
}

impl<I> RenderPass<I> {
    pub fn empty() -> Self {
        Self {
            ops: Vec::new(),
            boundary: None,
        }
    }
}

/// Width of the widest title once clamped to `max`.
pub fn max_title_width<S, M>(source: &S, count: usize, font: &Font, max: Size, measure: &M) -> f64
where
    S: StateSource,
    M: TextMeasure,
{
    (0..count)
        .filter_map(|i| source.title(i))
        .map(|title| measure.measure(&title, font, max).clamp_to(max).width)
        .fold(0.0, f64::max)
}

/// Walks every state once and turns it into draw instructions.
///
/// Only the first active state followed by an inactive one is reported as the
/// boundary.
pub fn render_states<S, M>(
    source: &S,
    geometry: &LayoutGeometry,
    style: &Style,
    measure: &M,
) -> RenderPass<S::Icon>
where
    S: StateSource,
    M: TextMeasure,
{
    if geometry.is_degenerate() {
        return RenderPass::empty();
    }

    let count = geometry.count;
    let radius = geometry.radius();
    let mut ops = Vec::with_capacity(count * 4);
    let mut boundary = None;

    for index in 0..count {
        let state = StateDescriptor::query(source, index);
        let center = geometry.center(index);
        let is_last = index + 1 == count;
        let next_active = !is_last && source.is_active(index + 1);

        if boundary.is_none() && state.active && !is_last && !next_active {
            boundary = Some(Boundary {
                index,
                frame: geometry.circle_frame(index),
            });
        }

        ops.push(DrawOp::Circle {
            index,
            center,
            radius,
            fill: style.circle_color(state.active),
            border: style.circle_border_color,
            border_width: style.circle_border_width,
        });

        if let Some(icon) = state.icon {
            let size = icon.size();
            ops.push(DrawOp::Icon {
                index,
                origin: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
                icon,
            });
        }

        if let Some(text) = state.title {
            let measured = measure.measure(&text, &style.title_font, geometry.title_max);
            ops.push(DrawOp::Label {
                index,
                frame: geometry.label_frame(index, measured),
                text,
                font: style.title_font.clone(),
                color: style.title_color(state.active),
            });
        }

        if !is_last {
            let (from, to) = geometry.separator(index);
            ops.push(DrawOp::Separator {
                index,
                from,
                to,
                width: style.separator_width,
                color: style.separator_color_for(next_active),
            });
        }
    }

    log::trace!("Rendered {} states into {} ops", count, ops.len());

    RenderPass { ops, boundary }
}

/// Replays draw instructions onto `surface` in order.
pub fn paint<I, S>(ops: &[DrawOp<I>], surface: &mut S) -> Result<(), S::Error>
where
    S: Surface<I>,
{
    for op in ops {
        match op {
            DrawOp::Circle {
                center,
                radius,
                fill,
                border,
                border_width,
                ..
            } => {
                surface.fill_circle(*center, *radius, *fill)?;
                surface.stroke_circle(*center, *radius, *border_width, *border)?;
            }
            DrawOp::Icon { icon, origin, .. } => surface.image(icon, *origin)?,
            DrawOp::Label {
                text,
                frame,
                font,
                color,
                ..
            } => surface.text(text, *frame, font, *color)?,
            DrawOp::Separator {
                from,
                to,
                width,
                color,
                ..
            } => surface.line(*from, *to, *width, *color)?,
        }
    }
    Ok(())
}

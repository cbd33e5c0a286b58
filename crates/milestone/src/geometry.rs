use crate::style::{LayoutMode, Style};

/// Gap between the circle column, its labels and the bounds edges.
pub const MARGIN: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Component-wise minimum, never below zero.
    pub fn clamp_to(self, max: Size) -> Self {
        Self {
            width: self.width.min(max.width).max(0.0),
            height: self.height.min(max.height).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Square bounding box of a circle.
    pub fn around_circle(center: Point, radius: f64) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Shrinks the rect by `amount` on every side.
    pub fn inset(&self, amount: f64) -> Self {
        Self::new(
            self.origin.x + amount,
            self.origin.y + amount,
            self.size.width - 2.0 * amount,
            self.size.height - 2.0 * amount,
        )
    }
}

/// Diameter of every state circle for `count` states stacked in `bounds_height`.
///
/// Returns `0.0` for an empty sequence. The result is not clamped at zero, so
/// bounds too small for the sequence produce a non-positive diameter which
/// callers must treat as "not laid out".
pub fn compute_diameter(
    count: usize,
    bounds_height: f64,
    separator_length: f64,
    margin: f64,
    max_diameter: Option<f64>,
) -> f64 {
    if count == 0 {
        return 0.0;
    }

    let count = count as f64;
    let separators = count - 1.0;
    let available = bounds_height - separators * separator_length - 2.0 * margin;
    let diameter = available / count;

    max_diameter.map_or(diameter, |max| diameter.min(max))
}

/// Horizontal offset that centers `circle + widest title` within the bounds,
/// never closer to the edge than `margin`.
pub fn leading_margin(bounds_width: f64, diameter: f64, max_title_width: f64, margin: f64) -> f64 {
    // |-| (diameter) |-| (widest title) |-|
    let total = bounds_width - (diameter + max_title_width + 3.0 * margin);
    (total / 2.0).max(margin)
}

/// Vertical offset that centers the occupied column within the bounds.
pub fn top_margin(count: usize, bounds_height: f64, diameter: f64, separator_length: f64) -> f64 {
    let separators = count.saturating_sub(1) as f64;
    let occupied = count as f64 * diameter + separators * separator_length;
    (bounds_height - occupied) / 2.0
}

/// Largest box a title label may occupy beside a circle of `diameter`.
pub fn title_max_size(bounds: Size, diameter: f64, margin: f64) -> Size {
    Size::new(
        (bounds.width - (diameter + 3.0 * margin)).max(0.0),
        (diameter - 2.0 * margin).max(0.0),
    )
}

/// Derived sizing of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutGeometry {
    pub count: usize,
    pub diameter: f64,
    pub margin: f64,
    pub separator_length: f64,
    pub leading_offset: f64,
    pub top_offset: f64,
    pub title_max: Size,
}

impl LayoutGeometry {
    /// Lays out `count` states inside `bounds`.
    ///
    /// For [`LayoutMode::Centered`] the widest title is needed before any
    /// center can be placed, so `max_title_width` is called once with the
    /// label constraints for the computed diameter. [`LayoutMode::Leading`]
    /// pins the column to the leading edge and never measures.
    pub fn compute(
        count: usize,
        bounds: Size,
        style: &Style,
        max_title_width: impl FnOnce(Size) -> f64,
    ) -> Self {
        let margin = MARGIN;
        let separator_length = style.separator_length;
        let diameter = compute_diameter(
            count,
            bounds.height,
            separator_length,
            margin,
            style.circle_max_size,
        );
        let title_max = title_max_size(bounds, diameter, margin);

        let (leading_offset, top_offset) = match style.layout {
            _ if count == 0 => (0.0, 0.0),
            LayoutMode::Centered => {
                let widest = max_title_width(title_max);
                (
                    leading_margin(bounds.width, diameter, widest, margin),
                    top_margin(count, bounds.height, diameter, separator_length),
                )
            }
            LayoutMode::Leading => (0.0, margin),
        };

        Self {
            count,
            diameter,
            margin,
            separator_length,
            leading_offset,
            top_offset,
            title_max,
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// True when nothing should be drawn: no states, or bounds too small.
    pub fn is_degenerate(&self) -> bool {
        self.count == 0 || self.diameter <= 0.0
    }

    pub fn center(&self, index: usize) -> Point {
        let radius = self.radius();
        Point::new(
            self.leading_offset + radius + self.margin,
            radius + index as f64 * (self.diameter + self.separator_length) + self.top_offset,
        )
    }

    pub fn circle_frame(&self, index: usize) -> Rect {
        Rect::around_circle(self.center(index), self.radius())
    }

    /// Frame of a label whose measured size is `measured`, vertically
    /// centered on the circle and clamped to the label constraints.
    pub fn label_frame(&self, index: usize, measured: Size) -> Rect {
        let center = self.center(index);
        let size = measured.clamp_to(self.title_max);
        Rect::new(
            center.x + self.radius() + self.margin,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Bottom of circle `index` to the top of circle `index + 1`.
    pub fn separator(&self, index: usize) -> (Point, Point) {
        let center = self.center(index);
        let start = Point::new(center.x, center.y + self.radius());
        let end = Point::new(center.x, start.y + self.separator_length);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_sequence_has_zero_diameter() {
        assert_eq!(compute_diameter(0, 500.0, 10.0, MARGIN, None), 0.0);

        let geometry = LayoutGeometry::compute(0, Size::new(300.0, 500.0), &Style::default(), |_| {
            panic!("empty layout must not measure titles")
        });
        assert_eq!(geometry.diameter, 0.0);
        assert!(geometry.is_degenerate());
    }

    #[test]
    fn test_diameter_fits_within_bounds() {
        let height = 600.0;
        for count in 1..=20 {
            let d = compute_diameter(count, height, 10.0, MARGIN, None);
            let used = count as f64 * d + (count as f64 - 1.0) * 10.0 + 2.0 * MARGIN;
            assert!(used <= height + 1e-9, "count {count} uses {used}");
        }
    }

    #[test]
    fn test_diameter_non_increasing_with_count() {
        let mut previous = f64::INFINITY;
        for count in 1..=30 {
            let d = compute_diameter(count, 480.0, 12.0, MARGIN, Some(90.0));
            assert!(d <= previous);
            previous = d;
        }
    }

    #[test]
    fn test_max_diameter_caps_result() {
        assert_eq!(compute_diameter(1, 1000.0, 10.0, MARGIN, Some(40.0)), 40.0);
        assert!(approx(compute_diameter(1, 116.0, 10.0, MARGIN, None), 100.0));
    }

    #[test]
    fn test_small_bounds_go_negative() {
        let d = compute_diameter(5, 40.0, 10.0, MARGIN, None);
        assert!(d < 0.0);

        let geometry = LayoutGeometry::compute(5, Size::new(200.0, 40.0), &Style::default(), |_| 0.0);
        assert!(geometry.is_degenerate());
    }

    #[test]
    fn test_centered_layout_offsets() {
        // 4 * 80 + 3 * 10 + 2 * 8
        let bounds = Size::new(300.0, 366.0);
        let geometry = LayoutGeometry::compute(4, bounds, &Style::default(), |max| {
            assert!(approx(max.width, 300.0 - (80.0 + 24.0)));
            assert!(approx(max.height, 64.0));
            100.0
        });

        assert!(approx(geometry.diameter, 80.0));
        assert!(approx(geometry.top_offset, 8.0));
        // (300 - (80 + 100 + 24)) / 2
        assert!(approx(geometry.leading_offset, 48.0));

        let c0 = geometry.center(0);
        let c2 = geometry.center(2);
        assert!(approx(c0.x, 48.0 + 40.0 + 8.0));
        assert!(approx(c0.y, 48.0));
        assert!(approx(c2.y, 40.0 + 2.0 * 90.0 + 8.0));
    }

    #[test]
    fn test_leading_margin_floor() {
        assert_eq!(leading_margin(100.0, 80.0, 200.0, MARGIN), MARGIN);
    }

    #[test]
    fn test_leading_layout_is_single_pass() {
        let style = Style {
            layout: LayoutMode::Leading,
            ..Style::default()
        };
        let geometry = LayoutGeometry::compute(2, Size::new(300.0, 126.0), &style, |_| {
            panic!("leading layout must not measure titles")
        });

        assert!(approx(geometry.diameter, 50.0));
        let c1 = geometry.center(1);
        assert!(approx(c1.x, 25.0 + MARGIN));
        assert!(approx(c1.y, 25.0 + 60.0 + MARGIN));
    }

    #[test]
    fn test_label_frame_is_clamped_and_centered() {
        let geometry = LayoutGeometry::compute(1, Size::new(200.0, 116.0), &Style::default(), |_| 0.0);
        let frame = geometry.label_frame(0, Size::new(500.0, 20.0));
        let center = geometry.center(0);

        assert!(approx(frame.size.width, geometry.title_max.width));
        assert!(approx(frame.origin.x, center.x + 50.0 + MARGIN));
        assert!(approx(frame.center().y, center.y));
    }

    #[test]
    fn test_separator_spans_gap() {
        let geometry = LayoutGeometry::compute(3, Size::new(200.0, 300.0), &Style::default(), |_| 0.0);
        let (start, end) = geometry.separator(0);
        let next_top = geometry.circle_frame(1).origin.y;

        assert!(approx(start.y, geometry.circle_frame(0).origin.y + geometry.diameter));
        assert!(approx(end.y, next_top));
    }
}

use super::model::Icon;
use cairo::{Context, FontSlant, Format, ImageSurface};
use gdk4::prelude::*;
use milestone::render::paint;
use milestone::style::{Color, Font, FontWeight};
use milestone::{DrawOp, Point, Rect, Size, Surface, TextMeasure};
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Color) {
    let (r, g, b, a) = color.components();
    cr.set_source_rgba(r, g, b, a);
}

fn select_font(cr: &Context, font: &Font) {
    let weight = match font.weight {
        FontWeight::Normal => cairo::FontWeight::Normal,
        FontWeight::Bold => cairo::FontWeight::Bold,
    };
    cr.select_font_face(font.family.as_str(), FontSlant::Normal, weight);
    cr.set_font_size(font.size);
}

fn advance(cr: &Context, text: &str) -> f64 {
    cr.text_extents(text).map(|e| e.x_advance()).unwrap_or(0.0)
}

/// Greedy word wrap. A single word wider than `max_width` keeps its own line.
fn wrap_lines(cr: &Context, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if current.is_empty() || advance(cr, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draws the pipeline's instructions with cairo.
pub struct CairoSurface<'a> {
    cr: &'a Context,
}

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self { cr }
    }
}

impl Surface<Icon> for CairoSurface<'_> {
    type Error = cairo::Error;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), cairo::Error> {
        set_color(self.cr, color);
        self.cr.new_sub_path();
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.cr.fill()
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        color: Color,
    ) -> Result<(), cairo::Error> {
        set_color(self.cr, color);
        self.cr.set_line_width(width);
        self.cr.new_sub_path();
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.cr.stroke()
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color) -> Result<(), cairo::Error> {
        set_color(self.cr, color);
        self.cr.set_line_width(width);
        self.cr.move_to(from.x, from.y);
        self.cr.line_to(to.x, to.y);
        self.cr.stroke()
    }

    fn text(&mut self, text: &str, frame: Rect, font: &Font, color: Color) -> Result<(), cairo::Error> {
        let cr = self.cr;
        cr.save()?;
        cr.rectangle(frame.origin.x, frame.origin.y, frame.size.width, frame.size.height);
        cr.clip();

        select_font(cr, font);
        set_color(cr, color);
        let extents = cr.font_extents()?;

        for (i, line) in wrap_lines(cr, text, frame.size.width).iter().enumerate() {
            cr.move_to(
                frame.origin.x,
                frame.origin.y + extents.ascent() + i as f64 * extents.height(),
            );
            cr.show_text(line)?;
        }
        cr.restore()
    }

    fn image(&mut self, icon: &Icon, origin: Point) -> Result<(), cairo::Error> {
        self.cr.save()?;
        self.cr.set_source_pixbuf(icon, origin.x, origin.y);
        self.cr.paint()?;
        self.cr.restore()
    }
}

pub fn draw(cr: &Context, ops: &[DrawOp<Icon>]) -> Result<(), cairo::Error> {
    paint(ops, &mut CairoSurface::new(cr))
}

/// Measures labels with cairo's toy text API on a scratch surface.
pub struct CairoMeasure {
    cr: Option<Context>,
}

impl CairoMeasure {
    pub fn new() -> Self {
        let cr = ImageSurface::create(Format::ARgb32, 1, 1)
            .and_then(|surface| Context::new(&surface))
            .map_err(|e| log::error!("Failed to create text measuring context: {}", e))
            .ok();
        Self { cr }
    }
}

impl Default for CairoMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CairoMeasure {
    fn measure(&self, text: &str, font: &Font, max: Size) -> Size {
        let Some(cr) = &self.cr else {
            return Size::default();
        };

        select_font(cr, font);
        let lines = wrap_lines(cr, text, max.width);
        let width = lines
            .iter()
            .map(|line| advance(cr, line))
            .fold(0.0, f64::max);
        let line_height = cr.font_extents().map(|e| e.height()).unwrap_or(0.0);

        Size::new(width, lines.len() as f64 * line_height)
    }
}

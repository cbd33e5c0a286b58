use gtk::prelude::*;
use gtk4 as gtk;
use milestone::animation::{PulseTrain, RIPPLE_LINE_WIDTH, SPINNER_LINE_WIDTH, spinner_arc};
use milestone::style::Color;
use milestone::{DecorationHost, DecorationView, Rect, RippleView, Timer};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug)]
enum Animation {
    Ripple(PulseTrain),
    Spinner,
}

#[derive(Debug)]
struct LayerState {
    frame: Option<Rect>,
    color: Color,
    animation: Animation,
}

impl LayerState {
    /// Drops every live pulse so a re-shown ripple starts clean.
    fn hide(&mut self) {
        if let Animation::Ripple(train) = &mut self.animation {
            train.clear();
        }
    }

    fn pulse(&mut self, now: Duration) {
        if let Animation::Ripple(train) = &mut self.animation {
            // Faded pulses only get pruned while drawing, which stops when hidden.
            train.prune(now);
            train.emit(now);
        }
    }
}

fn set_source(cr: &cairo::Context, color: Color) {
    let (r, g, b, a) = color.components();
    cr.set_source_rgba(r, g, b, a);
}

/// A full-size, click-through drawing layer stacked over the states view.
///
/// Frames are in the states view's coordinates. Visible layers redraw on
/// every frame clock tick.
#[derive(Clone)]
pub struct DecorationLayer {
    area: gtk::DrawingArea,
    state: Rc<RefCell<LayerState>>,
    epoch: Instant,
}

impl DecorationLayer {
    fn new(animation: Animation, color: Color, epoch: Instant) -> Self {
        let area = gtk::DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_can_target(false);
        area.set_visible(false);
        area.add_css_class("milestone-decoration");

        let state = Rc::new(RefCell::new(LayerState {
            frame: None,
            color,
            animation,
        }));

        let draw_state = state.clone();
        area.set_draw_func(move |_, cr, _, _| {
            let now = epoch.elapsed();
            if let Err(e) = draw_layer(cr, &mut draw_state.borrow_mut(), now) {
                log::error!("Decoration drawing error: {}", e);
            }
        });

        area.add_tick_callback(|area, _| {
            if area.is_visible() {
                area.queue_draw();
            }
            glib::ControlFlow::Continue
        });

        Self { area, state, epoch }
    }

    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }
}

fn draw_layer(cr: &cairo::Context, state: &mut LayerState, now: Duration) -> Result<(), cairo::Error> {
    let Some(frame) = state.frame else {
        return Ok(());
    };
    let center = frame.center();
    let radius = frame.size.width / 2.0;
    let color = state.color;

    match &mut state.animation {
        Animation::Ripple(train) => {
            train.prune(now);
            cr.set_line_width(RIPPLE_LINE_WIDTH);
            for pulse in train.frames(now) {
                set_source(cr, color.fade(pulse.opacity));
                cr.new_sub_path();
                cr.arc(center.x, center.y, radius * pulse.scale, 0.0, std::f64::consts::TAU);
                cr.stroke()?;
            }
        }
        Animation::Spinner => {
            let (start, end) = spinner_arc(now);
            set_source(cr, color);
            cr.set_line_width(SPINNER_LINE_WIDTH);
            cr.new_sub_path();
            cr.arc(
                center.x,
                center.y,
                (radius - SPINNER_LINE_WIDTH / 2.0).max(0.0),
                start,
                end,
            );
            cr.stroke()?;
        }
    }
    Ok(())
}

impl DecorationView for DecorationLayer {
    fn set_frame(&self, frame: Rect) {
        self.state.borrow_mut().frame = Some(frame);
        self.area.queue_draw();
    }

    fn set_visible(&self, visible: bool) {
        if !visible {
            self.state.borrow_mut().hide();
        }
        self.area.set_visible(visible);
    }

    fn set_color(&self, color: Color) {
        self.state.borrow_mut().color = color;
    }
}

impl RippleView for DecorationLayer {
    fn emit_pulse(&self) {
        self.state.borrow_mut().pulse(self.epoch.elapsed());
    }
}

/// A glib timeout source on the main context.
pub struct GlibTimer(Option<glib::SourceId>);

impl Timer for GlibTimer {
    fn cancel(&mut self) {
        if let Some(id) = self.0.take() {
            id.remove();
        }
    }
}

/// Attaches decorations to the window's overlay and schedules pulses on the
/// glib main loop.
pub struct GtkHost {
    overlay: Option<gtk::Overlay>,
    epoch: Instant,
}

impl GtkHost {
    pub fn new() -> Self {
        Self {
            overlay: None,
            epoch: Instant::now(),
        }
    }

    pub fn set_overlay(&mut self, overlay: gtk::Overlay) {
        self.overlay = Some(overlay);
    }

    fn attach(&mut self, animation: Animation, color: Color) -> DecorationLayer {
        let layer = DecorationLayer::new(animation, color, self.epoch);
        match &self.overlay {
            Some(overlay) => overlay.add_overlay(layer.widget()),
            None => log::warn!("Decoration attached before the overlay exists"),
        }
        layer
    }
}

impl Default for GtkHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DecorationHost for GtkHost {
    type Ripple = DecorationLayer;
    type Spinner = DecorationLayer;
    type Timer = GlibTimer;

    fn attach_ripple(&mut self, color: Color) -> DecorationLayer {
        log::debug!("Attaching ripple layer");
        self.attach(Animation::Ripple(PulseTrain::default()), color)
    }

    fn attach_spinner(&mut self, color: Color) -> DecorationLayer {
        log::debug!("Attaching spinner layer");
        self.attach(Animation::Spinner, color)
    }

    fn repeat(&mut self, interval: Duration, mut tick: Box<dyn FnMut()>) -> GlibTimer {
        let id = glib::timeout_add_local(interval, move || {
            tick();
            glib::ControlFlow::Continue
        });
        GlibTimer(Some(id))
    }
}

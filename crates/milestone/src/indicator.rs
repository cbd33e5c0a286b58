use crate::animation::RIPPLE_INTERVAL;
use crate::geometry::Rect;
use crate::render::Boundary;
use crate::style::{Color, Style};
use std::time::Duration;

/// A repeating task started through [`DecorationHost::repeat`].
pub trait Timer {
    /// Stops the task. Calling it again is a no-op.
    fn cancel(&mut self);
}

/// A child view owned by the host, positioned in the states view's coordinates.
pub trait DecorationView {
    fn set_frame(&self, frame: Rect);

    fn set_visible(&self, visible: bool);

    fn set_color(&self, color: Color);
}

/// The ripple decoration; cloned into the pulse timer.
pub trait RippleView: DecorationView + Clone + 'static {
    /// Starts one expanding, fading pulse. Pulses are fire-and-forget.
    fn emit_pulse(&self);
}

/// Services the host provides to attach decorations and schedule work.
pub trait DecorationHost {
    type Ripple: RippleView;
    type Spinner: DecorationView;
    type Timer: Timer;

    fn attach_ripple(&mut self, color: Color) -> Self::Ripple;

    fn attach_spinner(&mut self, color: Color) -> Self::Spinner;

    fn repeat(&mut self, interval: Duration, tick: Box<dyn FnMut()>) -> Self::Timer;
}

/// Which decoration is currently shown, and where.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IndicatorState {
    #[default]
    Idle,
    Ripple(Rect),
    Spinner(Rect),
}

/// Owns the two boundary decorations and the ripple's pulse timer.
///
/// Views are attached on first use and only hidden afterwards. The pulse
/// timer is cancelled whenever the ripple stops showing, on [`clear`] and
/// when the indicator is dropped.
///
/// [`clear`]: Indicator::clear
pub struct Indicator<H: DecorationHost> {
    host: H,
    ripple: Option<H::Ripple>,
    spinner: Option<H::Spinner>,
    pulse_timer: Option<H::Timer>,
    state: IndicatorState,
}

impl<H: DecorationHost> Indicator<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            ripple: None,
            spinner: None,
            pulse_timer: None,
            state: IndicatorState::Idle,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse_timer.is_some()
    }

    /// Applies the boundary found by a render pass.
    pub fn update(&mut self, boundary: Option<Boundary>, style: &Style, margin: f64) {
        let next = match boundary {
            None => IndicatorState::Idle,
            Some(b) if style.activity_index == Some(b.index) => {
                IndicatorState::Spinner(b.frame.inset(margin / 2.0))
            }
            Some(b) => IndicatorState::Ripple(b.frame),
        };

        if next != self.state {
            log::debug!("Indicator {:?} -> {:?}", self.state, next);
        }

        match next {
            IndicatorState::Idle => self.clear(),
            IndicatorState::Ripple(frame) => {
                self.hide_spinner();
                self.show_ripple(frame, style.circle_active_color);
            }
            IndicatorState::Spinner(frame) => {
                self.hide_ripple();
                self.show_spinner(frame, style.activity_indicator_color);
            }
        }
        self.state = next;
    }

    /// Hides both decorations and cancels the pulse timer.
    pub fn clear(&mut self) {
        self.hide_ripple();
        self.hide_spinner();
        self.state = IndicatorState::Idle;
    }

    fn show_ripple(&mut self, frame: Rect, color: Color) {
        let host = &mut self.host;
        let ripple = self
            .ripple
            .get_or_insert_with(|| host.attach_ripple(color));
        ripple.set_color(color);
        ripple.set_frame(frame);
        ripple.set_visible(true);

        if self.pulse_timer.is_none() {
            let view = ripple.clone();
            self.pulse_timer = Some(
                self.host
                    .repeat(RIPPLE_INTERVAL, Box::new(move || view.emit_pulse())),
            );
        }
    }

    fn hide_ripple(&mut self) {
        if let Some(mut timer) = self.pulse_timer.take() {
            timer.cancel();
        }
        if let Some(ripple) = &self.ripple {
            ripple.set_visible(false);
        }
    }

    fn show_spinner(&mut self, frame: Rect, color: Color) {
        let host = &mut self.host;
        let spinner = self
            .spinner
            .get_or_insert_with(|| host.attach_spinner(color));
        spinner.set_color(color);
        spinner.set_frame(frame);
        spinner.set_visible(true);
    }

    fn hide_spinner(&mut self) {
        if let Some(spinner) = &self.spinner {
            spinner.set_visible(false);
        }
    }
}

impl<H: DecorationHost> Drop for Indicator<H> {
    fn drop(&mut self) {
        if let Some(mut timer) = self.pulse_timer.take() {
            timer.cancel();
        }
    }
}

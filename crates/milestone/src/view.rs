use crate::geometry::{LayoutGeometry, Size};
use crate::indicator::{DecorationHost, Indicator, IndicatorState};
use crate::render::{self, RenderPass, TextMeasure};
use crate::source::{StateSequence, StateSource};
use crate::style::Style;

/// A vertical column of state circles with a live indicator on the boundary.
///
/// The host drives it with three kinds of events: bounds changes
/// ([`set_bounds`]), render requests ([`render`]) and data reloads
/// ([`reload`]). Rendering produces draw instructions and updates the boundary
/// decoration; painting those instructions is left to the host.
///
/// [`set_bounds`]: StatesView::set_bounds
/// [`render`]: StatesView::render
/// [`reload`]: StatesView::reload
pub struct StatesView<S: StateSource, H: DecorationHost> {
    source: Option<S>,
    style: Style,
    bounds: Size,
    sequence: StateSequence,
    geometry: LayoutGeometry,
    needs_layout: bool,
    indicator: Indicator<H>,
}

impl<S: StateSource, H: DecorationHost> StatesView<S, H> {
    pub fn new(style: Style, host: H) -> Self {
        Self {
            source: None,
            style,
            bounds: Size::default(),
            sequence: StateSequence::default(),
            geometry: LayoutGeometry::default(),
            needs_layout: true,
            indicator: Indicator::new(host),
        }
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mutable access for hosts that edit their source in place. Call
    /// [`reload`](Self::reload) if the number of states changes.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Replaces the data source and reloads.
    pub fn set_source(&mut self, source: S) {
        self.source = Some(source);
        self.reload();
    }

    pub fn clear_source(&mut self) -> Option<S> {
        let source = self.source.take();
        self.reload();
        source
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        if self.style.affects_layout(&style) {
            self.needs_layout = true;
        }
        self.style = style;
    }

    /// Chooses the state that shows the spinner when it is the boundary.
    pub fn set_activity_index(&mut self, index: Option<usize>) {
        self.style.activity_index = index;
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn generation(&self) -> u64 {
        self.sequence.generation()
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.indicator.state()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.indicator.host_mut()
    }

    /// Records new bounds and lays out again if they changed.
    pub fn set_bounds<M: TextMeasure>(&mut self, bounds: Size, measure: &M) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }
        if self.needs_layout {
            self.layout(measure);
        }
    }

    /// Recomputes the diameter and offsets for the current bounds and count.
    pub fn layout<M: TextMeasure>(&mut self, measure: &M) {
        let count = self.sequence.count(&self.source);
        let source = &self.source;
        let font = &self.style.title_font;

        self.geometry = LayoutGeometry::compute(count, self.bounds, &self.style, |max| {
            render::max_title_width(source, count, font, max, measure)
        });
        self.needs_layout = false;

        log::debug!(
            "Laid out {} states in {}x{}: diameter {:.1}",
            count,
            self.bounds.width,
            self.bounds.height,
            self.geometry.diameter
        );
    }

    /// Produces this pass's draw instructions and moves the indicator to the
    /// boundary it found.
    pub fn render<M: TextMeasure>(&mut self, measure: &M) -> RenderPass<S::Icon> {
        if self.needs_layout {
            self.layout(measure);
        }

        let pass = render::render_states(&self.source, &self.geometry, &self.style, measure);
        self.indicator
            .update(pass.boundary, &self.style, self.geometry.margin);
        pass
    }

    /// Forgets the cached count and resets both decorations. The next
    /// [`render`](Self::render) lays out again.
    pub fn reload(&mut self) {
        self.sequence.invalidate();
        self.indicator.clear();
        self.needs_layout = true;
        log::debug!("Reloaded, generation {}", self.sequence.generation());
    }

    /// Stops all decoration work before the host view goes away.
    pub fn teardown(&mut self) {
        self.indicator.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MARGIN, Rect};
    use crate::indicator::tests::{Event, FakeHost};
    use crate::render::tests::FixedMeasure;
    use crate::source::tests::VecSource;

    fn bounds_for(count: usize, diameter: f64) -> Size {
        let n = count as f64;
        Size::new(320.0, n * diameter + (n - 1.0) * 10.0 + 2.0 * MARGIN)
    }

    fn view(flags: &[bool]) -> (StatesView<VecSource, FakeHost>, FakeHost) {
        let host = FakeHost::default();
        let mut view = StatesView::new(Style::default(), host.clone());
        view.set_source(VecSource::new(flags));
        view.set_bounds(bounds_for(flags.len(), 80.0), &FixedMeasure);
        (view, host)
    }

    #[test]
    fn test_absent_source_renders_nothing() {
        let host = FakeHost::default();
        let mut view: StatesView<VecSource, FakeHost> = StatesView::new(Style::default(), host);
        view.set_bounds(Size::new(300.0, 400.0), &FixedMeasure);

        let pass = view.render(&FixedMeasure);
        assert_eq!(view.geometry().diameter, 0.0);
        assert!(pass.ops.is_empty());
        assert_eq!(view.indicator_state(), IndicatorState::Idle);
    }

    #[test]
    fn test_ripple_attached_at_boundary_frame() {
        let (mut view, host) = view(&[true, true, true, false]);
        let pass = view.render(&FixedMeasure);

        let frame = view.geometry().circle_frame(2);
        assert_eq!(pass.boundary.map(|b| b.index), Some(2));
        assert_eq!(view.indicator_state(), IndicatorState::Ripple(frame));
        assert!(host.events().contains(&Event::Frame("ripple", frame)));
        assert_eq!(host.running_timers(), 1);
    }

    #[test]
    fn test_count_queried_once_per_generation() {
        let (mut view, _host) = view(&[true, false]);
        view.render(&FixedMeasure);
        view.render(&FixedMeasure);
        view.set_bounds(Size::new(200.0, 300.0), &FixedMeasure);
        assert_eq!(view.source().map(|s| s.count_queries.get()), Some(1));

        view.reload();
        view.render(&FixedMeasure);
        assert_eq!(view.source().map(|s| s.count_queries.get()), Some(2));
    }

    #[test]
    fn test_reload_hides_and_cancels() {
        let (mut view, host) = view(&[true, false, false]);
        view.render(&FixedMeasure);
        assert_eq!(host.running_timers(), 1);

        let generation = view.generation();
        view.reload();

        assert_eq!(view.generation(), generation + 1);
        assert_eq!(view.indicator_state(), IndicatorState::Idle);
        assert_eq!(host.running_timers(), 0);
        assert_eq!(host.events().last(), Some(&Event::Visible("ripple", false)));
    }

    #[test]
    fn test_reload_from_spinner() {
        let (mut view, host) = view(&[true, false]);
        view.set_activity_index(Some(0));
        view.render(&FixedMeasure);
        assert!(matches!(view.indicator_state(), IndicatorState::Spinner(_)));

        host.clear_log();
        view.reload();
        assert!(host.events().contains(&Event::Visible("spinner", false)));
        assert_eq!(host.running_timers(), 0);
    }

    #[test]
    fn test_override_toggles_within_one_pass() {
        let (mut view, host) = view(&[true, true, false]);
        view.render(&FixedMeasure);
        assert!(matches!(view.indicator_state(), IndicatorState::Ripple(_)));

        view.set_activity_index(Some(1));
        view.render(&FixedMeasure);
        let inset = view.geometry().circle_frame(1).inset(MARGIN / 2.0);
        assert_eq!(view.indicator_state(), IndicatorState::Spinner(inset));
        assert_eq!(host.running_timers(), 0);

        view.set_activity_index(None);
        view.render(&FixedMeasure);
        assert!(matches!(view.indicator_state(), IndicatorState::Ripple(_)));
        assert_eq!(host.running_timers(), 1);
    }

    #[test]
    fn test_changed_flags_move_indicator() {
        let (mut view, host) = view(&[true, false, false]);
        view.render(&FixedMeasure);

        if let Some(source) = view.source_mut() {
            source.flags[1] = true;
        }
        view.render(&FixedMeasure);

        let frame = view.geometry().circle_frame(1);
        assert_eq!(view.indicator_state(), IndicatorState::Ripple(frame));
        assert_eq!(host.running_timers(), 1);

        if let Some(source) = view.source_mut() {
            source.flags = vec![true, true, true];
        }
        view.render(&FixedMeasure);
        assert_eq!(view.indicator_state(), IndicatorState::Idle);
        assert_eq!(host.running_timers(), 0);
    }

    #[test]
    fn test_degenerate_bounds_skip_drawing() {
        let (mut view, host) = view(&[true, false]);
        view.set_bounds(Size::new(100.0, 20.0), &FixedMeasure);

        let pass = view.render(&FixedMeasure);
        assert!(pass.ops.is_empty());
        assert_eq!(view.indicator_state(), IndicatorState::Idle);
        assert_eq!(host.running_timers(), 0);
    }

    #[test]
    fn test_style_change_relays_out() {
        let (mut view, _host) = view(&[true, false]);
        view.render(&FixedMeasure);
        assert!((view.geometry().diameter - 80.0).abs() < 1e-9);

        view.set_style(Style {
            circle_max_size: Some(30.0),
            ..Style::default()
        });
        view.render(&FixedMeasure);
        assert_eq!(view.geometry().diameter, 30.0);
        assert_eq!(
            view.geometry().circle_frame(0).size,
            Rect::new(0.0, 0.0, 30.0, 30.0).size
        );
    }

    #[test]
    fn test_teardown_cancels_timer() {
        let (mut view, host) = view(&[true, false]);
        view.render(&FixedMeasure);
        view.teardown();
        assert_eq!(host.running_timers(), 0);

        view.render(&FixedMeasure);
        drop(view);
        assert_eq!(host.running_timers(), 0);
    }
}

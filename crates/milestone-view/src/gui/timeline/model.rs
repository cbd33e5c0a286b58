use super::ICON_SIZE;
use crate::config::{Config, StateConfig};
use crate::icon::{self, IconName};
use derive_more::{Deref, From};
use gdk_pixbuf::Pixbuf;
use milestone::source::find_boundary;
use milestone::{IconImage, Size, StateSource};

#[derive(Debug, Clone, Deref, From)]
pub struct Icon(Pixbuf);

impl IconImage for Icon {
    fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelineState {
    pub title: Option<String>,
    pub active: bool,
    pub icon_active: Option<Icon>,
    pub icon_inactive: Option<Icon>,
}

impl TimelineState {
    pub fn new(title: impl Into<String>, active: bool) -> Self {
        Self {
            title: Some(title.into()),
            active,
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &StateConfig) -> Self {
        Self {
            title: cfg.title.clone(),
            active: cfg.active,
            icon_active: cfg.icon_active.as_ref().and_then(Self::load_icon),
            icon_inactive: cfg.icon_inactive.as_ref().and_then(Self::load_icon),
        }
    }

    fn load_icon(name: &IconName) -> Option<Icon> {
        let path = icon::find_icon_path(name, ICON_SIZE as u16)?;
        Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
            .map(Icon)
            .map_err(|e| log::warn!("Failed to load icon '{}': {}", name, e))
            .ok()
    }
}

/// The daemon's data source: the configured states and their current flags.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    states: Vec<TimelineState>,
}

impl Timeline {
    pub fn new(states: Vec<TimelineState>) -> Self {
        Self { states }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .states
                .iter()
                .map(TimelineState::from_config)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Activates the first inactive state. Returns false when all are active.
    pub fn advance(&mut self) -> bool {
        match self.states.iter_mut().find(|s| !s.active) {
            Some(state) => {
                state.active = true;
                true
            }
            None => false,
        }
    }

    /// Deactivates the last active state. Returns false when none is active.
    pub fn retreat(&mut self) -> bool {
        match self.states.iter_mut().rev().find(|s| s.active) {
            Some(state) => {
                state.active = false;
                true
            }
            None => false,
        }
    }

    pub fn boundary(&self) -> Option<usize> {
        find_boundary(self, self.len())
    }
}

impl StateSource for Timeline {
    type Icon = Icon;

    fn count(&self) -> usize {
        self.states.len()
    }

    fn is_active(&self, index: usize) -> bool {
        self.states.get(index).is_some_and(|s| s.active)
    }

    fn title(&self, index: usize) -> Option<String> {
        self.states.get(index).and_then(|s| s.title.clone())
    }

    fn icon(&self, index: usize, active: bool) -> Option<Icon> {
        let state = self.states.get(index)?;
        if active {
            state.icon_active.clone()
        } else {
            state.icon_inactive.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(flags: &[bool]) -> Timeline {
        Timeline::new(
            flags
                .iter()
                .enumerate()
                .map(|(i, &active)| TimelineState::new(format!("Step {i}"), active))
                .collect(),
        )
    }

    fn flags(timeline: &Timeline) -> Vec<bool> {
        (0..timeline.len()).map(|i| timeline.is_active(i)).collect()
    }

    #[test]
    fn test_advance_activates_next() {
        let mut t = timeline(&[true, false, false]);
        assert!(t.advance());
        assert_eq!(flags(&t), vec![true, true, false]);
        assert_eq!(t.boundary(), Some(1));

        assert!(t.advance());
        assert!(!t.advance());
        assert_eq!(t.boundary(), None);
    }

    #[test]
    fn test_retreat_deactivates_last() {
        let mut t = timeline(&[true, true, false]);
        assert!(t.retreat());
        assert_eq!(flags(&t), vec![true, false, false]);
        assert!(t.retreat());
        assert!(!t.retreat());
    }

    #[test]
    fn test_source_accessors() {
        let t = timeline(&[true, false]);
        assert_eq!(t.count(), 2);
        assert_eq!(t.title(1).as_deref(), Some("Step 1"));
        assert_eq!(t.title(5), None);
        assert!(!t.is_active(5));
        assert!(t.icon(0, true).is_none());
    }

    #[test]
    fn test_from_config_without_icons() {
        let config = crate::config::parse_config(
            r#"
            [[states]]
            title = "Ordered"
            active = true

            [[states]]
            title = "Shipped"
            "#,
        )
        .unwrap();

        let t = Timeline::from_config(&config);
        assert_eq!(t.len(), 2);
        assert_eq!(t.boundary(), Some(0));
    }
}

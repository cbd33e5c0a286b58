use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::indicator::GtkHost;
use crate::gui::theme;
use crate::gui::timeline::{self, CairoMeasure, Icon, Timeline};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use milestone::{DrawOp, Size, StatesView};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub states: StatesView<Timeline, GtkHost>,
    /// Instructions from the last render pass, replayed by the draw func.
    pub ops: Rc<RefCell<Vec<DrawOp<Icon>>>>,
    pub measure: CairoMeasure,
    pub visible: bool,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Resize(i32, i32),
    Reload,
    Advance,
    Retreat,
    Spin(Option<usize>),
    Unspin,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Reload => AppMsg::Reload,
            AppEvent::Advance => AppMsg::Advance,
            AppEvent::Retreat => AppMsg::Retreat,
            AppEvent::Spin(index) => AppMsg::Spin(index),
            AppEvent::Unspin => AppMsg::Unspin,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Milestone"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "milestone-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "milestone-states",

                    connect_resize[sender] => move |_, width, height| {
                        sender.input(AppMsg::Resize(width, height));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let mut states = StatesView::new(config.style.clone(), GtkHost::new());
        states.set_source(Timeline::from_config(&config));

        let model = AppModel {
            states,
            ops: Rc::default(),
            measure: CairoMeasure::new(),
            visible: false,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model
            .states
            .host_mut()
            .set_overlay(widgets.overlay.clone());

        let ops_draw = model.ops.clone();
        widgets.drawing_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = timeline::draw(cr, &ops_draw.borrow()) {
                log::error!("Drawing error: {}", e);
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
                self.refresh();
            }
            AppMsg::Hide => {
                self.visible = false;
                self.states.teardown();
            }
            AppMsg::Resize(width, height) => {
                self.states
                    .set_bounds(Size::new(width as f64, height as f64), &self.measure);
                self.refresh();
            }
            AppMsg::Reload => {
                self.states.reload();
                self.refresh();
            }
            AppMsg::Advance => {
                if self.states.source_mut().is_some_and(Timeline::advance) {
                    self.refresh();
                }
            }
            AppMsg::Retreat => {
                if self.states.source_mut().is_some_and(Timeline::retreat) {
                    self.refresh();
                }
            }
            AppMsg::Spin(index) => {
                let index = index.or_else(|| self.states.source().and_then(Timeline::boundary));
                log::debug!("Activity override set to {:?}", index);
                self.states.set_activity_index(index);
                self.refresh();
            }
            AppMsg::Unspin => {
                self.states.set_activity_index(None);
                self.refresh();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.apply_config(&new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.states.teardown();
    }
}

impl AppModel {
    /// Runs a render pass and schedules a repaint with its instructions.
    fn refresh(&mut self) {
        if !self.visible {
            return;
        }
        let pass = self.states.render(&self.measure);
        *self.ops.borrow_mut() = pass.ops;
        self.drawing_area.queue_draw();
    }

    fn apply_config(&mut self, config: &Config) {
        let current = self.states.style().activity_index;
        self.states.set_style(config.style_with_override(current));
        self.states.set_source(Timeline::from_config(config));
        self.refresh();
    }
}

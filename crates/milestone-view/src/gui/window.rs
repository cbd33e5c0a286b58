use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

/// Width of the timeline panel.
pub const PANEL_WIDTH: i32 = 320;
/// Height used when the compositor does not support layer shell.
pub const FALLBACK_HEIGHT: i32 = 480;

/// Docks the window as a panel along the right edge of the output.
///
/// Falls back to a plain undecorated window when layer shell is unavailable.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.set_default_size(PANEL_WIDTH, FALLBACK_HEIGHT);

    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell not supported, using a regular window");
        return;
    }

    window.init_layer_shell();
    window.set_layer(Layer::Top);
    window.set_namespace(Some("milestone"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
}

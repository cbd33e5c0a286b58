use gtk::gdk;
use gtk4 as gtk;

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.milestone-window {
    background-color: rgba(255, 255, 255, 0.92);
}
.milestone-states, .milestone-decoration {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

use milestone_view::config;
use milestone_view::gui::app::AppModel;
use milestone_view::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.milestone");

    app.run::<AppModel>((config, rx));
}

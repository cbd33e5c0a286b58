use milestone::control::Command;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Reload,
    Advance,
    Retreat,
    Spin(Option<usize>),
    Unspin,
    ConfigReload,
}

impl From<Command> for AppEvent {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Show => AppEvent::Show,
            Command::Hide => AppEvent::Hide,
            Command::Reload => AppEvent::Reload,
            Command::Advance => AppEvent::Advance,
            Command::Retreat => AppEvent::Retreat,
            Command::Spin(index) => AppEvent::Spin(index),
            Command::Unspin => AppEvent::Unspin,
        }
    }
}

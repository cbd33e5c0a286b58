use clap::{Parser, Subcommand};
use milestone::control::{Command, SOCKET_PATH};
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "milestone", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the timeline window
    Show,
    /// Hide the timeline window
    Hide,
    /// Re-read the state list and restart the indicator
    Reload,
    /// Activate the next state
    Advance,
    /// Deactivate the last active state
    Retreat,
    /// Show the activity spinner instead of the ripple
    Spin {
        /// State index to spin on (defaults to the current boundary)
        index: Option<usize>,
    },
    /// Go back to the ripple
    Unspin,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Show => Command::Show,
            Commands::Hide => Command::Hide,
            Commands::Reload => Command::Reload,
            Commands::Advance => Command::Advance,
            Commands::Retreat => Command::Retreat,
            Commands::Spin { index } => Command::Spin(index),
            Commands::Unspin => Command::Unspin,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    send_command(Command::from(cli.command))
}

fn send_command(cmd: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to milestone daemon at {}: {}. Is milestone-view running?",
            SOCKET_PATH,
            e
        )
    })?;

    log::debug!("Sending '{}'", cmd);
    writeln!(stream, "{}", cmd)?;
    Ok(())
}

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/milestone.sock";

/// One line of the daemon's control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show,
    Hide,
    Reload,
    /// Activate the first inactive state.
    Advance,
    /// Deactivate the last active state.
    Retreat,
    /// Show the spinner on `index`, or on the current boundary when absent.
    Spin(Option<usize>),
    Unspin,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Invalid state index '{0}'")]
    Index(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ParseCommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "show" => Command::Show,
            "hide" => Command::Hide,
            "reload" => Command::Reload,
            "advance" => Command::Advance,
            "retreat" => Command::Retreat,
            "unspin" => Command::Unspin,
            "spin" => Command::Spin(
                words
                    .next()
                    .map(|arg| {
                        arg.parse()
                            .map_err(|_| ParseCommandError::Index(arg.to_string()))
                    })
                    .transpose()?,
            ),
            _ => return Err(ParseCommandError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Show => write!(f, "show"),
            Command::Hide => write!(f, "hide"),
            Command::Reload => write!(f, "reload"),
            Command::Advance => write!(f, "advance"),
            Command::Retreat => write!(f, "retreat"),
            Command::Spin(Some(index)) => write!(f, "spin {index}"),
            Command::Spin(None) => write!(f, "spin"),
            Command::Unspin => write!(f, "unspin"),
        }
    }
}

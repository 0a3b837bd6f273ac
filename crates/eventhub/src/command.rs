//! Shell command parsing

use eventhub_api::Route;
use eventhub_util::EventId;
use std::str::FromStr;
use thiserror::Error;

/// One line of user input
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Navigate to a path such as `/events/3`
    Go(Route),
    /// Shortcut for `go /events/<id>`
    Open(EventId),
    Login {
        email: String,
        password: String,
    },
    Signup {
        email: String,
        password: String,
        confirm_password: String,
    },
    /// Switch the auth form between sign-in and sign-up
    Toggle,
    Logout,
    /// Print the current session
    Status,
    /// Invalidate the current session at the provider
    Revoke,
    /// Redraw the current view
    Show,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Command::Show);
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("help" | "?", []) => Command::Help,
            ("go", [path]) => Command::Go(Route::parse(path)),
            ("go", _) => return Err(CommandError::Usage("go <path>")),
            ("home", []) => Command::Go(Route::Landing),
            ("auth", []) => Command::Go(Route::Auth),
            ("events", []) => Command::Go(Route::Events),
            ("open", [id]) => Command::Open(EventId::new(*id)),
            ("open", _) => return Err(CommandError::Usage("open <event-id>")),
            ("login", [email, password]) => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("login", _) => return Err(CommandError::Usage("login <email> <password>")),
            ("signup", [email, password, confirm]) => Command::Signup {
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm.to_string(),
            },
            ("signup", _) => {
                return Err(CommandError::Usage("signup <email> <password> <confirm-password>"));
            }
            ("toggle", []) => Command::Toggle,
            ("logout", []) => Command::Logout,
            ("status" | "whoami", []) => Command::Status,
            ("revoke", []) => Command::Revoke,
            ("show" | "refresh", []) => Command::Show,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };

        Ok(command)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Login { email, .. } => write!(f, "Login({})", email),
            Command::Signup { email, .. } => write!(f, "Signup({})", email),
            Command::Help => write!(f, "Help"),
            Command::Go(route) => write!(f, "Go({})", route),
            Command::Open(id) => write!(f, "Open({})", id),
            Command::Toggle => write!(f, "Toggle"),
            Command::Logout => write!(f, "Logout"),
            Command::Status => write!(f, "Status"),
            Command::Revoke => write!(f, "Revoke"),
            Command::Show => write!(f, "Show"),
            Command::Quit => write!(f, "Quit"),
        }
    }
}

pub const HELP: &str = "\
Commands:
  home | auth | events            go to a view
  go <path>                       go to a path, e.g. /events/3
  open <event-id>                 show one event
  login <email> <password>        sign in
  signup <email> <pw> <confirm>   create an account
  toggle                          switch the auth form between sign in and sign up
  logout                          sign out
  status                          show who is signed in
  revoke                          invalidate the current session
  show                            redraw the current view
  quit                            exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_navigation() {
        assert_eq!("events".parse(), Ok(Command::Go(Route::Events)));
        assert_eq!("go /events/3".parse(), Ok(Command::Go(Route::event_details("3"))));
        assert_eq!("open 4".parse(), Ok(Command::Open(EventId::new("4"))));
        assert_eq!("".parse(), Ok(Command::Show));
        assert_eq!("toggle".parse(), Ok(Command::Toggle));
    }

    #[test]
    fn parse_credentials() {
        assert_eq!(
            "login a@b.com secret1".parse(),
            Ok(Command::Login {
                email: "a@b.com".into(),
                password: "secret1".into()
            })
        );
        assert_eq!(
            "signup a@b.com secret1".parse::<Command>(),
            Err(CommandError::Usage("signup <email> <password> <confirm-password>"))
        );
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".into()))
        );
    }

    #[test]
    fn debug_hides_passwords() {
        let cmd: Command = "login a@b.com hunter22".parse().unwrap();
        assert!(!format!("{:?}", cmd).contains("hunter22"));
    }
}

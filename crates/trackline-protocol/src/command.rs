//! Outbound commands and their wire lines.
//!
//! A command line is the action name followed by its space-separated
//! arguments, e.g. `ClaimRoute Denver Omaha Purple`. Enum arguments use
//! their canonical names and booleans are written in lowercase.

use std::fmt;
use std::str::FromStr;

use crate::{ActionKind, ClientType, Destination, PassengerCarColor, PlayerColor, ProtocolError};

/// Where a passenger car is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarSource {
    /// The top of the hidden pile.
    Hidden,
    /// The open card of the given colour.
    Open(PassengerCarColor),
}

/// An action a client can send to the server.
///
/// Boolean arguments are rendered as lowercase `true`/`false`; the server
/// must accept them case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join {
        name: String,
        client_type: ClientType,
        /// Seat colour to ask for; `None` lets the server choose.
        preferred_color: PlayerColor,
    },
    DrawPassengerCar(CarSource),
    DrawDestinationTickets,
    /// Keep (`true`) or return (`false`) each of the three offered tickets.
    ClaimDestinationTickets { keep: [bool; 3] },
    ClaimRoute {
        from: Destination,
        to: Destination,
        color: PassengerCarColor,
    },
    BoardState,
    ListAllRoutes,
}

impl Command {
    /// The action kind whose response answers this command.
    pub fn action(&self) -> ActionKind {
        match self {
            Self::Join { .. } => ActionKind::Join,
            Self::DrawPassengerCar(_) => ActionKind::DrawPassengerCars,
            Self::DrawDestinationTickets => ActionKind::DrawDestinationTickets,
            Self::ClaimDestinationTickets { .. } => ActionKind::ClaimDestinationTickets,
            Self::ClaimRoute { .. } => ActionKind::ClaimRoute,
            Self::BoardState => ActionKind::BoardState,
            Self::ListAllRoutes => ActionKind::ListAllRoutes,
        }
    }

    /// Checks that the command can be written as a single wire line.
    ///
    /// Arguments are separated by spaces, so a player name must be
    /// non-empty and contain no whitespace.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if let Self::Join { name, .. } = self {
            if name.is_empty() {
                return Err(ProtocolError::InvalidMessage(
                    "player name must not be empty".into(),
                ));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(ProtocolError::InvalidMessage(format!(
                    "player name `{name}` contains whitespace"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action())?;
        match self {
            Self::Join {
                name,
                client_type,
                preferred_color,
            } => {
                write!(f, " {name} {client_type}")?;
                if preferred_color.is_player() {
                    write!(f, " {preferred_color}")?;
                }
                Ok(())
            }
            Self::DrawPassengerCar(CarSource::Hidden) => f.write_str(" true"),
            Self::DrawPassengerCar(CarSource::Open(color)) => write!(f, " false {color}"),
            Self::ClaimDestinationTickets { keep: [a, b, c] } => write!(f, " {a} {b} {c}"),
            Self::ClaimRoute { from, to, color } => write!(f, " {from} {to} {color}"),
            Self::DrawDestinationTickets | Self::BoardState | Self::ListAllRoutes => Ok(()),
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = line.split_whitespace();
        let name = args
            .next()
            .ok_or_else(|| ProtocolError::InvalidCommand("empty command line".into()))?;
        let action: ActionKind = parse_arg(Some(name), "action")?;

        let command = match action {
            ActionKind::Join => {
                let name = args
                    .next()
                    .ok_or_else(|| missing("player name"))?
                    .to_owned();
                let client_type = parse_arg(args.next(), "client type")?;
                let preferred_color = match args.next() {
                    Some(color) => parse_arg(Some(color), "player colour")?,
                    None => PlayerColor::None,
                };
                Self::Join {
                    name,
                    client_type,
                    preferred_color,
                }
            }
            ActionKind::DrawPassengerCars => {
                if parse_bool(args.next(), "hidden deck flag")? {
                    Self::DrawPassengerCar(CarSource::Hidden)
                } else {
                    Self::DrawPassengerCar(CarSource::Open(parse_arg(args.next(), "card colour")?))
                }
            }
            ActionKind::DrawDestinationTickets => Self::DrawDestinationTickets,
            ActionKind::ClaimDestinationTickets => Self::ClaimDestinationTickets {
                keep: [
                    parse_bool(args.next(), "first ticket flag")?,
                    parse_bool(args.next(), "second ticket flag")?,
                    parse_bool(args.next(), "third ticket flag")?,
                ],
            },
            ActionKind::ClaimRoute => Self::ClaimRoute {
                from: parse_arg(args.next(), "first destination")?,
                to: parse_arg(args.next(), "second destination")?,
                color: parse_arg(args.next(), "route colour")?,
            },
            ActionKind::BoardState => Self::BoardState,
            ActionKind::ListAllRoutes => Self::ListAllRoutes,
            ActionKind::Turn | ActionKind::FinalScore => {
                return Err(ProtocolError::InvalidCommand(format!(
                    "`{action}` is not a client command"
                )));
            }
        };

        if let Some(extra) = args.next() {
            return Err(ProtocolError::InvalidCommand(format!(
                "unexpected argument `{extra}` for {action}"
            )));
        }
        Ok(command)
    }
}

fn missing(what: &str) -> ProtocolError {
    ProtocolError::InvalidCommand(format!("missing {what}"))
}

fn parse_arg<T: FromStr>(token: Option<&str>, what: &str) -> Result<T, ProtocolError> {
    let token = token.ok_or_else(|| missing(what))?;
    token
        .parse()
        .map_err(|_| ProtocolError::InvalidCommand(format!("invalid {what} `{token}`")))
}

fn parse_bool(token: Option<&str>, what: &str) -> Result<bool, ProtocolError> {
    let token = token.ok_or_else(|| missing(what))?;
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ProtocolError::InvalidCommand(format!("invalid {what} `{token}`")))
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Enumerations and board entities shared by every message.
//!
//! Enum variants are spelled exactly as they appear on the wire. Serde
//! handles JSON fields, and `strum` supplies `Display`/`FromStr` for the
//! space-separated command lines, so both directions match names exactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

// ---------------------------------------------------------------------------
// Message and action tags
// ---------------------------------------------------------------------------

/// The `type` tag of an inbound JSON object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum MessageType {
    /// The server asks a player to act.
    Request,
    /// The outcome of an action, or a broadcast without a turn type.
    Info,
    /// Plain server text.
    TextMessage,
}

/// The kind of turn an action or response belongs to (`turnType` on the wire).
///
/// The first seven kinds are actions a client can issue; `Turn` and
/// `FinalScore` only ever come from the server.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum ActionKind {
    Join,
    DrawPassengerCars,
    DrawDestinationTickets,
    ClaimDestinationTickets,
    ClaimRoute,
    BoardState,
    ListAllRoutes,
    Turn,
    FinalScore,
}

impl ActionKind {
    /// Position of this kind in per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether a client may issue this kind as a command.
    pub fn is_client_action(self) -> bool {
        !matches!(self, Self::Turn | Self::FinalScore)
    }
}

/// How a client takes part in a game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum ClientType {
    Player,
    Observer,
}

/// Why the server rejected an action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum ErrorCode {
    /// A player tried to claim both routes of a double route.
    DoubleRouteClaimed,
    NoCardLeft,
    RuleViolation,
    NotPlayersTurn,
    InternalError,
    WrongTurnFormat,
}

// ---------------------------------------------------------------------------
// Colours and cities
// ---------------------------------------------------------------------------

/// Colour of a passenger car card or of a route.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum PassengerCarColor {
    Purple,
    White,
    Blue,
    Yellow,
    Orange,
    Black,
    Red,
    Green,
    /// Locomotive; matches any colour.
    Rainbow,
}

/// A player's seat colour. `None` means "no player" (unclaimed route,
/// unknown actor, no colour preference).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum PlayerColor {
    #[default]
    None,
    Blue,
    Red,
    Green,
    Yellow,
    Black,
}

impl PlayerColor {
    /// `true` for every colour except [`PlayerColor::None`].
    pub fn is_player(self) -> bool {
        self != Self::None
    }
}

/// A city on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum Destination {
    Chicago,
    LosAngeles,
    Montreal,
    Atlanta,
    Calgary,
    Denver,
    ElPaso,
    Houston,
    LasVegas,
    NewOrleans,
    OklahomaCity,
    Phoenix,
    Portland,
    SaintLouis,
    SaultStMarie,
    Washington,
    SanFrancisco,
    Toronto,
    Boston,
    Charleston,
    Dallas,
    Duluth,
    Helena,
    KansasCity,
    LittleRock,
    Miami,
    Nashville,
    NewYork,
    Omaha,
    Pittsburgh,
    Raleigh,
    SaltLakeCity,
    SantaFe,
    Seattle,
    Vancouver,
    Winnipeg,
}

// ---------------------------------------------------------------------------
// Board entities
// ---------------------------------------------------------------------------

/// A track between two cities.
///
/// Routes arrive inside board snapshots and route listings. The snapshot
/// that contains a route owns it; `claimed_by` starts as
/// [`PlayerColor::None`] and is filled in with [`Route::claim`] when a
/// claim for it is observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub d1: Destination,
    pub d2: Destination,
    /// Number of passenger cars needed to claim the route.
    pub cost: u32,
    pub color: PassengerCarColor,
    #[serde(default)]
    pub claimed_by: PlayerColor,
}

impl Route {
    /// Creates an unclaimed route.
    pub fn new(
        d1: Destination,
        d2: Destination,
        cost: u32,
        color: PassengerCarColor,
    ) -> Self {
        Self {
            d1,
            d2,
            cost,
            color,
            claimed_by: PlayerColor::None,
        }
    }

    /// Records `player` as the owner of this route.
    pub fn claim(&mut self, player: PlayerColor) {
        self.claimed_by = player;
    }

    /// Whether some player owns the route.
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_player()
    }

    /// Whether the route joins `a` and `b`, in either direction.
    pub fn connects(&self, a: Destination, b: Destination) -> bool {
        (self.d1 == a && self.d2 == b) || (self.d1 == b && self.d2 == a)
    }

    /// Points awarded for claiming the route, by length.
    pub fn score(&self) -> u32 {
        match self.cost {
            1 => 1,
            2 => 2,
            3 => 4,
            4 => 7,
            5 => 10,
            6 => 15,
            _ => 0,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({} {})", self.d1, self.d2, self.cost, self.color)?;
        if self.is_claimed() {
            write!(f, " claimed by {}", self.claimed_by)?;
        }
        Ok(())
    }
}

/// A ticket worth `points` if `city1` and `city2` end up connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationTicket {
    pub city1: Destination,
    pub city2: Destination,
    pub points: u32,
}

impl DestinationTicket {
    pub fn new(city1: Destination, city2: Destination, points: u32) -> Self {
        Self {
            city1,
            city2,
            points,
        }
    }
}

impl fmt::Display for DestinationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.city1, self.city2, self.points)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_enum_names_match_wire_spelling() {
        assert_eq!(ActionKind::ClaimDestinationTickets.to_string(), "ClaimDestinationTickets");
        assert_eq!(Destination::SaultStMarie.to_string(), "SaultStMarie");
        assert_eq!(PassengerCarColor::Rainbow.to_string(), "Rainbow");
        assert_eq!(PlayerColor::None.to_string(), "None");
    }

    #[test]
    fn test_enum_parsing_is_exact() {
        assert_eq!(ErrorCode::from_str("NoCardLeft").unwrap(), ErrorCode::NoCardLeft);
        assert!(ErrorCode::from_str("nocardleft").is_err());
        assert!(Destination::from_str("New York").is_err());
    }

    #[test]
    fn test_every_destination_parses_back_from_its_name() {
        for city in Destination::iter() {
            assert_eq!(Destination::from_str(&city.to_string()).unwrap(), city);
        }
        assert_eq!(Destination::COUNT, 36);
    }

    #[test]
    fn test_action_kind_index_is_dense() {
        let indices: Vec<usize> = ActionKind::iter().map(ActionKind::index).collect();
        assert_eq!(indices, (0..ActionKind::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_only_server_kinds_are_not_client_actions() {
        assert!(ActionKind::Join.is_client_action());
        assert!(ActionKind::ListAllRoutes.is_client_action());
        assert!(!ActionKind::Turn.is_client_action());
        assert!(!ActionKind::FinalScore.is_client_action());
    }

    #[test]
    fn test_player_color_defaults_to_none() {
        assert_eq!(PlayerColor::default(), PlayerColor::None);
        assert!(!PlayerColor::None.is_player());
        assert!(PlayerColor::Green.is_player());
    }

    #[test]
    fn test_route_claimed_by_defaults_when_missing() {
        let route: Route = serde_json::from_str(
            r#"{"d1":"Seattle","d2":"Portland","cost":1,"color":"Rainbow"}"#,
        )
        .unwrap();
        assert_eq!(route.claimed_by, PlayerColor::None);
        assert!(!route.is_claimed());
    }

    #[test]
    fn test_route_claim_sets_owner() {
        let mut route = Route::new(Destination::Denver, Destination::Omaha, 4, PassengerCarColor::Purple);
        route.claim(PlayerColor::Yellow);
        assert!(route.is_claimed());
        assert_eq!(route.claimed_by, PlayerColor::Yellow);
        assert_eq!(route.to_string(), "Denver-Omaha (4 Purple) claimed by Yellow");
    }

    #[test]
    fn test_route_connects_in_either_direction() {
        let route = Route::new(Destination::Boston, Destination::NewYork, 2, PassengerCarColor::Red);
        assert!(route.connects(Destination::Boston, Destination::NewYork));
        assert!(route.connects(Destination::NewYork, Destination::Boston));
        assert!(!route.connects(Destination::Boston, Destination::Montreal));
    }

    #[test]
    fn test_route_score_by_length() {
        let scores: Vec<u32> = (0..=7)
            .map(|cost| Route::new(Destination::Miami, Destination::Atlanta, cost, PassengerCarColor::Blue).score())
            .collect();
        assert_eq!(scores, vec![0, 1, 2, 4, 7, 10, 15, 0]);
    }

    #[test]
    fn test_ticket_display() {
        let ticket = DestinationTicket::new(Destination::LosAngeles, Destination::NewYork, 21);
        assert_eq!(ticket.to_string(), "LosAngeles-NewYork (21)");
    }
}
